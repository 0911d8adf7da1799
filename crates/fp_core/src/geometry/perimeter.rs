//! Perimeter extraction
//!
//! Field image → legal play-area polygon.
//!
//! ## Pipeline
//! 1. Nearest-neighbour resample onto a `round(width) x round(height)` canvas
//! 2. Foreground/background mask (parallel per row)
//! 3. Moore-neighbour trace from the first foreground cell in scan order
//! 4. Cell centres → field coordinates, Douglas-Peucker, inset by margin
//!
//! Bad input never errors. Anything that does not yield a usable polygon
//! returns an empty one and callers keep the rectangular fallback.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

use rayon::prelude::*;

use super::polygon::{inset_polygon, simplify_polyline};
use super::{Point, Polygon};
use crate::engine::config::{FieldGeometry, PerimeterConfig};

/// Lower bound on the trace step guard, for tiny canvases.
const MIN_TRACE_STEPS: usize = 1024;

/// Moore neighbourhood, clockwise on screen (y down), starting west.
const NEIGHBOURS: [(isize, isize); 8] =
    [(-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1)];

// ============================================================================
// Raster input
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Every channel within `threshold` of `other`.
    #[inline]
    pub fn is_near(&self, other: Rgb, threshold: u8) -> bool {
        self.r.abs_diff(other.r) <= threshold
            && self.g.abs_diff(other.g) <= threshold
            && self.b.abs_diff(other.b) <= threshold
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Parses `"R,G,B"`.
impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|c| c.trim().parse::<u8>().map_err(|e| format!("bad channel '{c}': {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
            _ => Err(format!("expected R,G,B, got '{s}'")),
        }
    }
}

/// Row-major RGBA8 image.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// `None` when `pixels` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width * height * 4).then_some(Self { width, height, pixels })
    }

    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self { width, height, pixels: rgba.repeat(width * height) }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    /// Paints `[x0, x1) x [y0, y1)`, clipped to the image.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, rgba: [u8; 4]) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let i = (y * self.width + x) * 4;
                self.pixels[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }
}

// ============================================================================
// Mask
// ============================================================================

struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Mask {
    fn build(raster: &Raster, width: usize, height: usize, background: Rgb, threshold: u8) -> Self {
        let mut cells = vec![false; width * height];
        let sx = raster.width as f64 / width as f64;
        let sy = raster.height as f64 / height as f64;

        cells.par_chunks_mut(width).enumerate().for_each(|(cy, row)| {
            let py = (((cy as f64 + 0.5) * sy) as usize).min(raster.height - 1);
            for (cx, cell) in row.iter_mut().enumerate() {
                let px = (((cx as f64 + 0.5) * sx) as usize).min(raster.width - 1);
                let [r, g, b, a] = raster.pixel(px, py);
                *cell = a != 0 && !Rgb::new(r, g, b).is_near(background, threshold);
            }
        });

        Self { width, height, cells }
    }

    /// Out-of-bounds cells are background.
    #[inline]
    fn is_foreground(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.cells[y as usize * self.width + x as usize]
    }

    fn first_foreground(&self) -> Option<(isize, isize)> {
        self.cells
            .iter()
            .position(|&c| c)
            .map(|i| ((i % self.width) as isize, (i / self.width) as isize))
    }

    /// Moore-neighbour boundary trace with Jacob's stopping criterion.
    fn trace(&self, max_steps: usize) -> Vec<(isize, isize)> {
        let Some(start) = self.first_foreground() else {
            return Vec::new();
        };
        // scan order guarantees the west neighbour is background
        let start_backtrack = (start.0 - 1, start.1);

        let mut boundary = vec![start];
        let mut current = start;
        let mut backtrack = start_backtrack;

        for _ in 0..max_steps {
            let from = (backtrack.0 - current.0, backtrack.1 - current.1);
            let Some(d) = NEIGHBOURS.iter().position(|&n| n == from) else {
                break;
            };

            let mut next = None;
            for k in 1..=8 {
                let (dx, dy) = NEIGHBOURS[(d + k) % 8];
                let candidate = (current.0 + dx, current.1 + dy);
                if self.is_foreground(candidate.0, candidate.1) {
                    let (bx, by) = NEIGHBOURS[(d + k - 1) % 8];
                    next = Some((candidate, (current.0 + bx, current.1 + by)));
                    break;
                }
            }

            // isolated cell
            let Some((cell, back)) = next else {
                return boundary;
            };

            if cell == start && back == start_backtrack {
                return boundary;
            }
            current = cell;
            backtrack = back;
            boundary.push(cell);
        }

        log::warn!("perimeter trace hit the {max_steps} step guard; using partial contour");
        boundary
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Rectangle `[margin, width - margin] x [margin, height - margin]`.
pub fn fallback_polygon(geometry: &FieldGeometry) -> Polygon {
    Polygon::rectangle(
        geometry.margin,
        geometry.margin,
        geometry.width - geometry.margin,
        geometry.height - geometry.margin,
    )
}

/// Traces the foreground region of `raster` into a closed field polygon.
/// Returns an empty polygon when nothing usable is found.
pub fn extract_perimeter(
    raster: &Raster,
    background: Rgb,
    geometry: &FieldGeometry,
    config: &PerimeterConfig,
) -> Polygon {
    if raster.is_empty() {
        log::warn!("perimeter: empty raster");
        return Polygon::empty();
    }

    let width = (geometry.width.round() as usize).max(1);
    let height = (geometry.height.round() as usize).max(1);
    let mask = Mask::build(raster, width, height, background, config.color_threshold);

    let max_steps = (config.iteration_factor * width * height).max(MIN_TRACE_STEPS);
    let cells = mask.trace(max_steps);
    if cells.is_empty() {
        log::warn!("perimeter: no foreground against background {background}");
        return Polygon::empty();
    }

    let scale_x = geometry.width / width as f64;
    let scale_y = geometry.height / height as f64;
    let contour: Vec<Point> = cells
        .iter()
        .map(|&(x, y)| Point::new((x as f64 + 0.5) * scale_x, (y as f64 + 0.5) * scale_y))
        .collect();

    let simplified = simplify_polyline(&contour, config.simplify_epsilon);
    if !simplified.is_usable() {
        log::warn!("perimeter: contour collapsed to {} points", simplified.len());
        return Polygon::empty();
    }

    let polygon = inset_polygon(&simplified.points, geometry.margin);
    log::debug!("perimeter: {} traced cells -> {} vertices", contour.len(), polygon.len());
    polygon
}

// ============================================================================
// Publication
// ============================================================================

/// Current legal polygon, shared with a background extractor.
///
/// Readers get an `Arc` snapshot; a publish swaps the whole `Arc`, so a
/// reader sees either the old polygon or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct PerimeterStore {
    current: Arc<RwLock<Arc<Polygon>>>,
}

impl PerimeterStore {
    pub fn new(initial: Polygon) -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(initial))) }
    }

    /// Starts out on the rectangular fallback.
    pub fn for_geometry(geometry: &FieldGeometry) -> Self {
        Self::new(fallback_polygon(geometry))
    }

    pub fn current(&self) -> Arc<Polygon> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swaps in `polygon`. Unusable polygons are refused.
    pub fn publish(&self, polygon: Polygon) -> bool {
        if !polygon.is_usable() {
            log::warn!("perimeter: refusing to publish {}-point polygon", polygon.len());
            return false;
        }

        let vertices = polygon.len();
        let next = Arc::new(polygon);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        log::info!("perimeter: published {vertices}-vertex polygon");
        true
    }
}

/// Runs [`extract_perimeter`] on a worker thread and publishes the result.
/// The handle yields whether a polygon was published.
pub fn spawn_extraction(
    store: PerimeterStore,
    raster: Raster,
    background: Rgb,
    geometry: FieldGeometry,
    config: PerimeterConfig,
) -> JoinHandle<bool> {
    std::thread::spawn(move || {
        let polygon = extract_perimeter(&raster, background, &geometry, &config);
        store.publish(polygon)
    })
}
