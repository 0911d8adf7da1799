use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Alliance colour. Every classifier, slot grid and magnet belongs to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    pub const ALL: [Alliance; 2] = [Alliance::Red, Alliance::Blue];

    /// The opposing alliance (spillover target).
    pub fn other(self) -> Self {
        match self {
            Alliance::Red => Alliance::Blue,
            Alliance::Blue => Alliance::Red,
        }
    }
}

impl std::fmt::Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Alliance::Red => write!(f, "red"),
            Alliance::Blue => write!(f, "blue"),
        }
    }
}

/// One value per alliance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerAlliance<T> {
    pub red: T,
    pub blue: T,
}

impl<T> PerAlliance<T> {
    pub fn new(red: T, blue: T) -> Self {
        Self { red, blue }
    }

    pub fn get(&self, alliance: Alliance) -> &T {
        match alliance {
            Alliance::Red => &self.red,
            Alliance::Blue => &self.blue,
        }
    }

    pub fn get_mut(&mut self, alliance: Alliance) -> &mut T {
        match alliance {
            Alliance::Red => &mut self.red,
            Alliance::Blue => &mut self.blue,
        }
    }

    /// Mutable access to both sides at once (own side first).
    pub fn split_mut(&mut self, own: Alliance) -> (&mut T, &mut T) {
        match own {
            Alliance::Red => (&mut self.red, &mut self.blue),
            Alliance::Blue => (&mut self.blue, &mut self.red),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Alliance, &T)> {
        [(Alliance::Red, &self.red), (Alliance::Blue, &self.blue)].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involution() {
        for a in Alliance::ALL {
            assert_ne!(a, a.other());
            assert_eq!(a, a.other().other());
        }
    }

    #[test]
    fn test_split_mut_own_side_first() {
        let mut counts = PerAlliance::new(1, 2);
        let (own, other) = counts.split_mut(Alliance::Blue);
        *own += 10;
        *other += 100;
        assert_eq!(counts, PerAlliance::new(101, 12));
    }

    #[test]
    fn test_alliance_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Alliance::Red).unwrap(), "\"red\"");
        let parsed: Alliance = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(parsed, Alliance::Blue);
    }
}
