use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::planner::normalize::canonical_key;

/// A product portion inside a meal.
///
/// `weight` is in grams for a single person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub weight: u32,
}

impl Product {
    pub fn new(id: EntityId, name: impl Into<String>, weight: u32) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
        }
    }

    /// Canonical key for lookups (trimmed, collapsed, lowercase name).
    pub fn key(&self) -> String {
        canonical_key(&self.name)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!("#{} {}: {} g", self.id, self.name, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_case_and_spacing() {
        let a = Product::new(1, "  Dried   Apricots ", 50);
        let b = Product::new(2, "dried apricots", 50);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_debug_string() {
        let p = Product::new(7, "Rice", 120);
        assert_eq!(p.debug_string(), "#7 Rice: 120 g");
    }
}
