use std::collections::HashMap;
use std::fmt;

use crate::error::{RaskladkaError, Result};
use crate::models::{EntityId, Product};
use crate::planner::constants::*;
use crate::planner::normalize::{canonical_key, display_name};

// ─────────────────────────────────────────────────────────────────────────────
// Field validators
// ─────────────────────────────────────────────────────────────────────────────

/// Check a weight against the accepted gram range and narrow it.
pub fn validate_weight(weight: i64) -> Result<u32> {
    if weight < i64::from(MIN_PRODUCT_WEIGHT) || weight > i64::from(MAX_PRODUCT_WEIGHT) {
        return Err(RaskladkaError::Validation(format!(
            "Weight must be between {} and {} grams, got {}",
            MIN_PRODUCT_WEIGHT, MAX_PRODUCT_WEIGHT, weight
        )));
    }
    Ok(weight as u32)
}

fn is_allowed_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || PRODUCT_NAME_PUNCTUATION.contains(&c)
}

/// Check a product name: non-empty, bounded length, restricted characters.
pub fn validate_product_name(name: &str) -> Result<()> {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(RaskladkaError::Validation(
            "Product name must not be empty".to_string(),
        ));
    }
    if collapsed.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(RaskladkaError::Validation(format!(
            "Product name must be at most {} characters",
            MAX_PRODUCT_NAME_LEN
        )));
    }
    if let Some(bad) = collapsed.chars().find(|&c| !is_allowed_name_char(c)) {
        return Err(RaskladkaError::Validation(format!(
            "Product name contains an unsupported character: '{}'",
            bad
        )));
    }
    Ok(())
}

fn validate_label(value: &str, what: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RaskladkaError::Validation(format!(
            "{} must not be empty",
            what
        )));
    }
    if trimmed.chars().count() > max_len {
        return Err(RaskladkaError::Validation(format!(
            "{} must be at most {} characters",
            what, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Check a plan name and return it trimmed.
pub fn validate_plan_name(name: &str) -> Result<String> {
    validate_label(name, "Plan name", MAX_PLAN_NAME_LEN)
}

/// Check a meal type label and return it trimmed.
pub fn validate_meal_type(meal_type: &str) -> Result<String> {
    validate_label(meal_type, "Meal type", MAX_MEAL_TYPE_LEN)
}

// ─────────────────────────────────────────────────────────────────────────────
// Canonical weight conflicts
// ─────────────────────────────────────────────────────────────────────────────

/// Where the clashing weight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSource {
    /// Already stored.
    Existing,
    /// Earlier in the same incoming batch.
    Batch,
}

/// One canonical product name carrying two different weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
    pub display_name: String,
    pub stored_weight: u32,
    pub proposed_weight: u32,
    pub source: ConflictSource,
}

impl fmt::Display for NameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            ConflictSource::Existing => write!(
                f,
                "Product \"{}\" already exists with weight {} g, not {} g. \
                 Use the same weight or give it a distinct name, e.g. \"{} ({} g)\".",
                self.display_name,
                self.stored_weight,
                self.proposed_weight,
                self.display_name,
                self.proposed_weight
            ),
            ConflictSource::Batch => write!(
                f,
                "Product \"{}\" appears with weights {} g and {} g. \
                 Use one weight or give one of them a distinct name, e.g. \"{} ({} g)\".",
                self.display_name,
                self.stored_weight,
                self.proposed_weight,
                self.display_name,
                self.proposed_weight
            ),
        }
    }
}

/// Every conflict found in one validation pass.
///
/// Detection is exhaustive; only the rendered message is capped at
/// [`MAX_CONFLICTS_SHOWN`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    conflicts: Vec<NameConflict>,
}

impl ConflictReport {
    pub fn conflicts(&self) -> &[NameConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Human-readable lines, capped, with a trailing count of the rest.
    pub fn messages(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .conflicts
            .iter()
            .take(MAX_CONFLICTS_SHOWN)
            .map(|c| c.to_string())
            .collect();

        let hidden = self.conflicts.len().saturating_sub(MAX_CONFLICTS_SHOWN);
        if hidden > 0 {
            lines.push(format!("...and {} more", hidden));
        }
        lines
    }

    fn into_result(self) -> std::result::Result<(), ConflictReport> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<NameConflict> for ConflictReport {
    fn from(conflict: NameConflict) -> Self {
        Self {
            conflicts: vec![conflict],
        }
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl From<ConflictReport> for RaskladkaError {
    fn from(report: ConflictReport) -> Self {
        RaskladkaError::Conflict(report)
    }
}

impl From<NameConflict> for RaskladkaError {
    fn from(conflict: NameConflict) -> Self {
        RaskladkaError::Conflict(conflict.into())
    }
}

/// First stored weight per canonical key.
fn stored_weights<'a, I>(existing: I) -> HashMap<String, u32>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut weights = HashMap::new();
    for product in existing {
        weights.entry(product.key()).or_insert(product.weight);
    }
    weights
}

/// Reject a name/weight pair whose canonical name is stored with another weight.
///
/// `exclude` skips one product by id, so an update does not clash with the
/// row it is about to overwrite.
pub fn validate_name_weight<'a, I>(
    existing: I,
    proposed_name: &str,
    proposed_weight: u32,
    exclude: Option<EntityId>,
) -> std::result::Result<(), NameConflict>
where
    I: IntoIterator<Item = &'a Product>,
{
    let key = canonical_key(proposed_name);
    let conflicting = existing.into_iter().find(|p| {
        Some(p.id) != exclude && p.weight != proposed_weight && p.key() == key
    });

    match conflicting {
        Some(product) => Err(NameConflict {
            display_name: display_name(&product.name),
            stored_weight: product.weight,
            proposed_weight,
            source: ConflictSource::Existing,
        }),
        None => Ok(()),
    }
}

/// Check an incoming batch against itself, then against stored products.
///
/// Conflicts inside the batch are reported on their own; stored products are
/// only consulted once the batch is self-consistent.
pub fn validate_batch<'a, I>(
    existing: I,
    incoming: &[(&str, u32)],
) -> std::result::Result<(), ConflictReport>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut first_weight: HashMap<String, u32> = HashMap::new();
    let mut reported: Vec<(String, u32)> = Vec::new();
    let mut batch = ConflictReport::default();

    for (name, weight) in incoming {
        let key = canonical_key(name);
        let first = *first_weight.entry(key.clone()).or_insert(*weight);
        if first != *weight && !reported.contains(&(key.clone(), *weight)) {
            reported.push((key, *weight));
            batch.conflicts.push(NameConflict {
                display_name: display_name(name),
                stored_weight: first,
                proposed_weight: *weight,
                source: ConflictSource::Batch,
            });
        }
    }
    batch.into_result()?;

    let stored = stored_weights(existing);
    let mut against_existing = ConflictReport::default();
    for (name, weight) in incoming {
        let key = canonical_key(name);
        if let Some(&stored_weight) = stored.get(&key) {
            if stored_weight != *weight && !reported.contains(&(key.clone(), *weight)) {
                reported.push((key, *weight));
                against_existing.conflicts.push(NameConflict {
                    display_name: display_name(name),
                    stored_weight,
                    proposed_weight: *weight,
                    source: ConflictSource::Existing,
                });
            }
        }
    }
    against_existing.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Vec<Product> {
        vec![Product::new(1, "rice", 150), Product::new(2, "Tea", 5)]
    }

    #[test]
    fn test_weight_bounds() {
        assert!(validate_weight(0).is_err());
        assert!(validate_weight(-5).is_err());
        assert!(validate_weight(500_001).is_err());
        assert_eq!(validate_weight(1).unwrap(), 1);
        assert_eq!(validate_weight(500_000).unwrap(), 500_000);
    }

    #[test]
    fn test_product_name_rules() {
        assert!(validate_product_name("Rice").is_ok());
        assert!(validate_product_name("Сыр «Российский», 45%").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"a".repeat(101)).is_err());
        assert!(validate_product_name(&"a".repeat(100)).is_ok());
        assert!(validate_product_name("Rice <script>").is_err());
    }

    #[test]
    fn test_rejects_different_weight_for_same_name() {
        let products = stored();
        let err = validate_name_weight(&products, "RICE", 200, None).unwrap_err();
        assert_eq!(err.display_name, "Rice");
        assert_eq!(err.stored_weight, 150);
        assert!(err.to_string().contains("150 g"));
    }

    #[test]
    fn test_accepts_same_weight() {
        let products = stored();
        assert!(validate_name_weight(&products, "RICE", 150, None).is_ok());
        assert!(validate_name_weight(&products, "Buckwheat", 90, None).is_ok());
    }

    #[test]
    fn test_exclude_allows_update_in_place() {
        let products = stored();
        assert!(validate_name_weight(&products, "Rice", 175, Some(1)).is_ok());
    }

    #[test]
    fn test_batch_conflicts_reported_before_existing() {
        let products = stored();
        let incoming = [("Oats", 80), ("oats ", 90), ("Rice", 999)];
        let report = validate_batch(&products, &incoming).unwrap_err();

        assert_eq!(report.len(), 1);
        assert_eq!(report.conflicts()[0].source, ConflictSource::Batch);
        assert_eq!(report.conflicts()[0].display_name, "Oats");
    }

    #[test]
    fn test_batch_against_existing() {
        let products = stored();
        let incoming = [("Rice", 200), ("rice", 200), ("Tea", 5)];
        let report = validate_batch(&products, &incoming).unwrap_err();

        assert_eq!(report.len(), 1);
        assert_eq!(report.conflicts()[0].source, ConflictSource::Existing);
    }

    #[test]
    fn test_batch_long_s_matches_plain_s() {
        let incoming = [("salt", 5), ("ſalt", 50)];
        let report = validate_batch(std::iter::empty(), &incoming).unwrap_err();

        assert_eq!(report.len(), 1);
        assert_eq!(report.conflicts()[0].display_name, "Salt");
        assert_eq!(report.conflicts()[0].stored_weight, 5);
    }

    #[test]
    fn test_messages_are_capped() {
        let incoming: Vec<(String, u32)> = (0..8)
            .flat_map(|i| vec![(format!("Item {}", i), 10), (format!("item {}", i), 20)])
            .collect();
        let borrowed: Vec<(&str, u32)> = incoming.iter().map(|(n, w)| (n.as_str(), *w)).collect();
        let report = validate_batch(std::iter::empty(), &borrowed).unwrap_err();

        assert_eq!(report.len(), 8);
        let messages = report.messages();
        assert_eq!(messages.len(), MAX_CONFLICTS_SHOWN + 1);
        assert_eq!(messages.last().unwrap(), "...and 3 more");
    }
}
