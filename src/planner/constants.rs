/// Smallest accepted product weight, in grams.
pub const MIN_PRODUCT_WEIGHT: u32 = 1;

/// Largest accepted product weight, in grams.
pub const MAX_PRODUCT_WEIGHT: u32 = 500_000;

/// Maximum product name length, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 100;

/// Maximum plan name length, in characters.
pub const MAX_PLAN_NAME_LEN: usize = 100;

/// Maximum meal type label length, in characters.
pub const MAX_MEAL_TYPE_LEN: usize = 50;

/// Punctuation allowed in product names besides letters, digits and spaces.
pub const PRODUCT_NAME_PUNCTUATION: &[char] = &[
    '-', '_', '.', ',', '(', ')', '/', '%', '\'', '"', '+', '&', ':', ';', '!', '?', '№', '«',
    '»',
];

// ─────────────────────────────────────────────────────────────────────────────
// Conflict reporting
// ─────────────────────────────────────────────────────────────────────────────

/// Number of conflicts spelled out before the rest are summarized as a count.
pub const MAX_CONFLICTS_SHOWN: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Name given to the plan created for an empty store.
pub const DEFAULT_PLAN_NAME: &str = "Current Plan";

/// Meals created on day 1 of a new default plan.
pub const DEFAULT_MEAL_TYPES: [&str; 3] = ["Breakfast", "Lunch/Snack", "Dinner"];

/// Backup document format version written by export and accepted by import.
pub const BACKUP_VERSION: u32 = 1;

/// Grams per kilogram, used when formatting weights.
pub const GRAMS_PER_KG: u64 = 1000;
