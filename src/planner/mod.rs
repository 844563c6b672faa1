pub mod calculations;
pub mod constants;
pub mod normalize;
pub mod projection;
pub mod validation;

pub use calculations::{
    calculate, CalculationError, ProductRequirement, Requirements, RequirementsSummary,
    TripParams,
};
pub use constants::*;
pub use normalize::{canonical_key, display_name};
pub use projection::{build_usage_table, slot_repetitions, SlotHeader, UsageRow, UsageTable};
pub use validation::{
    validate_batch, validate_meal_type, validate_name_weight, validate_plan_name,
    validate_product_name, validate_weight, ConflictReport, ConflictSource, NameConflict,
};
