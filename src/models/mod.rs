mod plan;
mod product;
mod settings;

pub use plan::{Day, Meal, MealPlan};
pub use product::Product;
pub use settings::TripSettings;

/// Identifier assigned by the store to every plan, day, meal and product.
pub type EntityId = u64;
