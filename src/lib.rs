pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{RaskladkaError, Result};
pub use models::{Day, Meal, MealPlan, Product};
pub use planner::{build_usage_table, calculate, Requirements, TripParams, UsageTable};
