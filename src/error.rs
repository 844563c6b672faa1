use thiserror::Error;

use crate::planner::{CalculationError, ConflictReport};

#[derive(Debug, Error)]
pub enum RaskladkaError {
    #[error("Plan not found: {query}{}", suggestion_suffix(.suggestions))]
    PlanNotFound {
        query: String,
        suggestions: Vec<String>,
    },

    #[error("Day not found: {0}")]
    DayNotFound(String),

    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not replace state file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculationError),

    #[error("Conflicting product weights:\n{0}")]
    Conflict(ConflictReport),
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

pub type Result<T> = std::result::Result<T, RaskladkaError>;
