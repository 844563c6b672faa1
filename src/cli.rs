use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::EntityId;
use crate::state::PlanCommand;

/// Raskladka: trip food provisioning from a repeating meal plan.
#[derive(Parser, Debug)]
#[command(name = "raskladka")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the state JSON file.
    #[arg(
        short,
        long,
        global = true,
        env = "RASKLADKA_FILE",
        default_value = "raskladka.json"
    )]
    pub file: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Trip length and headcount; missing values come from stored settings.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct TripArgs {
    /// Trip length in days.
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Number of people.
    #[arg(short, long)]
    pub people: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored plans.
    List,

    /// Create the default plan if the store is empty.
    Init,

    /// Show a plan's days, meals and products.
    Show {
        /// Plan id or name (defaults to the first plan).
        plan: Option<String>,
    },

    /// Calculate how much of each product a trip needs.
    Calculate {
        /// Plan id or name (defaults to the first plan).
        #[arg(long)]
        plan: Option<String>,

        #[command(flatten)]
        trip: TripArgs,

        /// Print the requirements as JSON.
        #[arg(long)]
        json: bool,

        /// Also print the per-ration usage table.
        #[arg(long)]
        table: bool,
    },

    /// Export the per-ration usage table as CSV.
    Export {
        /// Plan id or name (defaults to the first plan).
        #[arg(long)]
        plan: Option<String>,

        #[command(flatten)]
        trip: TripArgs,

        /// Output CSV path.
        #[arg(short, long, default_value = "raskladka.csv")]
        output: PathBuf,
    },

    /// Store trip parameters or lock/unlock them.
    Settings {
        #[command(flatten)]
        trip: TripArgs,

        /// Prevent further changes to the stored parameters.
        #[arg(long, conflicts_with = "unlock")]
        lock: bool,

        /// Allow changes to the stored parameters again.
        #[arg(long)]
        unlock: bool,
    },

    /// Write every plan to a JSON backup file.
    Backup {
        /// Output JSON path.
        output: PathBuf,
    },

    /// Import plans from a JSON backup file (all or nothing).
    Import {
        /// Input JSON path.
        input: PathBuf,

        /// Keep existing plans and add the imported ones.
        #[arg(long)]
        merge: bool,

        /// Skip the confirmation prompt when replacing.
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new plan.
    CreatePlan {
        name: String,

        /// Start with day 1 and the default meals.
        #[arg(long)]
        with_default_day: bool,
    },

    /// Rename a plan.
    RenamePlan { plan_id: EntityId, name: String },

    /// Delete a plan.
    DeletePlan { plan_id: EntityId },

    /// Add a day to a plan.
    AddDay { plan_id: EntityId, day_number: u32 },

    /// Delete a day.
    DeleteDay { day_id: EntityId },

    /// Add a meal to a day of a plan.
    AddMeal {
        plan_id: EntityId,
        day_number: u32,
        meal_type: String,
    },

    /// Rename a meal.
    RenameMeal { meal_id: EntityId, meal_type: String },

    /// Remove a meal.
    RemoveMeal { meal_id: EntityId },

    /// Add a product to a meal.
    AddProduct {
        meal_id: EntityId,
        name: String,
        /// Weight per person, in grams.
        weight: u32,
    },

    /// Change a product's name and weight.
    UpdateProduct {
        product_id: EntityId,
        name: String,
        /// Weight per person, in grams.
        weight: u32,
    },

    /// Delete a product.
    DeleteProduct { product_id: EntityId },
}

impl Default for Command {
    fn default() -> Self {
        Command::List
    }
}

impl Command {
    /// The store mutation this subcommand stands for, if it is one.
    pub fn to_plan_command(&self) -> Option<PlanCommand> {
        let command = match self {
            Command::CreatePlan {
                name,
                with_default_day,
            } => PlanCommand::CreatePlan {
                name: name.clone(),
                with_default_day: *with_default_day,
            },
            Command::RenamePlan { plan_id, name } => PlanCommand::RenamePlan {
                plan_id: *plan_id,
                name: name.clone(),
            },
            Command::DeletePlan { plan_id } => PlanCommand::DeletePlan { plan_id: *plan_id },
            Command::AddDay {
                plan_id,
                day_number,
            } => PlanCommand::AddDay {
                plan_id: *plan_id,
                day_number: *day_number,
            },
            Command::DeleteDay { day_id } => PlanCommand::DeleteDay { day_id: *day_id },
            Command::AddMeal {
                plan_id,
                day_number,
                meal_type,
            } => PlanCommand::AddMeal {
                plan_id: *plan_id,
                day_number: *day_number,
                meal_type: meal_type.clone(),
            },
            Command::RenameMeal { meal_id, meal_type } => PlanCommand::RenameMeal {
                meal_id: *meal_id,
                meal_type: meal_type.clone(),
            },
            Command::RemoveMeal { meal_id } => PlanCommand::RemoveMeal { meal_id: *meal_id },
            Command::AddProduct {
                meal_id,
                name,
                weight,
            } => PlanCommand::AddProduct {
                meal_id: *meal_id,
                name: name.clone(),
                weight: *weight,
            },
            Command::UpdateProduct {
                product_id,
                name,
                weight,
            } => PlanCommand::UpdateProduct {
                product_id: *product_id,
                name: name.clone(),
                weight: *weight,
            },
            Command::DeleteProduct { product_id } => PlanCommand::DeleteProduct {
                product_id: *product_id,
            },
            Command::List
            | Command::Init
            | Command::Show { .. }
            | Command::Calculate { .. }
            | Command::Export { .. }
            | Command::Settings { .. }
            | Command::Backup { .. }
            | Command::Import { .. } => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_product_maps_to_plan_command() {
        let cli = Cli::parse_from(["raskladka", "add-product", "7", "Rice", "120"]);
        let command = cli.command.unwrap().to_plan_command();
        assert_eq!(
            command,
            Some(PlanCommand::AddProduct {
                meal_id: 7,
                name: "Rice".to_string(),
                weight: 120,
            })
        );
    }

    #[test]
    fn test_calculate_is_not_a_mutation() {
        let cli = Cli::parse_from(["raskladka", "calculate", "--days", "5", "--people", "3"]);
        match cli.command.unwrap() {
            cmd @ Command::Calculate { .. } => assert!(cmd.to_plan_command().is_none()),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
