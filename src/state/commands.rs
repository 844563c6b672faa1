use crate::models::EntityId;

/// Every change a user can make to their plans.
///
/// Each variant carries its own typed input; [`PlanStateManager::apply`]
/// validates and dispatches them.
///
/// [`PlanStateManager::apply`]: crate::state::PlanStateManager::apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanCommand {
    /// Create a plan, optionally with day 1 and the default meals.
    CreatePlan {
        name: String,
        with_default_day: bool,
    },
    RenamePlan {
        plan_id: EntityId,
        name: String,
    },
    DeletePlan {
        plan_id: EntityId,
    },
    /// Add an empty day; `day_number` must be unused in the plan.
    AddDay {
        plan_id: EntityId,
        day_number: u32,
    },
    DeleteDay {
        day_id: EntityId,
    },
    AddMeal {
        plan_id: EntityId,
        day_number: u32,
        meal_type: String,
    },
    RenameMeal {
        meal_id: EntityId,
        meal_type: String,
    },
    RemoveMeal {
        meal_id: EntityId,
    },
    AddProduct {
        meal_id: EntityId,
        name: String,
        weight: u32,
    },
    UpdateProduct {
        product_id: EntityId,
        name: String,
        weight: u32,
    },
    DeleteProduct {
        product_id: EntityId,
    },
}

impl PlanCommand {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PlanCommand::CreatePlan { .. } => "create_plan",
            PlanCommand::RenamePlan { .. } => "rename_plan",
            PlanCommand::DeletePlan { .. } => "delete_plan",
            PlanCommand::AddDay { .. } => "add_day",
            PlanCommand::DeleteDay { .. } => "delete_day",
            PlanCommand::AddMeal { .. } => "add_meal",
            PlanCommand::RenameMeal { .. } => "rename_meal",
            PlanCommand::RemoveMeal { .. } => "remove_meal",
            PlanCommand::AddProduct { .. } => "add_product",
            PlanCommand::UpdateProduct { .. } => "update_product",
            PlanCommand::DeleteProduct { .. } => "delete_product",
        }
    }
}

/// What a successfully applied command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Created(EntityId),
    Updated,
    Deleted,
}
