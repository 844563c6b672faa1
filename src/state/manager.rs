use strsim::jaro_winkler;
use tracing::{debug, info, warn};

use crate::error::{RaskladkaError, Result};
use crate::models::{Day, EntityId, Meal, MealPlan, Product, TripSettings};
use crate::planner::constants::{DEFAULT_MEAL_TYPES, DEFAULT_PLAN_NAME};
use crate::planner::normalize::{canonical_key, display_name};
use crate::planner::validation::{
    validate_meal_type, validate_name_weight, validate_plan_name, validate_product_name,
    validate_weight,
};
use crate::state::commands::{CommandOutcome, PlanCommand};
use crate::state::persistence::StoreSnapshot;

/// Minimum Jaro-Winkler score for a plan name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Maximum number of plan names suggested for a failed lookup.
const MAX_SUGGESTIONS: usize = 3;

/// Manages one user's plans and trip settings.
///
/// Every mutation goes through `&mut self`, so the conflict check and the
/// write it guards cannot interleave with another mutation.
pub struct PlanStateManager {
    snapshot: StoreSnapshot,
}

impl PlanStateManager {
    /// Create a manager over a loaded snapshot.
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> StoreSnapshot {
        self.snapshot
    }

    pub fn plans(&self) -> &[MealPlan] {
        &self.snapshot.plans
    }

    pub fn settings(&self) -> &TripSettings {
        &self.snapshot.settings
    }

    /// Every stored product across all plans.
    pub fn all_products(&self) -> impl Iterator<Item = &Product> {
        self.snapshot.plans.iter().flat_map(|p| p.products())
    }

    pub(crate) fn next_id(&mut self) -> EntityId {
        self.snapshot.next_id += 1;
        self.snapshot.next_id
    }

    pub(crate) fn replace_snapshot(&mut self, snapshot: StoreSnapshot) {
        self.snapshot = snapshot;
    }

    pub(crate) fn push_plan(&mut self, plan: MealPlan) {
        self.snapshot.plans.push(plan);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────

    pub fn plan(&self, plan_id: EntityId) -> Option<&MealPlan> {
        self.snapshot.plans.iter().find(|p| p.id == plan_id)
    }

    fn plan_mut(&mut self, plan_id: EntityId) -> Result<&mut MealPlan> {
        self.snapshot
            .plans
            .iter_mut()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| RaskladkaError::PlanNotFound {
                query: format!("#{}", plan_id),
                suggestions: Vec::new(),
            })
    }

    fn meal_mut(&mut self, meal_id: EntityId) -> Result<&mut Meal> {
        self.snapshot
            .plans
            .iter_mut()
            .flat_map(|p| p.days.iter_mut())
            .flat_map(|d| d.meals.iter_mut())
            .find(|m| m.id == meal_id)
            .ok_or_else(|| RaskladkaError::MealNotFound(format!("#{}", meal_id)))
    }

    fn product_mut(&mut self, product_id: EntityId) -> Result<&mut Product> {
        self.snapshot
            .plans
            .iter_mut()
            .flat_map(|p| p.days.iter_mut())
            .flat_map(|d| d.meals.iter_mut())
            .flat_map(|m| m.products.iter_mut())
            .find(|p| p.id == product_id)
            .ok_or_else(|| RaskladkaError::ProductNotFound(format!("#{}", product_id)))
    }

    /// Resolve a plan by numeric id or by name (case/whitespace-insensitive).
    ///
    /// `None` picks the first plan. A miss reports similar plan names.
    pub fn find_plan(&self, selector: Option<&str>) -> Result<&MealPlan> {
        let Some(selector) = selector else {
            return self
                .snapshot
                .plans
                .first()
                .ok_or_else(|| RaskladkaError::PlanNotFound {
                    query: "(no plans stored)".to_string(),
                    suggestions: Vec::new(),
                });
        };

        if let Ok(id) = selector.trim().trim_start_matches('#').parse::<EntityId>() {
            if let Some(plan) = self.plan(id) {
                return Ok(plan);
            }
        }

        let key = canonical_key(selector);
        if let Some(plan) = self
            .snapshot
            .plans
            .iter()
            .find(|p| canonical_key(&p.name) == key)
        {
            return Ok(plan);
        }

        Err(RaskladkaError::PlanNotFound {
            query: selector.to_string(),
            suggestions: self.similar_plan_names(&key),
        })
    }

    fn similar_plan_names(&self, key: &str) -> Vec<String> {
        let mut candidates: Vec<(&MealPlan, f64)> = self
            .snapshot
            .plans
            .iter()
            .map(|p| (p, jaro_winkler(&canonical_key(&p.name), key)))
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        candidates
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(p, _)| p.name.clone())
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────

    /// Validate and apply one command.
    pub fn apply(&mut self, command: PlanCommand) -> Result<CommandOutcome> {
        let label = command.name();
        let outcome = match command {
            PlanCommand::CreatePlan {
                name,
                with_default_day,
            } => self.create_plan(&name, with_default_day),
            PlanCommand::RenamePlan { plan_id, name } => self.rename_plan(plan_id, &name),
            PlanCommand::DeletePlan { plan_id } => self.delete_plan(plan_id),
            PlanCommand::AddDay {
                plan_id,
                day_number,
            } => self.add_day(plan_id, day_number),
            PlanCommand::DeleteDay { day_id } => self.delete_day(day_id),
            PlanCommand::AddMeal {
                plan_id,
                day_number,
                meal_type,
            } => self.add_meal(plan_id, day_number, &meal_type),
            PlanCommand::RenameMeal { meal_id, meal_type } => {
                self.rename_meal(meal_id, &meal_type)
            }
            PlanCommand::RemoveMeal { meal_id } => self.remove_meal(meal_id),
            PlanCommand::AddProduct {
                meal_id,
                name,
                weight,
            } => self.add_product(meal_id, &name, weight),
            PlanCommand::UpdateProduct {
                product_id,
                name,
                weight,
            } => self.update_product(product_id, &name, weight),
            PlanCommand::DeleteProduct { product_id } => self.delete_product(product_id),
        };

        match &outcome {
            Ok(result) => info!(command = label, ?result, "command applied"),
            Err(RaskladkaError::Conflict(report)) => {
                warn!(command = label, conflicts = report.len(), "command rejected")
            }
            Err(e) => warn!(command = label, error = %e, "command rejected"),
        }
        outcome
    }

    fn create_plan(&mut self, name: &str, with_default_day: bool) -> Result<CommandOutcome> {
        let name = validate_plan_name(name)?;
        let plan_id = self.next_id();
        let mut plan = MealPlan::new(plan_id, name);

        if with_default_day {
            let mut day = Day::new(self.next_id(), 1);
            for meal_type in DEFAULT_MEAL_TYPES {
                day.meals.push(Meal::new(self.next_id(), meal_type));
            }
            plan.insert_day(day);
        }

        self.snapshot.plans.push(plan);
        Ok(CommandOutcome::Created(plan_id))
    }

    /// Create the default plan if nothing is stored yet.
    ///
    /// Returns the id of the created plan.
    pub fn ensure_default_plan(&mut self) -> Result<Option<EntityId>> {
        if !self.snapshot.plans.is_empty() {
            return Ok(None);
        }
        match self.apply(PlanCommand::CreatePlan {
            name: DEFAULT_PLAN_NAME.to_string(),
            with_default_day: true,
        })? {
            CommandOutcome::Created(id) => Ok(Some(id)),
            _ => Ok(None),
        }
    }

    fn rename_plan(&mut self, plan_id: EntityId, name: &str) -> Result<CommandOutcome> {
        let name = validate_plan_name(name)?;
        self.plan_mut(plan_id)?.name = name;
        Ok(CommandOutcome::Updated)
    }

    fn delete_plan(&mut self, plan_id: EntityId) -> Result<CommandOutcome> {
        let pos = self
            .snapshot
            .plans
            .iter()
            .position(|p| p.id == plan_id)
            .ok_or_else(|| RaskladkaError::PlanNotFound {
                query: format!("#{}", plan_id),
                suggestions: Vec::new(),
            })?;
        self.snapshot.plans.remove(pos);
        Ok(CommandOutcome::Deleted)
    }

    fn add_day(&mut self, plan_id: EntityId, day_number: u32) -> Result<CommandOutcome> {
        if day_number == 0 {
            return Err(RaskladkaError::Validation(
                "Day number must be at least 1".to_string(),
            ));
        }
        if self.plan_mut(plan_id)?.day_by_number(day_number).is_some() {
            return Err(RaskladkaError::Validation(format!(
                "Day {} already exists in this plan",
                day_number
            )));
        }

        let day_id = self.next_id();
        self.plan_mut(plan_id)?.insert_day(Day::new(day_id, day_number));
        Ok(CommandOutcome::Created(day_id))
    }

    fn delete_day(&mut self, day_id: EntityId) -> Result<CommandOutcome> {
        for plan in &mut self.snapshot.plans {
            if let Some(pos) = plan.days.iter().position(|d| d.id == day_id) {
                plan.days.remove(pos);
                return Ok(CommandOutcome::Deleted);
            }
        }
        Err(RaskladkaError::DayNotFound(format!("#{}", day_id)))
    }

    fn add_meal(
        &mut self,
        plan_id: EntityId,
        day_number: u32,
        meal_type: &str,
    ) -> Result<CommandOutcome> {
        let meal_type = validate_meal_type(meal_type)?;
        let meal_id = self.next_id();
        let plan = self.plan_mut(plan_id)?;
        let day = plan.day_by_number_mut(day_number).ok_or_else(|| {
            RaskladkaError::DayNotFound(format!("day {} of plan #{}", day_number, plan_id))
        })?;
        day.meals.push(Meal::new(meal_id, meal_type));
        Ok(CommandOutcome::Created(meal_id))
    }

    fn rename_meal(&mut self, meal_id: EntityId, meal_type: &str) -> Result<CommandOutcome> {
        let meal_type = validate_meal_type(meal_type)?;
        self.meal_mut(meal_id)?.meal_type = meal_type;
        Ok(CommandOutcome::Updated)
    }

    fn remove_meal(&mut self, meal_id: EntityId) -> Result<CommandOutcome> {
        for day in self
            .snapshot
            .plans
            .iter_mut()
            .flat_map(|p| p.days.iter_mut())
        {
            if let Some(pos) = day.meals.iter().position(|m| m.id == meal_id) {
                day.meals.remove(pos);
                return Ok(CommandOutcome::Deleted);
            }
        }
        Err(RaskladkaError::MealNotFound(format!("#{}", meal_id)))
    }

    /// Field rules first, then the canonical weight rule.
    fn check_product(&self, name: &str, weight: u32, exclude: Option<EntityId>) -> Result<u32> {
        validate_product_name(name)?;
        let weight = validate_weight(i64::from(weight))?;
        validate_name_weight(self.all_products(), name, weight, exclude)?;
        Ok(weight)
    }

    fn add_product(
        &mut self,
        meal_id: EntityId,
        name: &str,
        weight: u32,
    ) -> Result<CommandOutcome> {
        let weight = self.check_product(name, weight, None)?;
        // Resolve the meal before allocating an id so a miss leaves no gap.
        self.meal_mut(meal_id)?;
        let product = Product::new(self.next_id(), display_name(name), weight);
        let product_id = product.id;
        debug!(meal_id, product = %product.debug_string(), "product added");
        self.meal_mut(meal_id)?.products.push(product);
        Ok(CommandOutcome::Created(product_id))
    }

    fn update_product(
        &mut self,
        product_id: EntityId,
        name: &str,
        weight: u32,
    ) -> Result<CommandOutcome> {
        self.product_mut(product_id)?;
        let weight = self.check_product(name, weight, Some(product_id))?;
        let product = self.product_mut(product_id)?;
        product.name = display_name(name);
        product.weight = weight;
        Ok(CommandOutcome::Updated)
    }

    fn delete_product(&mut self, product_id: EntityId) -> Result<CommandOutcome> {
        for meal in self
            .snapshot
            .plans
            .iter_mut()
            .flat_map(|p| p.days.iter_mut())
            .flat_map(|d| d.meals.iter_mut())
        {
            if let Some(pos) = meal.products.iter().position(|p| p.id == product_id) {
                meal.products.remove(pos);
                return Ok(CommandOutcome::Deleted);
            }
        }
        Err(RaskladkaError::ProductNotFound(format!("#{}", product_id)))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Trip settings
    // ─────────────────────────────────────────────────────────────────────

    /// Store new trip parameters. Refused while the settings are locked.
    pub fn update_settings(
        &mut self,
        trip_days: Option<u32>,
        people_count: Option<u32>,
    ) -> Result<()> {
        if trip_days.is_none() && people_count.is_none() {
            return Ok(());
        }
        if self.snapshot.settings.params_locked {
            return Err(RaskladkaError::InvalidInput(
                "Trip parameters are locked; unlock them first".to_string(),
            ));
        }
        if trip_days == Some(0) || people_count == Some(0) {
            return Err(RaskladkaError::InvalidInput(
                "Trip length and headcount must be positive".to_string(),
            ));
        }

        let settings = &mut self.snapshot.settings;
        if trip_days.is_some() {
            settings.trip_days = trip_days;
        }
        if people_count.is_some() {
            settings.people_count = people_count;
        }
        info!(?settings, "trip settings updated");
        Ok(())
    }

    pub fn set_params_locked(&mut self, locked: bool) {
        self.snapshot.settings.params_locked = locked;
    }
}
