use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RaskladkaError, Result};
use crate::models::{Day, Meal, MealPlan, Product};
use crate::planner::constants::BACKUP_VERSION;
use crate::planner::normalize::display_name;
use crate::planner::validation::{
    validate_batch, validate_meal_type, validate_plan_name, validate_product_name,
    validate_weight,
};
use crate::state::manager::PlanStateManager;

/// Portable copy of every plan a user owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: u32,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    pub meal_plans: Vec<BackupPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPlan {
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub days: Vec<BackupDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDay {
    pub day_number: i64,
    #[serde(default)]
    pub meals: Vec<BackupMeal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupMeal {
    pub meal_type: String,
    #[serde(default)]
    pub products: Vec<BackupProduct>,
}

/// Weights are signed here so out-of-range values reach validation with a
/// readable message instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupProduct {
    pub name: String,
    pub weight: i64,
}

/// Whether an import discards the stored plans or adds to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    #[default]
    Replace,
    Merge,
}

/// Counts of what an import wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub plans: usize,
    pub days: usize,
    pub products: usize,
}

impl BackupDocument {
    /// Snapshot the given plans.
    pub fn from_plans(plans: &[MealPlan]) -> Self {
        Self {
            version: BACKUP_VERSION,
            exported_at: Some(Utc::now()),
            meal_plans: plans.iter().map(BackupPlan::from).collect(),
        }
    }

    /// Parse a backup from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check shape and field rules, without looking at stored data.
    pub fn validate(&self) -> Result<()> {
        if self.version != BACKUP_VERSION {
            return Err(RaskladkaError::Validation(format!(
                "Unsupported backup version {} (expected {})",
                self.version, BACKUP_VERSION
            )));
        }

        for (plan_index, plan) in self.meal_plans.iter().enumerate() {
            let at = |msg: String| {
                RaskladkaError::Validation(format!("plan {}: {}", plan_index + 1, msg))
            };
            validate_plan_name(&plan.name).map_err(|e| at(describe(e)))?;

            let mut numbers = HashSet::new();
            for day in &plan.days {
                if day.day_number < 1 || day.day_number > i64::from(u32::MAX) {
                    return Err(at(format!("invalid day number {}", day.day_number)));
                }
                if !numbers.insert(day.day_number) {
                    return Err(at(format!("day {} appears twice", day.day_number)));
                }
                for meal in &day.meals {
                    validate_meal_type(&meal.meal_type).map_err(|e| at(describe(e)))?;
                    for product in &meal.products {
                        validate_product_name(&product.name).map_err(|e| at(describe(e)))?;
                        validate_weight(product.weight).map_err(|e| at(describe(e)))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Every product in the document as (name, weight), in document order.
    ///
    /// Only meaningful after [`validate`](Self::validate) has passed.
    pub fn flatten_products(&self) -> Vec<(&str, u32)> {
        self.meal_plans
            .iter()
            .flat_map(|p| p.days.iter())
            .flat_map(|d| d.meals.iter())
            .flat_map(|m| m.products.iter())
            .map(|p| (p.name.as_str(), p.weight as u32))
            .collect()
    }
}

/// Inner message of a validation error, so prefixes do not stack.
fn describe(e: RaskladkaError) -> String {
    match e {
        RaskladkaError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

impl From<&MealPlan> for BackupPlan {
    fn from(plan: &MealPlan) -> Self {
        Self {
            name: plan.name.clone(),
            created_at: Some(plan.created_at),
            days: plan
                .days
                .iter()
                .map(|day| BackupDay {
                    day_number: i64::from(day.day_number),
                    meals: day
                        .meals
                        .iter()
                        .map(|meal| BackupMeal {
                            meal_type: meal.meal_type.clone(),
                            products: meal
                                .products
                                .iter()
                                .map(|p| BackupProduct {
                                    name: p.name.clone(),
                                    weight: i64::from(p.weight),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl PlanStateManager {
    /// Export every stored plan.
    pub fn export_backup(&self) -> BackupDocument {
        BackupDocument::from_plans(self.plans())
    }

    /// Import a backup, all or nothing.
    ///
    /// Runs structural validation, then conflict checks (within the document,
    /// then against plans that survive the import), and only then swaps in
    /// the new state. On any error the manager is left untouched.
    pub fn import_backup(
        &mut self,
        doc: &BackupDocument,
        mode: ImportMode,
    ) -> Result<ImportSummary> {
        doc.validate()?;

        let incoming = doc.flatten_products();
        let surviving: Vec<&Product> = match mode {
            ImportMode::Replace => Vec::new(),
            ImportMode::Merge => self.all_products().collect(),
        };
        if let Err(report) = validate_batch(surviving, &incoming) {
            warn!(conflicts = report.len(), "backup import rejected");
            return Err(report.into());
        }

        let mut snapshot = self.snapshot().clone();
        if mode == ImportMode::Replace {
            snapshot.plans.clear();
        }
        let mut staged = PlanStateManager::new(snapshot);

        let mut summary = ImportSummary::default();
        for backup_plan in &doc.meal_plans {
            let plan = staged.build_plan(backup_plan, &mut summary);
            staged.push_plan(plan);
        }

        self.replace_snapshot(staged.into_snapshot());
        info!(
            plans = summary.plans,
            days = summary.days,
            products = summary.products,
            ?mode,
            "backup imported"
        );
        Ok(summary)
    }

    fn build_plan(&mut self, source: &BackupPlan, summary: &mut ImportSummary) -> MealPlan {
        let mut plan = MealPlan::new(self.next_id(), source.name.trim());
        if let Some(created_at) = source.created_at {
            plan.created_at = created_at;
        }

        for source_day in &source.days {
            let mut day = Day::new(self.next_id(), source_day.day_number as u32);
            for source_meal in &source_day.meals {
                let mut meal = Meal::new(self.next_id(), source_meal.meal_type.trim());
                for source_product in &source_meal.products {
                    meal.products.push(Product::new(
                        self.next_id(),
                        display_name(&source_product.name),
                        source_product.weight as u32,
                    ));
                    summary.products += 1;
                }
                day.meals.push(meal);
            }
            plan.insert_day(day);
            summary.days += 1;
        }

        summary.plans += 1;
        plan
    }
}
