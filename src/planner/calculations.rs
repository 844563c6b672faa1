use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::error::{RaskladkaError, Result};
use crate::models::MealPlan;
use crate::planner::normalize::{canonical_key, display_name};

/// Validated trip length and headcount.
///
/// Both values are at least 1; the calculator relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripParams {
    trip_days: u32,
    people_count: u32,
}

impl TripParams {
    pub fn new(trip_days: u32, people_count: u32) -> Result<Self> {
        if trip_days == 0 {
            return Err(RaskladkaError::InvalidInput(
                "Trip length must be a positive number of days".to_string(),
            ));
        }
        if people_count == 0 {
            return Err(RaskladkaError::InvalidInput(
                "Headcount must be a positive number".to_string(),
            ));
        }
        Ok(Self {
            trip_days,
            people_count,
        })
    }

    #[inline]
    pub fn trip_days(&self) -> u32 {
        self.trip_days
    }

    #[inline]
    pub fn people_count(&self) -> u32 {
        self.people_count
    }
}

/// Reasons a plan cannot be turned into requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("no days in plan")]
    NoDays,

    #[error("no products in plan")]
    NoProducts,

    #[error("trip totals are too large to compute")]
    Overflow,
}

/// Aggregate need for one logical product over the whole trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRequirement {
    pub display_name: String,
    /// Grams for everyone, with the cycle replayed `layout_repetitions` times.
    pub total_weight: u64,
    pub total_occurrences: u64,
    /// Average grams per appearance for one person.
    pub weight_per_single_meal: f64,
    pub meal_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementsSummary {
    pub trip_days: u32,
    pub people_count: u32,
    pub layout_days_count: u32,
    pub layout_repetitions: u32,
    pub actual_days_used: u64,
    pub total_product_count: usize,
    pub total_weight: u64,
}

/// Result of projecting a plan across a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirements {
    /// Sorted by `total_weight`, heaviest first.
    pub products: Vec<ProductRequirement>,
    pub summary: RequirementsSummary,
    /// Per day index, the meal types that hold at least one product.
    pub meal_types_by_day: Vec<Vec<String>>,
    /// Per display name, day index to number of appearances on that day.
    pub product_meal_usage: BTreeMap<String, BTreeMap<usize, u32>>,
}

impl Requirements {
    /// How often `display_name` appears on cycle slot `day_index`.
    pub fn usage_at(&self, display_name: &str, day_index: usize) -> u32 {
        self.product_meal_usage
            .get(display_name)
            .and_then(|days| days.get(&day_index))
            .copied()
            .unwrap_or(0)
    }
}

/// Running totals for one canonical product across a single cycle.
#[derive(Debug)]
struct ProductTally {
    display_name: String,
    weight: u64,
    occurrences: u64,
    meal_types: Vec<String>,
    usage_by_day: BTreeMap<usize, u32>,
}

impl ProductTally {
    fn new(display_name: String) -> Self {
        Self {
            display_name,
            weight: 0,
            occurrences: 0,
            meal_types: Vec::new(),
            usage_by_day: BTreeMap::new(),
        }
    }

    fn weight_per_single_meal(&self) -> f64 {
        if self.occurrences == 0 {
            0.0
        } else {
            self.weight as f64 / self.occurrences as f64
        }
    }
}

/// Tally every product of the plan by canonical key.
///
/// Tallies are returned in first-seen order: days by position, then meals,
/// then products as stored.
fn tally_products(plan: &MealPlan) -> Vec<ProductTally> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<ProductTally> = Vec::new();

    for (day_index, day) in plan.days.iter().enumerate() {
        for meal in &day.meals {
            for product in &meal.products {
                let key = canonical_key(&product.name);
                let slot = *index.entry(key).or_insert_with(|| {
                    tallies.push(ProductTally::new(display_name(&product.name)));
                    tallies.len() - 1
                });

                let tally = &mut tallies[slot];
                tally.weight += u64::from(product.weight);
                tally.occurrences += 1;
                if !tally.meal_types.contains(&meal.meal_type) {
                    tally.meal_types.push(meal.meal_type.clone());
                }
                *tally.usage_by_day.entry(day_index).or_insert(0) += 1;
            }
        }
    }

    tallies
}

/// Meal types per day index, skipping meals without products.
fn meal_types_by_day(plan: &MealPlan) -> Vec<Vec<String>> {
    plan.days
        .iter()
        .map(|day| {
            day.meals
                .iter()
                .filter(|m| m.has_products())
                .map(|m| m.meal_type.clone())
                .collect()
        })
        .collect()
}

/// Compute how much of every product a trip needs.
///
/// The plan's days form a cycle that is replayed
/// `ceil(trip_days / layout_days_count)` whole times. Totals here always count
/// complete cycles; the per-slot cap for a partial last cycle is applied by
/// [`build_usage_table`](crate::planner::build_usage_table).
pub fn calculate(
    plan: &MealPlan,
    params: TripParams,
) -> std::result::Result<Requirements, CalculationError> {
    if plan.days.is_empty() {
        return Err(CalculationError::NoDays);
    }

    let tallies = tally_products(plan);
    if tallies.is_empty() {
        return Err(CalculationError::NoProducts);
    }

    let layout_days_count =
        u32::try_from(plan.days.len()).map_err(|_| CalculationError::Overflow)?;
    let layout_repetitions = params.trip_days().div_ceil(layout_days_count);
    let actual_days_used = u64::from(layout_repetitions) * u64::from(layout_days_count);
    let repetitions = u64::from(layout_repetitions);
    let people = u64::from(params.people_count());

    let mut products: Vec<ProductRequirement> = tallies
        .iter()
        .map(|t| -> std::result::Result<ProductRequirement, CalculationError> {
            let total_weight = t
                .weight
                .checked_mul(repetitions)
                .and_then(|w| w.checked_mul(people))
                .ok_or(CalculationError::Overflow)?;
            let total_occurrences = t
                .occurrences
                .checked_mul(repetitions)
                .ok_or(CalculationError::Overflow)?;
            Ok(ProductRequirement {
                display_name: t.display_name.clone(),
                total_weight,
                total_occurrences,
                weight_per_single_meal: t.weight_per_single_meal(),
                meal_types: t.meal_types.clone(),
            })
        })
        .collect::<std::result::Result<_, _>>()?;

    // Stable: equal weights keep first-seen order.
    products.sort_by(|a, b| b.total_weight.cmp(&a.total_weight));

    let mut product_meal_usage: BTreeMap<String, BTreeMap<usize, u32>> = BTreeMap::new();
    for tally in tallies {
        let usage = product_meal_usage.entry(tally.display_name).or_default();
        for (day_index, count) in tally.usage_by_day {
            *usage.entry(day_index).or_insert(0) += count;
        }
    }

    let total_weight = products
        .iter()
        .try_fold(0u64, |sum, p| sum.checked_add(p.total_weight))
        .ok_or(CalculationError::Overflow)?;

    debug!(
        plan = %plan.name,
        layout_days_count,
        layout_repetitions,
        products = products.len(),
        total_weight,
        "calculated requirements"
    );

    Ok(Requirements {
        summary: RequirementsSummary {
            trip_days: params.trip_days(),
            people_count: params.people_count(),
            layout_days_count,
            layout_repetitions,
            actual_days_used,
            total_product_count: products.len(),
            total_weight,
        },
        products,
        meal_types_by_day: meal_types_by_day(plan),
        product_meal_usage,
    })
}
