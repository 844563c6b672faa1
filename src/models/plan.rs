use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Product};

/// A named, reusable multi-day meal layout.
///
/// Days are kept sorted by `day_number`; their position in `days` defines the
/// repeating cycle the calculator projects across a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: EntityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl MealPlan {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
            days: Vec::new(),
        }
    }

    /// Day with the given 1-based `day_number`, if present.
    pub fn day_by_number(&self, day_number: u32) -> Option<&Day> {
        self.days.iter().find(|d| d.day_number == day_number)
    }

    pub fn day_by_number_mut(&mut self, day_number: u32) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.day_number == day_number)
    }

    /// Insert a day, keeping the cycle ordered by `day_number`.
    pub fn insert_day(&mut self, day: Day) {
        let pos = self
            .days
            .partition_point(|d| d.day_number <= day.day_number);
        self.days.insert(pos, day);
    }

    /// Restore `day_number` ordering after bulk edits.
    pub fn sort_days(&mut self) {
        self.days.sort_by_key(|d| d.day_number);
    }

    /// Every product in document order: days, then meals, then products.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.days
            .iter()
            .flat_map(|d| d.meals.iter())
            .flat_map(|m| m.products.iter())
    }

    pub fn product_count(&self) -> usize {
        self.products().count()
    }
}

/// One position in the plan's cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub id: EntityId,
    pub day_number: u32,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

impl Day {
    pub fn new(id: EntityId, day_number: u32) -> Self {
        Self {
            id,
            day_number,
            meals: Vec::new(),
        }
    }
}

/// A labelled meal (breakfast, dinner, ...) within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: EntityId,
    pub meal_type: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Meal {
    pub fn new(id: EntityId, meal_type: impl Into<String>) -> Self {
        Self {
            id,
            meal_type: meal_type.into(),
            products: Vec::new(),
        }
    }

    #[inline]
    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_day_keeps_number_order() {
        let mut plan = MealPlan::new(1, "Trip");
        plan.insert_day(Day::new(2, 3));
        plan.insert_day(Day::new(3, 1));
        plan.insert_day(Day::new(4, 2));

        let numbers: Vec<u32> = plan.days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_products_in_document_order() {
        let mut plan = MealPlan::new(1, "Trip");
        let mut day = Day::new(2, 1);
        let mut breakfast = Meal::new(3, "Breakfast");
        breakfast.products.push(Product::new(4, "Oats", 80));
        let mut dinner = Meal::new(5, "Dinner");
        dinner.products.push(Product::new(6, "Rice", 100));
        dinner.products.push(Product::new(7, "Cheese", 30));
        day.meals.push(breakfast);
        day.meals.push(dinner);
        plan.insert_day(day);

        let names: Vec<&str> = plan.products().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Oats", "Rice", "Cheese"]);
        assert_eq!(plan.product_count(), 3);
    }

    #[test]
    fn test_day_by_number() {
        let mut plan = MealPlan::new(1, "Trip");
        plan.insert_day(Day::new(2, 5));
        assert!(plan.day_by_number(5).is_some());
        assert!(plan.day_by_number(1).is_none());
    }
}
