use serde::Serialize;

use crate::planner::calculations::{Requirements, TripParams};

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Times cycle slot `slot` recurs within the first `trip_days` days.
///
/// Slots past the end of a trip shorter than one cycle never occur.
pub fn slot_repetitions(slot: u32, trip_days: u32, layout_days_count: u32) -> u32 {
    if slot >= trip_days || layout_days_count == 0 {
        0
    } else {
        (trip_days - 1 - slot) / layout_days_count + 1
    }
}

/// Column header for one cycle slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotHeader {
    pub index: usize,
    pub meal_types: Vec<String>,
}

impl SlotHeader {
    /// "Ration 2" followed by the slot's meal types on a second line.
    ///
    /// A slot without meal types repeats its title there, so every header
    /// spans two lines.
    pub fn label(&self) -> String {
        let title = format!("Ration {}", self.index + 1);
        if self.meal_types.is_empty() {
            format!("{}\n{}", title, title)
        } else {
            format!("{}\n{}", title, self.meal_types.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRow {
    pub product: String,
    /// Grams for one appearance, for the whole group.
    pub weight_for_people_one_meal: f64,
    /// Appearances per slot over the trip, already multiplied by repetitions.
    pub slot_occurrences: Vec<u64>,
    pub total_occurrences: u64,
    pub total_weight: f64,
}

/// Day-by-day usage matrix, ready for tabular export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageTable {
    pub people_count: u32,
    pub slots: Vec<SlotHeader>,
    pub rows: Vec<UsageRow>,
    /// Sum of every row's `total_weight`.
    pub grand_total: f64,
}

/// Project requirements onto a per-slot usage table.
///
/// Unlike the aggregate totals, which always count whole cycles, each slot
/// here is counted only as often as it falls inside the trip. For trips that
/// are not a whole number of cycles the two figures differ.
pub fn build_usage_table(requirements: &Requirements, params: TripParams) -> UsageTable {
    let layout_days_count = requirements.summary.layout_days_count;
    let trip_days = params.trip_days();
    let people = f64::from(params.people_count());

    let repetitions: Vec<u64> = (0..layout_days_count)
        .map(|slot| u64::from(slot_repetitions(slot, trip_days, layout_days_count)))
        .collect();

    let slots = (0..layout_days_count as usize)
        .map(|index| SlotHeader {
            index,
            meal_types: requirements
                .meal_types_by_day
                .get(index)
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    let rows: Vec<UsageRow> = requirements
        .products
        .iter()
        .map(|product| {
            let weight_for_people = product.weight_per_single_meal * people;

            let slot_occurrences: Vec<u64> = repetitions
                .iter()
                .enumerate()
                .map(|(slot, reps)| {
                    u64::from(requirements.usage_at(&product.display_name, slot)) * reps
                })
                .collect();
            let total_occurrences: u64 = slot_occurrences.iter().sum();

            UsageRow {
                product: product.display_name.clone(),
                weight_for_people_one_meal: round2(weight_for_people),
                slot_occurrences,
                total_occurrences,
                total_weight: round2(total_occurrences as f64 * weight_for_people),
            }
        })
        .collect();

    let grand_total = round2(rows.iter().map(|r| r.total_weight).sum());

    UsageTable {
        people_count: params.people_count(),
        slots,
        rows,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_repetitions_longer_trip() {
        assert_eq!(slot_repetitions(0, 4, 3), 2);
        assert_eq!(slot_repetitions(1, 4, 3), 1);
        assert_eq!(slot_repetitions(2, 4, 3), 1);
    }

    #[test]
    fn test_slot_repetitions_shorter_trip() {
        assert_eq!(slot_repetitions(0, 2, 3), 1);
        assert_eq!(slot_repetitions(1, 2, 3), 1);
        assert_eq!(slot_repetitions(2, 2, 3), 0);
    }

    #[test]
    fn test_slot_repetitions_whole_cycles() {
        for slot in 0..3 {
            assert_eq!(slot_repetitions(slot, 9, 3), 3);
        }
    }

    #[test]
    fn test_slot_label() {
        let empty = SlotHeader {
            index: 0,
            meal_types: vec![],
        };
        assert_eq!(empty.label(), "Ration 1\nRation 1");

        let full = SlotHeader {
            index: 1,
            meal_types: vec!["Breakfast".to_string(), "Dinner".to_string()],
        };
        assert_eq!(full.label(), "Ration 2\nBreakfast, Dinner");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(12.5), 12.5);
    }
}
