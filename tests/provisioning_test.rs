#[macro_use]
extern crate assert_float_eq;

use raskladka::models::{Day, Meal, MealPlan, Product};
use raskladka::planner::{build_usage_table, calculate, slot_repetitions, TripParams};

/// Build a plan from `(meal_type, [(name, weight)])` lists, one per day.
fn make_plan(days: &[&[(&str, &[(&str, u32)])]]) -> MealPlan {
    let mut next_id = 1;
    let mut id = || {
        next_id += 1;
        next_id
    };

    let mut plan = MealPlan::new(id(), "Test");
    for (i, meals) in days.iter().enumerate() {
        let mut day = Day::new(id(), i as u32 + 1);
        for (meal_type, products) in meals.iter() {
            let mut meal = Meal::new(id(), *meal_type);
            for (name, weight) in products.iter() {
                meal.products.push(Product::new(id(), *name, *weight));
            }
            day.meals.push(meal);
        }
        plan.insert_day(day);
    }
    plan
}

fn params(trip_days: u32, people_count: u32) -> TripParams {
    TripParams::new(trip_days, people_count).unwrap()
}

#[test]
fn test_whole_cycles_scale_linearly() {
    let plan = make_plan(&[
        &[
            ("Breakfast", &[("Oats", 80), ("Sugar", 15)]),
            ("Dinner", &[("Rice", 100)]),
        ],
        &[("Dinner", &[("Buckwheat", 90), ("Rice", 60)])],
    ]);

    let one = calculate(&plan, params(2, 3)).unwrap();
    let three = calculate(&plan, params(6, 3)).unwrap();

    assert_eq!(one.products.len(), three.products.len());
    for (a, b) in one.products.iter().zip(&three.products) {
        assert_eq!(a.display_name, b.display_name);
        assert_eq!(a.total_weight * 3, b.total_weight);
        assert_eq!(a.total_occurrences * 3, b.total_occurrences);
    }
    assert_eq!(one.summary.total_weight * 3, three.summary.total_weight);
}

#[test]
fn test_partial_cycle_rounds_up() {
    let plan = make_plan(&[
        &[("Breakfast", &[("Oats", 80)])],
        &[("Breakfast", &[("Oats", 80)])],
        &[("Breakfast", &[("Oats", 80)])],
    ]);

    let req = calculate(&plan, params(7, 1)).unwrap();
    assert_eq!(req.summary.layout_days_count, 3);
    assert_eq!(req.summary.layout_repetitions, 3);
    assert_eq!(req.summary.actual_days_used, 9);
    assert_eq!(req.products[0].total_weight, 80 * 3 * 3);
}

#[test]
fn test_name_variants_merge() {
    let plan = make_plan(&[&[
        ("Breakfast", &[(" Rice ", 100)]),
        ("Dinner", &[("rice", 50)]),
    ]]);

    let req = calculate(&plan, params(2, 2)).unwrap();
    assert_eq!(req.products.len(), 1);

    let rice = &req.products[0];
    assert_eq!(rice.display_name, "Rice");
    assert_eq!(rice.total_weight, 150 * 2 * 2);
    assert_eq!(rice.total_occurrences, 4);
    assert_float_absolute_eq!(rice.weight_per_single_meal, 75.0, 1e-9);
    assert_eq!(rice.meal_types, vec!["Breakfast", "Dinner"]);
}

#[test]
fn test_sorted_heaviest_first() {
    let plan = make_plan(&[&[(
        "Lunch",
        &[("Cheese", 500), ("Flour", 1500), ("Tea", 300)],
    )]]);

    let req = calculate(&plan, params(1, 1)).unwrap();
    let weights: Vec<u64> = req.products.iter().map(|p| p.total_weight).collect();
    assert_eq!(weights, vec![1500, 500, 300]);
    assert_eq!(req.products[0].display_name, "Flour");
}

#[test]
fn test_slot_repetitions_examples() {
    let reps: Vec<u32> = (0..3).map(|slot| slot_repetitions(slot, 4, 3)).collect();
    assert_eq!(reps, vec![2, 1, 1]);

    let reps: Vec<u32> = (0..3).map(|slot| slot_repetitions(slot, 2, 3)).collect();
    assert_eq!(reps, vec![1, 1, 0]);
}

#[test]
fn test_usage_table_caps_partial_cycle() {
    let plan = make_plan(&[
        &[("Breakfast", &[("Oats", 80)])],
        &[("Lunch", &[("Cheese", 40)])],
        &[("Dinner", &[("Pasta", 100)])],
    ]);
    let trip = params(4, 2);

    let req = calculate(&plan, trip).unwrap();
    let table = build_usage_table(&req, trip);

    // Aggregate counts two whole cycles for every product.
    let pasta = req
        .products
        .iter()
        .find(|p| p.display_name == "Pasta")
        .unwrap();
    assert_eq!(pasta.total_occurrences, 2);
    assert_eq!(pasta.total_weight, 400);

    // The table only counts slots that fall inside the trip.
    let oats = table.rows.iter().find(|r| r.product == "Oats").unwrap();
    assert_eq!(oats.slot_occurrences, vec![2, 0, 0]);
    assert_eq!(oats.total_occurrences, 2);

    let pasta_row = table.rows.iter().find(|r| r.product == "Pasta").unwrap();
    assert_eq!(pasta_row.slot_occurrences, vec![0, 0, 1]);
    assert_float_absolute_eq!(pasta_row.weight_for_people_one_meal, 200.0, 1e-9);
    assert_float_absolute_eq!(pasta_row.total_weight, 200.0, 1e-9);

    let sum: f64 = table.rows.iter().map(|r| r.total_weight).sum();
    assert_float_absolute_eq!(table.grand_total, sum, 1e-9);
    assert_eq!(table.slots[2].label(), "Ration 3\nDinner");
}

#[test]
fn test_usage_table_short_trip_skips_late_slots() {
    let plan = make_plan(&[
        &[("Breakfast", &[("Oats", 80)])],
        &[("Breakfast", &[("Oats", 80)])],
        &[("Breakfast", &[("Oats", 80)])],
    ]);
    let trip = params(2, 1);

    let req = calculate(&plan, trip).unwrap();
    let table = build_usage_table(&req, trip);

    assert_eq!(table.rows[0].slot_occurrences, vec![1, 1, 0]);
    assert_eq!(table.rows[0].total_occurrences, 2);
    assert_eq!(req.products[0].total_occurrences, 3);
}

#[test]
fn test_empty_plan_is_reported() {
    let plan = MealPlan::new(1, "Empty");
    assert!(calculate(&plan, params(3, 2)).is_err());

    let plan = make_plan(&[&[("Breakfast", &[])]]);
    assert!(calculate(&plan, params(3, 2)).is_err());
}

#[test]
fn test_long_s_spelling_merges_into_one_row() {
    let plan = make_plan(&[&[
        ("Breakfast", &[("salt", 5)]),
        ("Dinner", &[("ſalt", 5)]),
    ]]);
    let trip = params(2, 10);

    let req = calculate(&plan, trip).unwrap();
    assert_eq!(req.products.len(), 1);
    assert_eq!(req.products[0].display_name, "Salt");
    assert_eq!(req.products[0].total_occurrences, 4);

    let table = build_usage_table(&req, trip);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].slot_occurrences, vec![4]);
    assert_float_absolute_eq!(table.rows[0].total_weight, 200.0, 1e-9);
}
