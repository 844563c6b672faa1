use crate::models::MealPlan;
use crate::planner::constants::GRAMS_PER_KG;
use crate::planner::{Requirements, UsageTable};

/// Format grams for people: kilograms with one decimal from 1 kg up.
pub fn format_weight(grams: f64) -> String {
    if grams >= GRAMS_PER_KG as f64 {
        format!("{:.1} kg", grams / GRAMS_PER_KG as f64)
    } else {
        format!("{} g", grams as u64)
    }
}

/// List stored plans with their size.
pub fn display_plan_list(plans: &[MealPlan]) {
    if plans.is_empty() {
        println!("No plans stored. Use 'create-plan' or 'init' to start one.");
        return;
    }

    println!();
    println!("=== Plans ({}) ===", plans.len());
    println!();

    for plan in plans {
        println!(
            "  #{:<4} {} - {} day(s), {} product(s), created {}",
            plan.id,
            plan.name,
            plan.days.len(),
            plan.product_count(),
            plan.created_at.format("%Y-%m-%d")
        );
    }

    println!();
}

/// Print a plan as a tree of days, meals and products with their ids.
pub fn display_plan(plan: &MealPlan) {
    println!();
    println!("=== {} (#{}) ===", plan.name, plan.id);

    if plan.days.is_empty() {
        println!("  (no days)");
    }

    for day in &plan.days {
        println!();
        println!("Day {} [#{}]", day.day_number, day.id);

        if day.meals.is_empty() {
            println!("    (no meals)");
        }

        for meal in &day.meals {
            println!("    {} [#{}]", meal.meal_type, meal.id);
            for product in &meal.products {
                println!(
                    "        - {} {} [#{}]",
                    product.name,
                    format_weight(f64::from(product.weight)),
                    product.id
                );
            }
        }
    }

    println!();
}

/// Display calculated requirements as a shopping list with a summary.
pub fn display_requirements(plan_name: &str, requirements: &Requirements) {
    let summary = &requirements.summary;

    println!();
    println!("=== Shopping list: {} ===", plan_name);
    println!();

    let max_name_len = requirements
        .products
        .iter()
        .map(|p| p.display_name.chars().count())
        .max()
        .unwrap_or(10);

    for (i, product) in requirements.products.iter().enumerate() {
        println!(
            "{:>3}. {:<width$} {:>10}  x{:<4} ({:.0} g per meal; {})",
            i + 1,
            product.display_name,
            format_weight(product.total_weight as f64),
            product.total_occurrences,
            product.weight_per_single_meal,
            product.meal_types.join(", "),
            width = max_name_len
        );
    }

    println!();
    println!("--- Summary ---");
    println!(
        "Trip: {} day(s) for {} person(s)",
        summary.trip_days, summary.people_count
    );
    println!(
        "Plan cycle: {} day(s), repeated {} time(s) ({} days covered)",
        summary.layout_days_count, summary.layout_repetitions, summary.actual_days_used
    );
    println!("Products: {}", summary.total_product_count);
    println!("Total weight: {}", format_weight(summary.total_weight as f64));
    println!();
}

/// Display the per-slot usage table.
pub fn display_usage_table(table: &UsageTable) {
    println!("=== Usage by ration (one meal for {} people) ===", table.people_count);
    println!();

    let name_width = table
        .rows
        .iter()
        .map(|r| r.product.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut header = format!("{:<width$} {:>10}", "Product", "Per meal", width = name_width);
    for slot in &table.slots {
        header.push_str(&format!(" {:>5}", format!("R{}", slot.index + 1)));
    }
    header.push_str(&format!(" {:>6} {:>10}", "Times", "Total"));
    println!("{}", header);

    for row in &table.rows {
        let mut line = format!(
            "{:<width$} {:>10}",
            row.product,
            format_weight(row.weight_for_people_one_meal),
            width = name_width
        );
        for count in &row.slot_occurrences {
            if *count > 0 {
                line.push_str(&format!(" {:>5}", count));
            } else {
                line.push_str(&format!(" {:>5}", ""));
            }
        }
        line.push_str(&format!(
            " {:>6} {:>10}",
            row.total_occurrences,
            format_weight(row.total_weight)
        ));
        println!("{}", line);
    }

    println!();
    for slot in &table.slots {
        if !slot.meal_types.is_empty() {
            println!("  R{}: {}", slot.index + 1, slot.meal_types.join(", "));
        }
    }
    println!("Grand total: {}", format_weight(table.grand_total));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(500.0), "500 g");
        assert_eq!(format_weight(999.9), "999 g");
        assert_eq!(format_weight(1000.0), "1.0 kg");
        assert_eq!(format_weight(1540.0), "1.5 kg");
    }
}
