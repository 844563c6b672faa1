use dialoguer::{Confirm, Input};

use crate::error::{RaskladkaError, Result};
use crate::models::TripSettings;
use crate::planner::TripParams;

/// Prompt for a positive whole number.
fn prompt_positive(prompt: &str, default: Option<u32>) -> Result<u32> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(value) = default {
        input = input.default(value.to_string());
    }
    let text = input.interact_text()?;

    match text.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        Ok(_) => Err(RaskladkaError::InvalidInput(format!(
            "{} must be a positive number",
            prompt
        ))),
        Err(_) => Err(RaskladkaError::InvalidInput(format!(
            "{} must be a number",
            prompt
        ))),
    }
}

/// Prompt for the trip length in days.
pub fn prompt_trip_days(default: Option<u32>) -> Result<u32> {
    prompt_positive("Trip length (days)", default)
}

/// Prompt for the number of people.
pub fn prompt_people_count(default: Option<u32>) -> Result<u32> {
    prompt_positive("Number of people", default)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect trip parameters: explicit flags, then stored settings, then prompts.
pub fn collect_trip_params(
    settings: &TripSettings,
    trip_days: Option<u32>,
    people_count: Option<u32>,
) -> Result<TripParams> {
    let (trip_days, people_count) = settings.resolve(trip_days, people_count);

    let trip_days = match trip_days {
        Some(days) => days,
        None => prompt_trip_days(None)?,
    };
    let people_count = match people_count {
        Some(people) => people,
        None => prompt_people_count(None)?,
    };

    TripParams::new(trip_days, people_count)
}
