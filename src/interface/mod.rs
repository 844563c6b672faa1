pub mod export;
pub mod prompts;
pub mod render;

pub use export::{write_usage_csv, write_usage_csv_file};
pub use prompts::{collect_trip_params, prompt_people_count, prompt_trip_days, prompt_yes_no};
pub use render::{
    display_plan, display_plan_list, display_requirements, display_usage_table, format_weight,
};
