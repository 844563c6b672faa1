use clap::Parser;
use std::fs;
use std::path::Path;

use raskladka::cli::{Cli, Command, TripArgs};
use raskladka::error::Result;
use raskladka::interface::{
    collect_trip_params, display_plan, display_plan_list, display_requirements,
    display_usage_table, prompt_yes_no, write_usage_csv_file,
};
use raskladka::logging;
use raskladka::planner::{build_usage_table, calculate};
use raskladka::state::{
    BackupDocument, CommandOutcome, ImportMode, JsonFileRepository, PlanCommand,
    PlanRepository, PlanStateManager,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let repo = JsonFileRepository::new(&cli.file);
    let mut manager = PlanStateManager::new(repo.load()?);

    match cli.command.unwrap_or_default() {
        Command::List => {
            display_plan_list(manager.plans());
            Ok(())
        }
        Command::Init => cmd_init(&repo, &mut manager),
        Command::Show { plan } => {
            display_plan(manager.find_plan(plan.as_deref())?);
            Ok(())
        }
        Command::Calculate {
            plan,
            trip,
            json,
            table,
        } => cmd_calculate(&manager, plan.as_deref(), trip, json, table),
        Command::Export { plan, trip, output } => {
            cmd_export(&manager, plan.as_deref(), trip, &output)
        }
        Command::Settings { trip, lock, unlock } => {
            cmd_settings(&repo, &mut manager, trip, lock, unlock)
        }
        Command::Backup { output } => cmd_backup(&manager, &output),
        Command::Import { input, merge, yes } => {
            cmd_import(&repo, &mut manager, &input, merge, yes)
        }
        edit => match edit.to_plan_command() {
            Some(plan_command) => cmd_mutate(&repo, &mut manager, plan_command),
            None => Ok(()),
        },
    }
}

/// Apply one edit to the stored plans and save.
fn cmd_mutate(
    repo: &JsonFileRepository,
    manager: &mut PlanStateManager,
    command: PlanCommand,
) -> Result<()> {
    let label = command.name();
    let outcome = manager.apply(command)?;
    repo.save(manager.snapshot())?;

    match outcome {
        CommandOutcome::Created(id) => println!("{}: created #{}", label, id),
        CommandOutcome::Updated => println!("{}: updated", label),
        CommandOutcome::Deleted => println!("{}: deleted", label),
    }
    Ok(())
}

/// Create the default plan on first use.
fn cmd_init(repo: &JsonFileRepository, manager: &mut PlanStateManager) -> Result<()> {
    match manager.ensure_default_plan()? {
        Some(id) => {
            repo.save(manager.snapshot())?;
            println!("Created default plan #{} in {}", id, repo.path().display());
        }
        None => println!("Plans already exist; nothing to do."),
    }
    Ok(())
}

/// Calculate the shopping list for a plan.
fn cmd_calculate(
    manager: &PlanStateManager,
    plan: Option<&str>,
    trip: TripArgs,
    json: bool,
    table: bool,
) -> Result<()> {
    let plan = manager.find_plan(plan)?;
    let params = collect_trip_params(manager.settings(), trip.days, trip.people)?;
    let requirements = calculate(plan, params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&requirements)?);
        return Ok(());
    }

    display_requirements(&plan.name, &requirements);
    if table {
        display_usage_table(&build_usage_table(&requirements, params));
    }
    Ok(())
}

/// Write the per-ration usage table to CSV.
fn cmd_export(
    manager: &PlanStateManager,
    plan: Option<&str>,
    trip: TripArgs,
    output: &Path,
) -> Result<()> {
    let plan = manager.find_plan(plan)?;
    let params = collect_trip_params(manager.settings(), trip.days, trip.people)?;
    let requirements = calculate(plan, params)?;
    let table = build_usage_table(&requirements, params);

    write_usage_csv_file(&table, output)?;
    println!(
        "Exported {} product(s) to {}",
        table.rows.len(),
        output.display()
    );
    Ok(())
}

/// Store trip parameters and toggle the lock.
fn cmd_settings(
    repo: &JsonFileRepository,
    manager: &mut PlanStateManager,
    trip: TripArgs,
    lock: bool,
    unlock: bool,
) -> Result<()> {
    if unlock {
        manager.set_params_locked(false);
    }
    manager.update_settings(trip.days, trip.people)?;
    if lock {
        manager.set_params_locked(true);
    }
    repo.save(manager.snapshot())?;

    let settings = manager.settings();
    let show = |value: Option<u32>| value.map_or("-".to_string(), |v| v.to_string());
    println!(
        "Trip days: {}, people: {}{}",
        show(settings.trip_days),
        show(settings.people_count),
        if settings.params_locked { " (locked)" } else { "" }
    );
    Ok(())
}

/// Write all plans to a backup file.
fn cmd_backup(manager: &PlanStateManager, output: &Path) -> Result<()> {
    let doc = manager.export_backup();
    fs::write(output, doc.to_json()?)?;
    println!(
        "Backed up {} plan(s) to {}",
        doc.meal_plans.len(),
        output.display()
    );
    Ok(())
}

/// Import plans from a backup file.
fn cmd_import(
    repo: &JsonFileRepository,
    manager: &mut PlanStateManager,
    input: &Path,
    merge: bool,
    yes: bool,
) -> Result<()> {
    let doc = BackupDocument::from_json(&fs::read_to_string(input)?)?;
    let mode = if merge {
        ImportMode::Merge
    } else {
        ImportMode::Replace
    };

    if mode == ImportMode::Replace && !manager.plans().is_empty() && !yes {
        let prompt = format!(
            "Replace {} stored plan(s) with the backup?",
            manager.plans().len()
        );
        if !prompt_yes_no(&prompt, false)? {
            println!("Import cancelled.");
            return Ok(());
        }
    }

    let summary = manager.import_backup(&doc, mode)?;
    repo.save(manager.snapshot())?;
    println!(
        "Imported {} plan(s), {} day(s), {} product(s).",
        summary.plans, summary.days, summary.products
    );
    Ok(())
}
