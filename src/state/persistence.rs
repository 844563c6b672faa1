use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;
use crate::models::{EntityId, MealPlan, TripSettings};

/// Layout version of the state file.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Everything one user has stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Last identifier handed out.
    #[serde(default)]
    pub next_id: EntityId,

    #[serde(default)]
    pub plans: Vec<MealPlan>,

    #[serde(default)]
    pub settings: TripSettings,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_id: 0,
            plans: Vec::new(),
            settings: TripSettings::default(),
        }
    }
}

impl StoreSnapshot {
    /// Restore invariants a hand-edited file may have broken: days ordered by
    /// `day_number` and `next_id` above every id in use.
    fn normalize(&mut self) {
        let mut max_id = self.next_id;
        for plan in &mut self.plans {
            plan.sort_days();
            max_id = max_id.max(plan.id);
            for day in &plan.days {
                max_id = max_id.max(day.id);
                for meal in &day.meals {
                    max_id = max_id.max(meal.id);
                    for product in &meal.products {
                        max_id = max_id.max(product.id);
                    }
                }
            }
        }
        self.next_id = max_id;
        self.schema_version = SCHEMA_VERSION;
    }
}

/// Storage seam for the state manager.
pub trait PlanRepository {
    fn load(&self) -> Result<StoreSnapshot>;
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

/// Load a snapshot from a JSON file.
///
/// A missing file is an empty store.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<StoreSnapshot> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "state file missing, starting empty");
        return Ok(StoreSnapshot::default());
    }

    let content = fs::read_to_string(path)?;
    let mut snapshot: StoreSnapshot = serde_json::from_str(&content)?;
    snapshot.normalize();
    Ok(snapshot)
}

/// Save a snapshot to a JSON file.
///
/// Writes a sibling temp file and renames it over `path`, so readers see
/// either the old or the new state.
pub fn save_snapshot<P: AsRef<Path>>(path: P, snapshot: &StoreSnapshot) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let json = serde_json::to_string_pretty(snapshot)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)?;

    debug!(path = %path.display(), plans = snapshot.plans.len(), "state saved");
    Ok(())
}

/// State kept in a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlanRepository for JsonFileRepository {
    fn load(&self) -> Result<StoreSnapshot> {
        load_snapshot(&self.path)
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        save_snapshot(&self.path, snapshot)
    }
}

/// State kept in memory; counts saves so tests can assert on writes.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    snapshot: RefCell<StoreSnapshot>,
    saves: Cell<usize>,
}

impl MemoryRepository {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot: RefCell::new(snapshot),
            saves: Cell::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PlanRepository for MemoryRepository {
    fn load(&self) -> Result<StoreSnapshot> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        *self.snapshot.borrow_mut() = snapshot.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Meal, Product};
    use tempfile::tempdir;

    fn sample_snapshot() -> StoreSnapshot {
        let mut plan = MealPlan::new(1, "Altai");
        let mut day = Day::new(2, 1);
        let mut meal = Meal::new(3, "Breakfast");
        meal.products.push(Product::new(4, "Oats", 80));
        day.meals.push(meal);
        plan.insert_day(day);

        StoreSnapshot {
            next_id: 4,
            plans: vec![plan],
            ..StoreSnapshot::default()
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let snapshot = load_snapshot(dir.path().join("absent.json")).unwrap();
        assert!(snapshot.plans.is_empty());
        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("state.json"));

        repo.save(&sample_snapshot()).unwrap();
        let reloaded = repo.load().unwrap();

        assert_eq!(reloaded, sample_snapshot());
    }

    #[test]
    fn test_load_repairs_order_and_next_id() {
        let json = r#"{
            "next_id": 0,
            "plans": [{
                "id": 1, "name": "Trip", "created_at": "2025-08-24T10:00:00Z",
                "days": [
                    {"id": 9, "day_number": 2, "meals": []},
                    {"id": 5, "day_number": 1, "meals": []}
                ]
            }]
        }"#;
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, json).unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        let numbers: Vec<u32> = snapshot.plans[0].days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(snapshot.next_id, 9);
    }

    #[test]
    fn test_memory_repository_counts_saves() {
        let repo = MemoryRepository::default();
        assert_eq!(repo.save_count(), 0);
        repo.save(&sample_snapshot()).unwrap();
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load().unwrap().plans.len(), 1);
    }
}
