mod backup;
mod commands;
mod manager;
mod persistence;

pub use backup::{
    BackupDay, BackupDocument, BackupMeal, BackupPlan, BackupProduct, ImportMode, ImportSummary,
};
pub use commands::{CommandOutcome, PlanCommand};
pub use manager::PlanStateManager;
pub use persistence::{
    load_snapshot, save_snapshot, JsonFileRepository, MemoryRepository, PlanRepository,
    StoreSnapshot, SCHEMA_VERSION,
};
