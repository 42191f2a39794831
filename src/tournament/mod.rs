pub mod shared;
pub mod storage;
pub mod transfer;
pub mod types;

pub use shared::SharedTournament;
pub use storage::{get_state_path, import_file, load_tournament, save_tournament};
pub use transfer::{export_json, import_json};
pub use types::{Player, PlayerId, ScoreTable, SkillRecord, TournamentState, SCHEMA_VERSION};
