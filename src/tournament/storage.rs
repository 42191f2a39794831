use super::transfer::{export_json, import_json};
use super::types::TournamentState;
use crate::error::{Result, TournamentError};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the default state file path (~/.config/skill-tourney/tournament.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("tournament.json")
}

/// Load the tournament from a JSON file
///
/// If the file doesn't exist, returns a new empty tournament.
/// The file goes through the same validation as an import.
pub fn load_tournament(path: &Path) -> Result<TournamentState> {
    if !path.exists() {
        log::debug!("No state file at {}, starting empty", path.display());
        return Ok(TournamentState::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| TournamentError::Read(format!("{}: {}", path.display(), e)))?;
    let state = import_json(&content)?;

    log::debug!(
        "Loaded {} players from {}",
        state.players.len(),
        path.display()
    );
    Ok(state)
}

/// Save the tournament to a JSON file atomically
///
/// The file is either fully replaced or left untouched. Creates the parent
/// directory if it doesn't exist. Failure leaves the in-memory state as it
/// was; only durability is lost.
pub fn save_tournament(path: &Path, state: &TournamentState) -> Result<()> {
    let save_err = |e: std::io::Error| TournamentError::Save(format!("{}: {}", path.display(), e));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(save_err)?;
        }
    }

    let json = export_json(state)?;
    let mut file = AtomicWriteFile::open(path).map_err(save_err)?;
    file.write_all(json.as_bytes()).map_err(save_err)?;
    file.commit().map_err(save_err)?;

    log::debug!("Saved tournament to {}", path.display());
    Ok(())
}

/// Replace the tournament at `state_path` with the contents of `source`
///
/// The current state file is never read, so this also recovers a state file
/// that no longer loads. Nothing is written unless `source` fully validates.
pub fn import_file(source: &Path, state_path: &Path) -> Result<TournamentState> {
    let content = fs::read_to_string(source)
        .map_err(|e| TournamentError::Read(format!("{}: {}", source.display(), e)))?;
    let state = import_json(&content)?;
    save_tournament(state_path, &state)?;

    log::info!(
        "Imported {} players from {}",
        state.players.len(),
        source.display()
    );
    Ok(state)
}
