use serde_json::{Map, Value};
use std::collections::HashSet;

use super::types::{TournamentState, SCHEMA_VERSION};
use crate::error::{Result, TournamentError};

/// Parse and validate tournament data from its JSON form.
///
/// Versioned files must carry the current `version`. Files without a version
/// are accepted only when every score entry is a `{sum, count}` object; the
/// older bare-number layout is rejected. Nothing is returned unless the whole
/// document is valid, so a failed import cannot leave half-applied state.
pub fn import_json(content: &str) -> Result<TournamentState> {
    let mut value: Value =
        serde_json::from_str(content).map_err(|e| TournamentError::Read(e.to_string()))?;

    let object = value
        .as_object_mut()
        .ok_or_else(|| TournamentError::Format("expected a JSON object".to_string()))?;
    for field in ["players", "tournamentScores"] {
        if object.get(field).map_or(true, Value::is_null) {
            return Err(TournamentError::Format(format!("missing '{}'", field)));
        }
    }

    match object.get("version").cloned() {
        None => {
            check_score_entries(object)?;
            object.insert("version".to_string(), Value::from(SCHEMA_VERSION));
            log::info!(
                "Migrating unversioned tournament data to schema version {}",
                SCHEMA_VERSION
            );
        }
        Some(v) if v.as_u64() == Some(SCHEMA_VERSION as u64) => {}
        Some(v) => {
            return Err(TournamentError::Format(format!(
                "unsupported schema version {} (expected {})",
                v, SCHEMA_VERSION
            )));
        }
    }

    let mut state: TournamentState =
        serde_json::from_value(value).map_err(|e| TournamentError::Format(e.to_string()))?;

    let mut seen = HashSet::new();
    for player in &state.players {
        if !seen.insert(player.id.key()) {
            return Err(TournamentError::Format(format!(
                "duplicate player id {}",
                player.id
            )));
        }
    }

    let pruned = state.prune_orphans();
    if pruned > 0 {
        log::warn!("Dropped {} score entries with no matching player", pruned);
    }
    state.ensure_slots();

    Ok(state)
}

/// Serialize tournament data in its saved/exported form (pretty-printed)
pub fn export_json(state: &TournamentState) -> Result<String> {
    serde_json::to_string_pretty(state).map_err(|e| TournamentError::Save(e.to_string()))
}

/// Reject the legacy layout where a player's score was a bare number
fn check_score_entries(object: &Map<String, Value>) -> Result<()> {
    let scores = object
        .get("tournamentScores")
        .and_then(Value::as_object)
        .ok_or_else(|| TournamentError::Format("'tournamentScores' must be an object".into()))?;

    for (challenge, by_player) in scores {
        let by_player = by_player.as_object().ok_or_else(|| {
            TournamentError::Format(format!("scores for '{}' must be an object", challenge))
        })?;
        for (player, entry) in by_player {
            let has_sum = entry.as_object().is_some_and(|e| e.contains_key("sum"));
            if !has_sum {
                return Err(TournamentError::Format(format!(
                    "legacy score format for player {} in '{}': expected {{sum, count}}",
                    player, challenge
                )));
            }
        }
    }
    Ok(())
}
