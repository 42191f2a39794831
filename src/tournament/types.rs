use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::catalog;
use crate::error::{Result, TournamentError};
use crate::scoring::aggregator;

/// Current schema version written to saved and exported files
pub const SCHEMA_VERSION: u32 = 2;

/// Per-challenge map of player key -> running record
pub type ScoreTable = BTreeMap<String, BTreeMap<String, SkillRecord>>;

/// Opaque player identifier.
///
/// Saved files may carry either numeric or string ids; both round-trip
/// unchanged, including negative and fractional numbers. Ids created by this
/// crate are always non-negative integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    Number(Number),
    Text(String),
}

impl PlayerId {
    /// String form used as the key inside `tournamentScores`.
    ///
    /// Whole floats key like the integer they equal, so `7.0` and `7` share
    /// a slot.
    pub fn key(&self) -> String {
        match self {
            PlayerId::Number(n) => number_key(n),
            PlayerId::Text(s) => s.clone(),
        }
    }

    /// The key read as an unsigned integer, if it is one
    fn as_u64(&self) -> Option<u64> {
        self.key().parse().ok()
    }
}

impl From<u64> for PlayerId {
    fn from(n: u64) -> Self {
        PlayerId::Number(Number::from(n))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn number_key(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Running total for one (challenge, player) slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub sum: i64,
    #[serde(default)]
    pub count: u64,
}

impl SkillRecord {
    pub fn average(&self) -> f64 {
        if self.count > 0 {
            self.sum as f64 / self.count as f64
        } else {
            0.0
        }
    }
}

/// The score store: registered players plus every evaluation total.
///
/// This is the single source of truth; rankings and role suggestions are
/// derived from it on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pub version: u32,
    pub players: Vec<Player>,
    pub tournament_scores: ScoreTable,
}

impl Default for TournamentState {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentState {
    /// Create an empty tournament at the current schema version
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            players: Vec::new(),
            tournament_scores: ScoreTable::new(),
        }
    }

    /// Register a player and give them an empty record under every challenge
    pub fn add_player(&mut self, name: &str) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }

        let player = Player {
            id: self.next_id()?,
            name: name.to_string(),
        };
        let key = player.id.key();
        for challenge in catalog::keys() {
            self.tournament_scores
                .entry(challenge.to_string())
                .or_default()
                .insert(key.clone(), SkillRecord::default());
        }
        self.players.push(player.clone());

        log::info!("Added player {} ({})", player.name, player.id);
        Ok(player)
    }

    /// Remove a player and purge their entry from every challenge
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player> {
        let key = id.key();
        let index = self
            .players
            .iter()
            .position(|p| p.id.key() == key)
            .ok_or_else(|| TournamentError::UnknownPlayer(key.clone()))?;
        let player = self.players.remove(index);

        for scores in self.tournament_scores.values_mut() {
            scores.remove(&key);
        }

        log::info!("Removed player {} ({})", player.name, player.id);
        Ok(player)
    }

    /// Find a player by id, falling back to a case-insensitive name match
    pub fn find_player(&self, selector: &str) -> Option<&Player> {
        let selector = selector.trim();
        self.players
            .iter()
            .find(|p| p.id.key() == selector)
            .or_else(|| {
                self.players
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(selector))
            })
    }

    /// Current record for a slot, `{0, 0}` when absent
    pub fn record(&self, challenge_key: &str, player_id: &PlayerId) -> SkillRecord {
        self.tournament_scores
            .get(challenge_key)
            .and_then(|scores| scores.get(&player_id.key()))
            .copied()
            .unwrap_or_default()
    }

    /// Add one evaluation to a registered player's challenge slot.
    ///
    /// Whether `delta` is one of the challenge's options is the caller's
    /// concern; any integer is accepted here.
    pub fn apply_evaluation(
        &mut self,
        challenge_key: &str,
        player_id: &PlayerId,
        delta: i64,
    ) -> Result<SkillRecord> {
        let challenge = catalog::find(challenge_key)
            .ok_or_else(|| TournamentError::UnknownChallenge(challenge_key.to_string()))?;
        let key = player_id.key();
        if !self.players.iter().any(|p| p.id.key() == key) {
            return Err(TournamentError::UnknownPlayer(key));
        }

        let slot = self
            .tournament_scores
            .entry(challenge.key.to_string())
            .or_default()
            .entry(key)
            .or_default();
        *slot = aggregator::apply_evaluation(*slot, delta);

        log::debug!(
            "{} {}: {:+} -> sum {} over {}",
            challenge.key,
            player_id,
            delta,
            slot.sum,
            slot.count
        );
        Ok(*slot)
    }

    /// Fill missing `{0, 0}` slots for every registered player
    pub fn ensure_slots(&mut self) {
        let keys: Vec<String> = self.players.iter().map(|p| p.id.key()).collect();
        for challenge in catalog::keys() {
            let scores = self
                .tournament_scores
                .entry(challenge.to_string())
                .or_default();
            for key in &keys {
                scores.entry(key.clone()).or_default();
            }
        }
    }

    /// Drop score entries that belong to no registered player.
    /// Returns how many entries were removed.
    pub fn prune_orphans(&mut self) -> usize {
        let registered: HashSet<String> = self.players.iter().map(|p| p.id.key()).collect();
        let mut removed = 0;
        for scores in self.tournament_scores.values_mut() {
            let before = scores.len();
            scores.retain(|key, _| registered.contains(key));
            removed += before - scores.len();
        }
        removed
    }

    /// Time-based id, bumped past every existing integer id so that players
    /// created within the same millisecond still get distinct ids. Text ids
    /// that look like integers count too, since they share the same key.
    fn next_id(&self) -> Result<PlayerId> {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let used: HashSet<u64> = self.players.iter().filter_map(|p| p.id.as_u64()).collect();

        let candidate = match used.iter().max() {
            Some(&n) if n >= now => n.checked_add(1),
            _ => Some(now),
        };
        candidate
            .or_else(|| (0..=u64::MAX).find(|n| !used.contains(n)))
            .map(PlayerId::from)
            .ok_or(TournamentError::IdsExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_empty() {
        let state = TournamentState::new();
        assert_eq!(state.version, SCHEMA_VERSION);
        assert!(state.players.is_empty());
        assert!(state.tournament_scores.is_empty());
    }

    #[test]
    fn test_add_player_initializes_every_challenge() {
        let mut state = TournamentState::new();
        let player = state.add_player("  Ana  ").unwrap();
        assert_eq!(player.name, "Ana");

        for challenge in catalog::keys() {
            let record = state.tournament_scores[challenge][&player.id.key()];
            assert_eq!(record, SkillRecord { sum: 0, count: 0 });
        }
    }

    #[test]
    fn test_add_player_rejects_empty_name() {
        let mut state = TournamentState::new();
        assert_eq!(state.add_player("   "), Err(TournamentError::EmptyName));
        assert!(state.players.is_empty());
        assert!(state.tournament_scores.is_empty());
    }

    #[test]
    fn test_rapid_ids_never_collide() {
        let mut state = TournamentState::new();
        for i in 0..200 {
            state.add_player(&format!("Player {}", i)).unwrap();
        }
        let ids: HashSet<String> = state.players.iter().map(|p| p.id.key()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_next_id_skips_past_future_ids() {
        let mut state = TournamentState::new();
        state.players.push(Player {
            id: PlayerId::from(u64::MAX - 1),
            name: "Future".to_string(),
        });
        let player = state.add_player("Next").unwrap();
        assert_eq!(player.id, PlayerId::from(u64::MAX));
    }

    #[test]
    fn test_next_id_at_u64_max() {
        let mut state = TournamentState::new();
        state.players.push(Player {
            id: PlayerId::from(u64::MAX),
            name: "Max".to_string(),
        });

        let first = state.add_player("Next").unwrap();
        let second = state.add_player("After").unwrap();
        assert_ne!(first.id.key(), u64::MAX.to_string());
        assert_ne!(first.id.key(), second.id.key());
        assert_eq!(state.players.len(), 3);
    }

    #[test]
    fn test_next_id_counts_numeric_text_ids() {
        let mut state = TournamentState::new();
        state.players.push(Player {
            id: PlayerId::Text("9000000000000".to_string()),
            name: "Text".to_string(),
        });
        let player = state.add_player("Next").unwrap();
        assert_eq!(player.id, PlayerId::from(9_000_000_000_001));
    }

    #[test]
    fn test_numeric_id_keys() {
        let key = |json: &str| serde_json::from_str::<PlayerId>(json).unwrap().key();
        assert_eq!(key("7"), "7");
        assert_eq!(key("-5"), "-5");
        assert_eq!(key("1.5"), "1.5");
        assert_eq!(key("1700000000000.0"), "1700000000000");
        assert_eq!(key("-0.0"), "0");
        assert_eq!(key("\"abc\""), "abc");
    }

    #[test]
    fn test_remove_player_purges_scores() {
        let mut state = TournamentState::new();
        let a = state.add_player("A").unwrap();
        let b = state.add_player("B").unwrap();
        state.apply_evaluation("ataque", &b.id, 5).unwrap();

        let removed = state.remove_player(&b.id).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(state.players.len(), 1);
        for scores in state.tournament_scores.values() {
            assert!(!scores.contains_key(&b.id.key()));
            assert!(scores.contains_key(&a.id.key()));
        }
    }

    #[test]
    fn test_remove_unknown_player() {
        let mut state = TournamentState::new();
        let result = state.remove_player(&PlayerId::from(42));
        assert_eq!(result, Err(TournamentError::UnknownPlayer("42".to_string())));
    }

    #[test]
    fn test_apply_evaluation_accumulates() {
        let mut state = TournamentState::new();
        let a = state.add_player("A").unwrap();
        state.apply_evaluation("recepcion", &a.id, 3).unwrap();
        let record = state.apply_evaluation("recepcion", &a.id, 2).unwrap();
        assert_eq!(record, SkillRecord { sum: 5, count: 2 });
        assert_eq!(state.record("ataque", &a.id), SkillRecord::default());
    }

    #[test]
    fn test_apply_evaluation_unknown_challenge_leaves_state() {
        let mut state = TournamentState::new();
        let a = state.add_player("A").unwrap();
        let before = state.clone();
        let result = state.apply_evaluation("remate", &a.id, 3);
        assert_eq!(
            result,
            Err(TournamentError::UnknownChallenge("remate".to_string()))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_evaluation_unknown_player() {
        let mut state = TournamentState::new();
        let result = state.apply_evaluation("ataque", &PlayerId::Text("ghost".into()), 3);
        assert_eq!(result, Err(TournamentError::UnknownPlayer("ghost".to_string())));
        assert!(state.tournament_scores.is_empty());
    }

    #[test]
    fn test_find_player_by_id_or_name() {
        let mut state = TournamentState::new();
        let ana = state.add_player("Ana").unwrap();
        assert_eq!(state.find_player(&ana.id.key()).unwrap().name, "Ana");
        assert_eq!(state.find_player("ana").unwrap().id, ana.id);
        assert!(state.find_player("Luis").is_none());
    }

    #[test]
    fn test_prune_orphans_and_ensure_slots() {
        let mut state = TournamentState::new();
        state.players.push(Player {
            id: PlayerId::Text("p1".into()),
            name: "P1".into(),
        });
        state
            .tournament_scores
            .entry("ataque".into())
            .or_default()
            .insert("ghost".into(), SkillRecord { sum: 3, count: 1 });

        assert_eq!(state.prune_orphans(), 1);
        state.ensure_slots();
        for challenge in catalog::keys() {
            assert!(state.tournament_scores[challenge].contains_key("p1"));
        }
    }

    #[test]
    fn test_average() {
        assert_eq!(SkillRecord::default().average(), 0.0);
        assert_eq!(SkillRecord { sum: 6, count: 2 }.average(), 3.0);
        assert_eq!(SkillRecord { sum: -3, count: 2 }.average(), -1.5);
    }

    #[test]
    fn test_serialized_shape() {
        let mut state = TournamentState::new();
        state.players.push(Player {
            id: PlayerId::from(7),
            name: "Ana".into(),
        });
        state.ensure_slots();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["version"], 2);
        assert_eq!(json["players"][0]["id"], 7);
        assert_eq!(json["tournamentScores"]["ataque"]["7"]["sum"], 0);
        assert_eq!(json["tournamentScores"]["ataque"]["7"]["count"], 0);
    }
}
