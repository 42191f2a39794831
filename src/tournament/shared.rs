use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{Player, PlayerId, SkillRecord, TournamentState};
use crate::error::{Result, TournamentError};
use crate::scoring::{compute_ranking, suggest_roles, Ranking, RoleAssignment};

/// Thread-safe handle to a tournament.
///
/// Every mutation takes the write lock, so two evaluations of the same slot
/// can never lose an update. Derived views take the read lock once and are
/// computed from that one consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedTournament {
    inner: Arc<RwLock<TournamentState>>,
}

impl SharedTournament {
    pub fn new(state: TournamentState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TournamentState>> {
        self.inner.read().map_err(|_| TournamentError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TournamentState>> {
        self.inner.write().map_err(|_| TournamentError::LockPoisoned)
    }

    pub fn add_player(&self, name: &str) -> Result<Player> {
        self.write()?.add_player(name)
    }

    pub fn remove_player(&self, id: &PlayerId) -> Result<Player> {
        self.write()?.remove_player(id)
    }

    pub fn apply_evaluation(
        &self,
        challenge_key: &str,
        player_id: &PlayerId,
        delta: i64,
    ) -> Result<SkillRecord> {
        self.write()?.apply_evaluation(challenge_key, player_id, delta)
    }

    /// Swap in a whole new state (after a successful import)
    pub fn replace(&self, state: TournamentState) -> Result<()> {
        *self.write()? = state;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<TournamentState> {
        Ok(self.read()?.clone())
    }

    pub fn ranking(&self) -> Result<Ranking> {
        let state = self.read()?;
        Ok(compute_ranking(&state.players, &state.tournament_scores))
    }

    pub fn suggest_roles(&self) -> Result<Vec<RoleAssignment>> {
        let state = self.read()?;
        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        suggest_roles(&state.players, &ranking)
    }
}
