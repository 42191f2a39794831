use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use super::ranking::Ranking;
use crate::catalog::{ATAQUE, BLOQUEO, COLOCACION, DEFENSA, RECEPCION, SAQUE};
use crate::error::{Result, TournamentError};
use crate::tournament::{Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Setter,
    MiddleBlocker,
    OutsideHitter,
    Opposite,
    Libero,
    General,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Setter => "Setter",
            Role::MiddleBlocker => "Middle Blocker",
            Role::OutsideHitter => "Outside Hitter",
            Role::Opposite => "Opposite",
            Role::Libero => "Libero",
            Role::General => "General",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Weighted fit of a player for each role, from their skill averages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoleScores {
    pub setter: f64,
    pub middle_blocker: f64,
    pub outside_hitter: f64,
    pub opposite: f64,
    pub libero: f64,
}

impl RoleScores {
    pub fn from_averages(average: impl Fn(&str) -> f64) -> Self {
        let recepcion = average(RECEPCION);
        let ataque = average(ATAQUE);
        let defensa = average(DEFENSA);
        let saque = average(SAQUE);
        let bloqueo = average(BLOQUEO);
        let colocacion = average(COLOCACION);

        Self {
            setter: 5.0 * colocacion + 3.0 * recepcion + 2.0 * defensa,
            middle_blocker: 5.0 * bloqueo + 3.0 * ataque,
            outside_hitter: 4.0 * ataque + 3.0 * recepcion + 2.0 * defensa,
            opposite: 4.0 * ataque + 3.0 * bloqueo + 2.0 * saque,
            libero: 5.0 * recepcion + 5.0 * defensa,
        }
    }

    /// Score for one of the limited roles; open roles have no single score
    fn for_role(&self, role: Role) -> f64 {
        match role {
            Role::Setter => self.setter,
            Role::MiddleBlocker => self.middle_blocker,
            Role::OutsideHitter => self.outside_hitter,
            Role::Opposite => self.opposite,
            Role::Libero => self.libero,
            Role::General => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleAssignment {
    pub player_id: PlayerId,
    pub name: String,
    pub role: Role,
    pub ranking_position: usize,
}

/// Limited roles are filled first, one attempt per entry, in this order
const LIMITED_ROUNDS: [(Role, usize); 5] = [
    (Role::Libero, 1),
    (Role::Setter, 2),
    (Role::Setter, 2),
    (Role::Opposite, 2),
    (Role::Opposite, 2),
];

struct Candidate<'a> {
    player: &'a Player,
    scores: RoleScores,
    position: usize,
}

/// Suggest a role for every player.
///
/// Greedy, not optimal: each limited-role attempt re-sorts the unassigned
/// pool by that role's score and takes the top player, so an earlier role can
/// claim someone a later role would have fitted better. The pool keeps the
/// order left by previous sorts, which decides ties. Everyone left over
/// becomes an outside hitter or a middle blocker, whichever scores higher
/// (ties go to outside hitter).
///
/// The result is ordered by ranking position, best first.
pub fn suggest_roles(players: &[Player], ranking: &Ranking) -> Result<Vec<RoleAssignment>> {
    if players.is_empty() {
        return Err(TournamentError::NoPlayers);
    }

    let candidates: Vec<Candidate> = players
        .iter()
        .map(|player| {
            let ranked = ranking.get(&player.id);
            let scores = RoleScores::from_averages(|key| {
                ranked.map(|r| r.average(key)).unwrap_or(0.0)
            });
            Candidate {
                player,
                scores,
                position: ranking.position_of(&player.id).unwrap_or(0),
            }
        })
        .collect();

    let mut assignments: Vec<RoleAssignment> = Vec::with_capacity(candidates.len());
    let mut assigned = vec![false; candidates.len()];
    let mut pool: Vec<usize> = (0..candidates.len()).collect();
    let mut filled: HashMap<Role, usize> = HashMap::new();

    for (role, cap) in LIMITED_ROUNDS {
        let count = filled.entry(role).or_insert(0);
        if *count >= cap || pool.is_empty() {
            continue;
        }

        pool.sort_by(|a, b| {
            let (sa, sb) = (
                candidates[*a].scores.for_role(role),
                candidates[*b].scores.for_role(role),
            );
            sb.partial_cmp(&sa).unwrap_or(Ordering::Equal)
        });
        let best = pool.remove(0);

        assignments.push(assign(&candidates[best], role));
        assigned[best] = true;
        *count += 1;
    }

    for (idx, candidate) in candidates.iter().enumerate() {
        if assigned[idx] {
            continue;
        }
        let role = if candidate.scores.outside_hitter >= candidate.scores.middle_blocker {
            Role::OutsideHitter
        } else {
            Role::MiddleBlocker
        };
        assignments.push(assign(candidate, role));
        assigned[idx] = true;
    }

    // Unreachable while the pass above covers the whole pool
    for (idx, candidate) in candidates.iter().enumerate() {
        if !assigned[idx] {
            assignments.push(assign(candidate, Role::General));
        }
    }

    assignments.sort_by_key(|a| a.ranking_position);
    Ok(assignments)
}

fn assign(candidate: &Candidate, role: Role) -> RoleAssignment {
    RoleAssignment {
        player_id: candidate.player.id.clone(),
        name: candidate.player.name.clone(),
        role,
        ranking_position: candidate.position,
    }
}
