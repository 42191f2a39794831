use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::catalog;
use crate::tournament::{Player, PlayerId, ScoreTable, SkillRecord};

/// A player with their derived averages. Recomputed on every ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub player: Player,
    pub skill_averages: BTreeMap<&'static str, f64>, // challenge key -> average
    pub overall_average: f64, // pooled over every evaluation, not a mean of averages
    pub min_average: f64,
    pub max_average: f64,
}

impl RankedPlayer {
    /// Average for one challenge, 0 when the key is not in the catalog
    pub fn average(&self, challenge_key: &str) -> f64 {
        self.skill_averages.get(challenge_key).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub ranked_players: Vec<RankedPlayer>,
    pub global_min_averages: BTreeMap<&'static str, f64>,
    pub global_max_averages: BTreeMap<&'static str, f64>,
}

/// Where a challenge average sits among all players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalMark {
    Lowest,
    Highest,
}

/// Where a challenge average sits among the player's own skills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalMark {
    Best,
    Worst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillMark {
    pub global: Option<GlobalMark>,
    pub personal: Option<PersonalMark>,
}

impl Ranking {
    /// 1-based position of a player in the ranking
    pub fn position_of(&self, id: &PlayerId) -> Option<usize> {
        self.ranked_players
            .iter()
            .position(|r| &r.player.id == id)
            .map(|idx| idx + 1)
    }

    pub fn get(&self, id: &PlayerId) -> Option<&RankedPlayer> {
        self.ranked_players.iter().find(|r| &r.player.id == id)
    }

    pub fn global_min(&self, challenge_key: &str) -> f64 {
        self.global_min_averages.get(challenge_key).copied().unwrap_or(0.0)
    }

    pub fn global_max(&self, challenge_key: &str) -> f64 {
        self.global_max_averages.get(challenge_key).copied().unwrap_or(0.0)
    }

    /// Classify one cell of the ranking table.
    ///
    /// Marks are only given when there is spread: a challenge where every
    /// player has the same average gets no global mark, and a player whose
    /// skills are all equal gets no personal mark. Ties at an extreme are all
    /// marked.
    pub fn classify(&self, ranked: &RankedPlayer, challenge_key: &str) -> SkillMark {
        let average = ranked.average(challenge_key);
        let (low, high) = (self.global_min(challenge_key), self.global_max(challenge_key));

        let global = if low != high {
            if average == low {
                Some(GlobalMark::Lowest)
            } else if average == high {
                Some(GlobalMark::Highest)
            } else {
                None
            }
        } else {
            None
        };

        let personal = if ranked.min_average != ranked.max_average {
            if average == ranked.max_average {
                Some(PersonalMark::Best)
            } else if average == ranked.min_average {
                Some(PersonalMark::Worst)
            } else {
                None
            }
        } else {
            None
        };

        SkillMark { global, personal }
    }
}

/// Build the ranking for `players` from the score table.
///
/// Pure: reads the table only, so repeated calls on the same input give the
/// same result. Players are ordered by overall average, highest first; the
/// sort is stable, so equal averages keep registration order.
pub fn compute_ranking(players: &[Player], scores: &ScoreTable) -> Ranking {
    let mut ranked: Vec<RankedPlayer> = players
        .iter()
        .map(|player| rank_player(player, scores))
        .collect();

    let mut global_min_averages = BTreeMap::new();
    let mut global_max_averages = BTreeMap::new();
    for challenge in catalog::all() {
        let averages = ranked.iter().map(|r| r.average(challenge.key));
        let (low, high) = min_max(averages).unwrap_or((0.0, 0.0));
        global_min_averages.insert(challenge.key, low);
        global_max_averages.insert(challenge.key, high);
    }

    ranked.sort_by(|a, b| {
        b.overall_average
            .partial_cmp(&a.overall_average)
            .unwrap_or(Ordering::Equal)
    });

    Ranking {
        ranked_players: ranked,
        global_min_averages,
        global_max_averages,
    }
}

fn rank_player(player: &Player, scores: &ScoreTable) -> RankedPlayer {
    let key = player.id.key();
    let mut skill_averages = BTreeMap::new();
    let mut total_sum: i64 = 0;
    let mut total_count: u64 = 0;

    for challenge in catalog::all() {
        let record: SkillRecord = scores
            .get(challenge.key)
            .and_then(|by_player| by_player.get(&key))
            .copied()
            .unwrap_or_default();

        skill_averages.insert(challenge.key, record.average());
        total_sum = total_sum.saturating_add(record.sum);
        total_count = total_count.saturating_add(record.count);
    }

    let overall_average = if total_count > 0 {
        total_sum as f64 / total_count as f64
    } else {
        0.0
    };
    let (min_average, max_average) =
        min_max(skill_averages.values().copied()).unwrap_or((0.0, 0.0));

    RankedPlayer {
        player: player.clone(),
        skill_averages,
        overall_average,
        min_average,
        max_average,
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((low, high)) => Some((low.min(v), high.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::TournamentState;

    fn state_with(names: &[&str]) -> (TournamentState, Vec<PlayerId>) {
        let mut state = TournamentState::new();
        let ids = names
            .iter()
            .map(|n| state.add_player(n).unwrap().id)
            .collect();
        (state, ids)
    }

    fn names(ranking: &Ranking) -> Vec<String> {
        ranking
            .ranked_players
            .iter()
            .map(|r| r.player.name.clone())
            .collect()
    }

    #[test]
    fn test_empty_tournament() {
        let ranking = compute_ranking(&[], &ScoreTable::new());
        assert!(ranking.ranked_players.is_empty());
        for challenge in catalog::all() {
            assert_eq!(ranking.global_min(challenge.key), 0.0);
            assert_eq!(ranking.global_max(challenge.key), 0.0);
            assert!(ranking.global_min_averages.contains_key(challenge.key));
        }
    }

    #[test]
    fn test_unevaluated_player_is_all_zero() {
        let (state, _) = state_with(&["Solo"]);
        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        let solo = &ranking.ranked_players[0];
        assert_eq!(solo.overall_average, 0.0);
        assert_eq!(solo.min_average, 0.0);
        assert_eq!(solo.max_average, 0.0);
        assert!(solo.skill_averages.values().all(|a| *a == 0.0));
        assert_eq!(solo.skill_averages.len(), 6);
    }

    #[test]
    fn test_overall_average_is_pooled() {
        let (mut state, ids) = state_with(&["A"]);
        // recepcion: sum 10 over 2, ataque: sum 3 over 1
        state.apply_evaluation("recepcion", &ids[0], 5).unwrap();
        state.apply_evaluation("recepcion", &ids[0], 5).unwrap();
        state.apply_evaluation("ataque", &ids[0], 3).unwrap();

        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        let a = &ranking.ranked_players[0];
        assert!((a.overall_average - 13.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.average("recepcion"), 5.0);
        assert_eq!(a.average("ataque"), 3.0);
        assert_eq!(a.max_average, 5.0);
        assert_eq!(a.min_average, 0.0);
    }

    #[test]
    fn test_three_player_recepcion_scenario() {
        let (mut state, ids) = state_with(&["C", "B", "A"]);
        let (c, b, a) = (&ids[0], &ids[1], &ids[2]);
        state.apply_evaluation("recepcion", a, 3).unwrap();
        state.apply_evaluation("recepcion", a, 3).unwrap();
        state.apply_evaluation("recepcion", b, 1).unwrap();

        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        assert_eq!(names(&ranking), vec!["A", "B", "C"]);
        assert_eq!(ranking.ranked_players[0].overall_average, 3.0);
        assert_eq!(ranking.ranked_players[1].overall_average, 1.0);
        assert_eq!(ranking.ranked_players[2].overall_average, 0.0);
        assert_eq!(ranking.global_min("recepcion"), 0.0);
        assert_eq!(ranking.global_max("recepcion"), 3.0);
        assert_eq!(ranking.position_of(a), Some(1));
        assert_eq!(ranking.position_of(b), Some(2));
        assert_eq!(ranking.position_of(c), Some(3));
    }

    #[test]
    fn test_removed_player_disappears_from_ranking() {
        let (mut state, ids) = state_with(&["A", "B", "C"]);
        state.apply_evaluation("recepcion", &ids[0], 3).unwrap();
        state.apply_evaluation("recepcion", &ids[1], 3).unwrap();
        state.apply_evaluation("saque", &ids[1], 5).unwrap();
        state.apply_evaluation("recepcion", &ids[2], 1).unwrap();

        state.remove_player(&ids[1]).unwrap();
        let ranking = compute_ranking(&state.players, &state.tournament_scores);

        assert_eq!(names(&ranking), vec!["A", "C"]);
        assert!(ranking.get(&ids[1]).is_none());
        assert_eq!(ranking.global_max("saque"), 0.0);
        assert_eq!(ranking.global_min("recepcion"), 1.0);
        assert_eq!(ranking.global_max("recepcion"), 3.0);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let (mut state, ids) = state_with(&["First", "Second", "Third"]);
        for id in &ids {
            state.apply_evaluation("ataque", id, 3).unwrap();
        }
        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        assert_eq!(names(&ranking), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_ranking_is_idempotent_and_sorted() {
        let (mut state, ids) = state_with(&["A", "B", "C", "D"]);
        let plan = [
            ("ataque", 0, 5),
            ("ataque", 1, 1),
            ("defensa", 1, 4),
            ("saque", 2, 3),
            ("bloqueo", 3, 0),
            ("colocacion", 0, 1),
        ];
        for (challenge, who, points) in plan {
            state.apply_evaluation(challenge, &ids[who], points).unwrap();
        }

        let first = compute_ranking(&state.players, &state.tournament_scores);
        let second = compute_ranking(&state.players, &state.tournament_scores);
        assert_eq!(first, second);

        for pair in first.ranked_players.windows(2) {
            assert!(pair[0].overall_average >= pair[1].overall_average);
        }

        for challenge in catalog::all() {
            for ranked in &first.ranked_players {
                let avg = ranked.average(challenge.key);
                assert!(avg >= first.global_min(challenge.key));
                assert!(avg <= first.global_max(challenge.key));
            }
        }
    }

    #[test]
    fn test_classify_marks_spread_only() {
        let (mut state, ids) = state_with(&["A", "B"]);
        state.apply_evaluation("ataque", &ids[0], 5).unwrap();
        state.apply_evaluation("ataque", &ids[1], 1).unwrap();
        state.apply_evaluation("saque", &ids[1], 3).unwrap();

        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        let a = ranking.get(&ids[0]).unwrap();
        let b = ranking.get(&ids[1]).unwrap();

        let mark = ranking.classify(a, "ataque");
        assert_eq!(mark.global, Some(GlobalMark::Highest));
        assert_eq!(mark.personal, Some(PersonalMark::Best));

        let mark = ranking.classify(b, "ataque");
        assert_eq!(mark.global, Some(GlobalMark::Lowest));
        assert_eq!(mark.personal, None);

        // Nobody scored recepcion: no global spread
        let mark = ranking.classify(a, "recepcion");
        assert_eq!(mark.global, None);
        assert_eq!(mark.personal, Some(PersonalMark::Worst));
    }

    #[test]
    fn test_classify_ties_at_extremes() {
        let (mut state, ids) = state_with(&["A", "B", "C"]);
        state.apply_evaluation("bloqueo", &ids[0], 5).unwrap();
        state.apply_evaluation("bloqueo", &ids[1], 5).unwrap();

        let ranking = compute_ranking(&state.players, &state.tournament_scores);
        let a = ranking.get(&ids[0]).unwrap();
        let b = ranking.get(&ids[1]).unwrap();
        let c = ranking.get(&ids[2]).unwrap();

        assert_eq!(ranking.classify(a, "bloqueo").global, Some(GlobalMark::Highest));
        assert_eq!(ranking.classify(b, "bloqueo").global, Some(GlobalMark::Highest));
        assert_eq!(ranking.classify(c, "bloqueo").global, Some(GlobalMark::Lowest));

        // Every zero skill of A ties for worst
        for key in ["recepcion", "ataque", "defensa", "saque", "colocacion"] {
            assert_eq!(ranking.classify(a, key).personal, Some(PersonalMark::Worst));
        }
        // C has no spread at all
        assert_eq!(ranking.classify(c, "bloqueo").personal, None);
    }
}
