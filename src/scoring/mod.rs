pub mod aggregator;
pub mod ranking;
pub mod roles;

pub use aggregator::apply_evaluation;
pub use ranking::{compute_ranking, GlobalMark, PersonalMark, RankedPlayer, Ranking, SkillMark};
pub use roles::{suggest_roles, Role, RoleAssignment, RoleScores};
