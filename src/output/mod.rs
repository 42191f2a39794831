pub mod formatter;

pub use formatter::{
    format_average, format_challenges, format_evaluation, format_players, format_ranking_table,
    format_roles, format_tsv, should_use_colors,
};
