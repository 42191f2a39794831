use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::{self, Challenge};
use crate::config::ColorMode;
use crate::scoring::{GlobalMark, PersonalMark, Ranking, RoleAssignment, SkillMark};
use crate::tournament::{Player, SkillRecord};

/// Decide whether to colour output for the configured mode
pub fn should_use_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Format an average with a fixed number of decimals
pub fn format_average(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// Background marks the tournament-wide extremes, text colour the player's own
fn mark_style(mark: SkillMark) -> Style {
    let mut style = Style::new();
    style = match mark.global {
        Some(GlobalMark::Lowest) => style.on_yellow(),
        Some(GlobalMark::Highest) => style.on_blue(),
        None => style,
    };
    match mark.personal {
        Some(PersonalMark::Best) => style.green().bold(),
        Some(PersonalMark::Worst) => style.red().bold(),
        None => style,
    }
}

/// List every challenge with its scoring options
pub fn format_challenges(use_colors: bool) -> String {
    catalog::all()
        .iter()
        .map(|challenge| {
            let header = if use_colors {
                format!("{} ({})", challenge.name.bold(), challenge.key.cyan())
            } else {
                format!("{} ({})", challenge.name, challenge.key)
            };
            let options = challenge
                .options
                .iter()
                .map(|o| format!("  +{}  {}", o.delta, o.label))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}\n{}", header, options)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// List registered players with their ids
pub fn format_players(players: &[Player], use_colors: bool) -> String {
    if players.is_empty() {
        return "No players registered.".to_string();
    }

    players
        .iter()
        .map(|p| {
            if use_colors {
                format!("{}  {}", p.id.to_string().dimmed(), p.name.bold())
            } else {
                format!("{}  {}", p.id, p.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line confirming an applied evaluation
pub fn format_evaluation(
    player: &Player,
    challenge: &Challenge,
    delta: i64,
    record: &SkillRecord,
    decimals: usize,
) -> String {
    format!(
        "{} | {}: {:+} -> total {} over {} evaluations (avg {})",
        player.name,
        challenge.name,
        delta,
        record.sum,
        record.count,
        format_average(record.average(), decimals)
    )
}

/// Format the ranking as a table: rank, name, one column per challenge, total
///
/// Cells are highlighted when colours are on: yellow/blue background for the
/// lowest/highest average across all players, red/green text for the
/// player's own worst/best skill.
pub fn format_ranking_table(ranking: &Ranking, decimals: usize, use_colors: bool) -> String {
    if ranking.ranked_players.is_empty() {
        return "No players registered. Add players and score them to see the ranking.".to_string();
    }

    let challenges = catalog::all();
    let value_width = decimals + 4;
    let widths: Vec<usize> = challenges
        .iter()
        .map(|c| c.name.chars().count().max(value_width))
        .collect();
    let total_width = "Total".len().max(value_width);
    let index_width = 3;
    let separator = "  ";

    let fixed_width = index_width
        + separator.len()
        + widths.iter().map(|w| w + separator.len()).sum::<usize>()
        + total_width
        + separator.len();
    let longest_name = ranking
        .ranked_players
        .iter()
        .map(|r| r.player.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest_name.min(width - fixed_width),
        Some(_) => longest_name.min(12),
        None => longest_name,
    };

    let mut header = vec![pad_left("#", index_width), pad_right("Player", name_width)];
    header.extend(
        challenges
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad_left(c.name, *w)),
    );
    header.push(pad_left("Total", total_width));
    let header = header.join(separator);

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (idx, ranked) in ranking.ranked_players.iter().enumerate() {
        let index_str = pad_left(&format!("{}.", idx + 1), index_width);
        let name = pad_right(&truncate_name(&ranked.player.name, name_width), name_width);

        let mut cells = vec![
            if use_colors {
                index_str.dimmed().to_string()
            } else {
                index_str
            },
            name,
        ];

        for (challenge, width) in challenges.iter().zip(&widths) {
            let cell = pad_left(
                &format_average(ranked.average(challenge.key), decimals),
                *width,
            );
            if use_colors {
                let style = mark_style(ranking.classify(ranked, challenge.key));
                cells.push(cell.style(style).to_string());
            } else {
                cells.push(cell);
            }
        }

        let total = pad_left(
            &format_average(ranked.overall_average, decimals),
            total_width,
        );
        cells.push(if use_colors {
            total.magenta().bold().to_string()
        } else {
            total
        });

        lines.push(cells.join(separator));
    }

    lines.join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, name, one per challenge (catalog order), total; no colours
pub fn format_tsv(ranking: &Ranking, decimals: usize) -> String {
    let mut header = vec!["rank".to_string(), "name".to_string()];
    header.extend(catalog::keys().map(str::to_string));
    header.push("total".to_string());

    let mut lines = vec![header.join("\t")];
    for (idx, ranked) in ranking.ranked_players.iter().enumerate() {
        let mut row = vec![(idx + 1).to_string(), ranked.player.name.clone()];
        row.extend(
            catalog::keys().map(|key| format_average(ranked.average(key), decimals)),
        );
        row.push(format_average(ranked.overall_average, decimals));
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

/// Format suggested roles as "#rank name: role", best ranked first
pub fn format_roles(assignments: &[RoleAssignment], use_colors: bool) -> String {
    if assignments.is_empty() {
        return "No players available to suggest roles.".to_string();
    }

    assignments
        .iter()
        .map(|a| {
            if use_colors {
                format!(
                    "{} {}: {}",
                    format!("#{}", a.ranking_position).blue(),
                    a.name.bold(),
                    a.role
                )
            } else {
                format!("#{} {}: {}", a.ranking_position, a.name, a.role)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
