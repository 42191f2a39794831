use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use skill_tourney::tournament::{self, TournamentState};
use skill_tourney::{catalog, output, scoring, TournamentError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_SAVE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the overall ranking (default if no subcommand)
    Rank {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Suggest a team role for every player
    Roles,
    /// List challenges and their scoring options
    Challenges,
    /// List registered players
    Players,
    /// Register a new player
    Add {
        /// Player name
        name: String,
    },
    /// Remove a player and all of their scores
    Remove {
        /// Player id or name
        player: String,
    },
    /// Record one evaluation
    Score {
        /// Challenge key (e.g. recepcion, ataque)
        challenge: String,
        /// Player id or name
        player: String,
        /// Points awarded; must be one of the challenge's options
        #[arg(allow_hyphen_values = true)]
        points: i64,
    },
    /// Write the tournament to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Replace the tournament with the contents of a JSON file
    Import {
        /// Source file
        path: PathBuf,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "skill-tourney")]
#[command(about = "Individual skill tournament: scores, ranking and role suggestions", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/skill-tourney/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the tournament file (overrides the config)
    #[arg(short, long, global = true)]
    state: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn setup_logging(verbose: bool) {
    if verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "skill_tourney=debug");
    }
    sensible_env_logger::init!();
}

fn exit_code(err: &TournamentError) -> i32 {
    if err.is_data_error() {
        EXIT_DATA
    } else if matches!(err, TournamentError::Save(_)) {
        EXIT_SAVE
    } else {
        EXIT_VALIDATION
    }
}

fn fail(err: TournamentError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(exit_code(&err));
}

/// Save after a mutation. A failed save is reported but the change itself
/// already happened in memory and was shown to the user.
fn persist(path: &Path, state: &TournamentState) {
    if let Err(e) = tournament::save_tournament(path, state) {
        eprintln!("Warning: {}", e);
        eprintln!("The change was applied but not saved.");
        std::process::exit(EXIT_SAVE);
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Rank { tsv: false });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = skill_tourney::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match skill_tourney::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = skill_tourney::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let state_path = cli
        .state
        .map(|s| skill_tourney::config::expand_home(&s))
        .unwrap_or_else(|| config.state_path());
    log::debug!("Using tournament file {}", state_path.display());

    // Import never needs the current state, so it still works when the state
    // file itself is what needs replacing
    if let Commands::Import { path } = &command {
        let state = tournament::import_file(path, &state_path).unwrap_or_else(|e| fail(e));
        println!(
            "Imported {} players from {}",
            state.players.len(),
            path.display()
        );
        std::process::exit(EXIT_SUCCESS);
    }

    let mut state = tournament::load_tournament(&state_path).unwrap_or_else(|e| fail(e));
    let use_colors = output::should_use_colors(config.colors);
    let decimals = config.decimals;

    match command {
        Commands::Rank { tsv } => {
            let ranking = scoring::compute_ranking(&state.players, &state.tournament_scores);
            if tsv {
                println!("{}", output::format_tsv(&ranking, decimals));
            } else {
                println!(
                    "{}",
                    output::format_ranking_table(&ranking, decimals, use_colors)
                );
            }
        }
        Commands::Roles => {
            let ranking = scoring::compute_ranking(&state.players, &state.tournament_scores);
            match scoring::suggest_roles(&state.players, &ranking) {
                Ok(roles) => println!("{}", output::format_roles(&roles, use_colors)),
                Err(e) => fail(e),
            }
        }
        Commands::Challenges => {
            println!("{}", output::format_challenges(use_colors));
        }
        Commands::Players => {
            println!("{}", output::format_players(&state.players, use_colors));
        }
        Commands::Add { name } => {
            let player = state.add_player(&name).unwrap_or_else(|e| fail(e));
            println!("{} joined the tournament (id {}).", player.name, player.id);
            persist(&state_path, &state);
        }
        Commands::Remove { player } => {
            let id = state
                .find_player(&player)
                .map(|p| p.id.clone())
                .unwrap_or_else(|| fail(TournamentError::UnknownPlayer(player.clone())));
            let removed = state.remove_player(&id).unwrap_or_else(|e| fail(e));
            println!("{} was removed.", removed.name);
            persist(&state_path, &state);
        }
        Commands::Score {
            challenge,
            player,
            points,
        } => {
            let challenge = catalog::find(&challenge)
                .unwrap_or_else(|| fail(TournamentError::UnknownChallenge(challenge.clone())));
            if !challenge.is_legal_delta(points) {
                fail(TournamentError::IllegalScore {
                    challenge: challenge.key.to_string(),
                    points,
                    allowed: challenge.legal_deltas(),
                });
            }
            let target = state
                .find_player(&player)
                .cloned()
                .unwrap_or_else(|| fail(TournamentError::UnknownPlayer(player.clone())));

            let record = state
                .apply_evaluation(challenge.key, &target.id, points)
                .unwrap_or_else(|e| fail(e));
            println!(
                "{}",
                output::format_evaluation(&target, challenge, points, &record, decimals)
            );
            persist(&state_path, &state);
        }
        Commands::Export { path } => {
            if let Err(e) = tournament::save_tournament(&path, &state) {
                fail(e);
            }
            println!(
                "Exported {} players to {}",
                state.players.len(),
                path.display()
            );
        }
        Commands::Import { .. } | Commands::Init => {
            unreachable!("handled before loading state")
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
