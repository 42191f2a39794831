use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, ColorMode, Config, MAX_DECIMALS};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn parse_decimals(input: &str) -> Result<usize, String> {
    match input.parse::<usize>() {
        Ok(v) if v <= MAX_DECIMALS => Ok(v),
        Ok(_) => Err(format!("must be at most {}", MAX_DECIMALS)),
        Err(_) => Err("must be a whole number".to_string()),
    }
}

fn parse_color_mode(input: &str) -> Result<ColorMode, String> {
    match input.to_lowercase().as_str() {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        other => Err(format!("'{}' is not one of auto, always, never", other)),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Skill Tournament Configuration");
    println!("==============================");
    println!();

    let defaults = Config::default();

    println!("Players and scores are saved to a single JSON file after every change.");
    let default_state = defaults.state_path().display().to_string();
    let state_input = prompt_with_default("Tournament file", &default_state)?;
    let state_file = if state_input == default_state {
        None
    } else {
        Some(state_input)
    };

    println!();
    println!("Averages in the ranking table are rounded for display only.");
    let decimals = loop {
        let input = prompt_with_default("Decimals to show", &defaults.decimals.to_string())?;
        match parse_decimals(&input) {
            Ok(v) => break v,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    println!();
    println!("Colours highlight the best and worst averages in the ranking table.");
    let colors = loop {
        let input = prompt_with_default("Colours (auto/always/never)", "auto")?;
        match parse_color_mode(&input) {
            Ok(mode) => break mode,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        state_file,
        decimals,
        colors,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `skill-tourney add <name>` to register your first player.");

    Ok(())
}
