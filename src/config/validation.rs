use super::schema::Config;

/// Largest number of decimals shown for averages
pub const MAX_DECIMALS: usize = 6;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.decimals > MAX_DECIMALS {
        errors.push(format!(
            "decimals: must be at most {}, got {}",
            MAX_DECIMALS, config.decimals
        ));
    }

    if let Some(ref state_file) = config.state_file {
        if state_file.trim().is_empty() {
            errors.push("state_file: must not be empty".to_string());
        } else if config.state_path().is_dir() {
            errors.push(format!("state_file: '{}' is a directory", state_file));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
