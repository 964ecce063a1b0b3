//! Config command handler.
//!
//! Displays, modifies, and resets the gorda configuration file.

use crate::config::{
    config_path, load_config_from, save_config, save_config_to, set_config_value,
    validate_config, Config,
};
use crate::error::Result;
use crate::output::{print_warning, BOLD, CYAN, GRAY, GREEN, RESET, YELLOW};
use std::path::Path;

/// Print the configuration file location and its effective values.
pub fn config_display_command() -> Result<()> {
    let path = config_path()?;
    display_config_at(&path)
}

fn display_config_at(path: &Path) -> Result<()> {
    println!("{BOLD}# gorda config{RESET}");
    println!("{GRAY}# {}{RESET}", path.display());
    println!();

    if !path.exists() {
        println!("{YELLOW}# (file does not exist, using defaults){RESET}");
        println!();
        print_config_as_toml(&Config::default());
        return Ok(());
    }

    let config = load_config_from(path)?;
    if let Err(e) = validate_config(&config) {
        print_warning(&e.to_string());
    }
    print_config_as_toml(&config);
    Ok(())
}

fn print_config_as_toml(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(text) => print!("{}", text),
        Err(e) => print_warning(&format!("Could not render config: {}", e)),
    }
}

/// Set `key` to `value` and save the file.
pub fn config_set_command(key: &str, value: &str) -> Result<()> {
    let path = config_path()?;
    set_config_at(&path, key, value)?;
    println!("{GREEN}Set{RESET} {CYAN}{}{RESET} = {}", key, value);
    Ok(())
}

fn set_config_at(path: &Path, key: &str, value: &str) -> Result<Config> {
    let current = load_config_from(path)?;
    let updated = set_config_value(&current, key, value)?;
    save_config_to(path, &updated)?;
    Ok(updated)
}

/// Overwrite the config file with defaults.
pub fn config_reset_command() -> Result<()> {
    save_config(&Config::default())?;
    println!("{GREEN}Reset{RESET} {}", config_path()?.display());
    Ok(())
}
