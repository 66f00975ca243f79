use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};

use crate::cli::ConfigCommands;
use crate::config::{self, Config};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
        ConfigCommands::Init => init(),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    if !path.exists() {
        println!("{}", format!("No config found at {}", path.display()).yellow());
        println!("Run `improv config init` to create one.");
        return Ok(());
    }

    let config = Config::load_from(&path)?;
    println!("{} {}", "Config:".bold(), path.display());
    println!();
    print!("{}", describe(&config)?);
    Ok(())
}

/// The config as printed by `config show`, with the anon key redacted.
fn describe(config: &Config) -> Result<String> {
    let yaml = serde_yaml::to_string(&config.redacted())?;
    let mut out = yaml;
    let overrides = [
        (config::URL_ENV, "provider.url"),
        (config::ANON_KEY_ENV, "provider.anon_key"),
    ];
    for (name, label) in overrides {
        if std::env::var(name).is_ok_and(|v| !v.trim().is_empty()) {
            out.push_str(&format!("# {label} is overridden by {name}\n"));
        }
    }
    Ok(out)
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    let shown = if key == "provider.anon_key" {
        "********"
    } else {
        value
    };
    println!("{} {key} = {shown}", "Set".green().bold());
    println!("Saved to {}", path.display());
    Ok(())
}

fn init() -> Result<()> {
    let path = Config::path()?;
    let mut config = Config::load_or_default();

    if path.exists() {
        let overwrite = Confirm::new(&format!(
            "A config already exists at {}. Update it?",
            path.display()
        ))
        .with_default(true)
        .prompt()?;
        if !overwrite {
            println!("{}", "Left the existing config untouched.".yellow());
            return Ok(());
        }
    }

    let current = config.provider.clone().unwrap_or_default();

    let mut url_prompt = Text::new("Supabase project URL:")
        .with_placeholder("https://your-project.supabase.co");
    if let Some(url) = current.url.as_deref() {
        url_prompt = url_prompt.with_default(url);
    }
    let url = url_prompt.prompt()?;
    config.set("provider.url", url.trim())?;

    let anon_key = Password::new("Supabase anon key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !anon_key.trim().is_empty() {
        config.set("provider.anon_key", anon_key.trim())?;
    } else if current.anon_key.is_none() {
        anyhow::bail!(
            "An anon key is required. Set {} or run `improv config init` again.",
            config::ANON_KEY_ENV
        );
    }

    let themes = vec!["light", "dark"];
    let cursor = themes
        .iter()
        .position(|t| *t == config.theme_name())
        .unwrap_or(0);
    let theme = Select::new("Theme:", themes)
        .with_starting_cursor(cursor)
        .prompt()?;
    config.set("defaults.theme", theme)?;

    let dwell = Text::new("Seconds per slide:")
        .with_default(&config.dwell().as_secs().to_string())
        .prompt()?;
    config.set("defaults.dwell_secs", dwell.trim())?;

    let saved = config.save().context("Failed to save config")?;
    println!("{} {}", "Saved config to".green().bold(), saved.display());
    println!("Run `improv check` to test the connection.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_redacts_anon_key() {
        let mut config = Config::default();
        config.set("provider.url", "https://demo.supabase.co").unwrap();
        config
            .set("provider.anon_key", "eyJhbGciOiJIUzI1NiJ9.secret")
            .unwrap();
        let text = describe(&config).unwrap();
        assert!(text.contains("https://demo.supabase.co"));
        assert!(text.contains("eyJh********"));
        assert!(!text.contains("secret"));
    }
}
