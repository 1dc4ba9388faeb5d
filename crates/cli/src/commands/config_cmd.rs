//! `thinkact config`: Configuration management commands.

use thinkact_config::AppConfig;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let mut warnings = Vec::new();
            if !config.has_api_key() && config.provider != "ollama" {
                warnings.push(
                    "No API key set (set THINKACT_API_KEY, OPENAI_API_KEY or OPENROUTER_API_KEY)",
                );
            }

            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   warning: {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.provider);
            println!("   Model:     {}", config.model);
            println!("   Toolset:   {}", config.tools.toolset);
            println!("   Max turns: {}", config.agent.max_turns);
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

pub fn path() {
    println!("{}", AppConfig::config_path().display());
}

/// A copy of the configuration with every API key masked.
fn redacted(mut config: AppConfig) -> AppConfig {
    const MASK: &str = "[REDACTED]";
    if config.api_key.is_some() {
        config.api_key = Some(MASK.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(MASK.into());
        }
    }
    config
}
