//! `thinkact tools`: print the system prompt a run would start with.

use thinkact_agent::SystemPromptTemplate;
use thinkact_config::AppConfig;

use super::run::build_registry;

pub fn run(toolset: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let tools = build_registry(&config, toolset.as_deref())?;

    let template = match &config.agent.system_prompt_override {
        Some(text) => SystemPromptTemplate::new(text.clone())?,
        None => SystemPromptTemplate::default(),
    };
    println!("{}", template.render(&tools));
    Ok(())
}
