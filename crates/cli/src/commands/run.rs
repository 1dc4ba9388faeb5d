//! `thinkact run`: run the ReAct loop on a single prompt.

use std::io::Write;
use std::sync::Arc;

use thinkact_agent::{CancellationToken, ReactAgent, StreamingSink, SystemPromptTemplate};
use thinkact_config::AppConfig;
use thinkact_core::message::Conversation;
use thinkact_core::tool::ToolRegistry;

use crate::printer::ConsoleSink;

pub struct RunOptions {
    pub prompt: String,
    pub max_turns: Option<u32>,
    pub toolset: Option<String>,
    pub json: bool,
}

pub async fn run(opts: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let client = thinkact_providers::build_from_config(&config)?;
    let tools = build_registry(&config, opts.toolset.as_deref())?;
    let agent = build_agent(&config, client, tools, opts.max_turns)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling run");
            on_interrupt.cancel();
        }
    });

    let mut conversation = Conversation::new();

    if opts.json {
        let (mut sink, mut rx) = StreamingSink::channel();
        let writer = tokio::spawn(async move {
            let mut stdout = std::io::stdout();
            while let Some(event) = rx.recv().await {
                if let Ok(line) = serde_json::to_string(&event) {
                    let _ = writeln!(stdout, "{line}");
                    let _ = stdout.flush();
                }
            }
        });

        let outcome = agent
            .run_with_cancel(&mut conversation, &opts.prompt, &mut sink, &cancel)
            .await;
        if let Err(e) = &outcome {
            sink.on_error(e);
        }
        // Closing the channel lets the writer drain and exit
        drop(sink);
        let _ = writer.await;
        outcome?;
    } else {
        let mut sink = ConsoleSink::new(std::io::stdout());
        let result = agent
            .run_with_cancel(&mut conversation, &opts.prompt, &mut sink, &cancel)
            .await?;
        tracing::info!(
            turns = result.turns,
            tool_calls = result.tool_calls_made,
            "Run finished"
        );
    }

    Ok(())
}

/// The registry for the `--toolset` override or the configured toolset.
pub fn build_registry(
    config: &AppConfig,
    toolset: Option<&str>,
) -> Result<Arc<ToolRegistry>, Box<dyn std::error::Error>> {
    let name = toolset.unwrap_or(&config.tools.toolset);
    let registry = thinkact_tools::registry_for(name, config.tools.allowed_commands.clone())?;
    Ok(Arc::new(registry))
}

/// Apply the configured template and turn limit to a new agent.
pub fn build_agent(
    config: &AppConfig,
    client: Arc<dyn thinkact_core::provider::ModelClient>,
    tools: Arc<ToolRegistry>,
    max_turns: Option<u32>,
) -> Result<ReactAgent, Box<dyn std::error::Error>> {
    let mut agent = ReactAgent::new(client, tools)
        .with_max_turns(max_turns.unwrap_or(config.agent.max_turns));
    if let Some(template) = &config.agent.system_prompt_override {
        agent = agent.with_template(SystemPromptTemplate::new(template.clone())?);
    }
    Ok(agent)
}
