//! Build the configured model client.

use std::sync::Arc;
use std::time::Duration;

use thinkact_config::AppConfig;
use thinkact_core::error::ProviderError;
use thinkact_core::provider::ModelClient;

use crate::openai_compat::OpenAiCompatClient;

/// Build the model client selected by `config.provider`.
///
/// The base URL comes from `[providers.<name>].api_url` or the well-known
/// default; the key from the provider entry, then the top-level key.
/// Only local providers may run without a key.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn ModelClient>, ProviderError> {
    let name = config.provider.as_str();
    let provider_config = config.active_provider();

    let base_url = match provider_config.and_then(|p| p.api_url.clone()) {
        Some(url) => url,
        None => default_base_url(name).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{name}': set [providers.{name}] api_url"
            ))
        })?,
    };

    let api_key = match config.resolve_api_key() {
        Some(key) => key,
        None if is_local(name) => String::new(),
        None => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for '{name}': set THINKACT_API_KEY or api_key in the config file"
            )));
        }
    };

    tracing::debug!(provider = name, base_url = %base_url, model = %config.model, "Building model client");

    let client = OpenAiCompatClient::new(name, base_url, api_key)
        .with_model(&config.model)
        .with_temperature(config.temperature)
        .with_timeout(Duration::from_secs(config.request_timeout_secs));

    Ok(Arc::new(client))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url.to_string())
}

fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinkact_config::ProviderConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").unwrap().contains("openrouter.ai"));
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("mystery").is_none());
    }

    #[test]
    fn build_requires_a_key_for_remote_providers() {
        let config = AppConfig::default();
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn build_with_top_level_key() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let client = build_from_config(&config).unwrap();
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn local_provider_needs_no_key() {
        let config = AppConfig {
            provider: "ollama".into(),
            model: "llama3.1".into(),
            ..AppConfig::default()
        };
        let client = build_from_config(&config).unwrap();
        assert_eq!(client.name(), "ollama");
    }

    #[test]
    fn custom_provider_uses_configured_url() {
        let mut config = AppConfig {
            provider: "internal".into(),
            api_key: Some("k".into()),
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_err());

        config.providers.insert(
            "internal".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("http://models.internal:9000/v1".into()),
            },
        );
        let client = build_from_config(&config).unwrap();
        assert_eq!(client.name(), "internal");
    }
}
