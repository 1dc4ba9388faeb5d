//! Structured output adapter.
//!
//! Asks the model for JSON conforming to a type's strict schema and decodes
//! it. Malformed output is an error; a default value is never substituted.

use std::sync::Arc;

use thinkact_core::error::{Error, Result};
use thinkact_core::message::ChatMessage;
use thinkact_core::provider::{ModelClient, ResponseFormat};
use thinkact_core::schema::OutputSchema;
use tracing::debug;

pub struct StructuredPredictor {
    client: Arc<dyn ModelClient>,
}

impl StructuredPredictor {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn ModelClient> {
        &self.client
    }

    /// Predict a `T` from `history`. Does not touch the history.
    pub async fn predict<T: OutputSchema>(
        &self,
        history: &[ChatMessage],
        schema_name: &str,
        schema_description: &str,
    ) -> Result<T> {
        let format = ResponseFormat::strict(schema_name, schema_description, T::json_schema());

        debug!(
            client = self.client.name(),
            schema = schema_name,
            messages = history.len(),
            "Requesting structured output"
        );

        let raw = self.client.structured_chat(history, &format).await?;

        serde_json::from_str(&raw).map_err(|e| Error::Decode {
            schema: schema_name.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedClient, thought};
    use thinkact_core::action::Thought;

    #[tokio::test]
    async fn predict_decodes_and_sends_strict_schema() {
        let client = Arc::new(ScriptedClient::new(vec![thought("plan the work")]));
        let predictor = StructuredPredictor::new(client.clone());

        let history = vec![ChatMessage::user("hi")];
        let result: Thought = predictor
            .predict(&history, "thought", "Think first")
            .await
            .unwrap();

        assert_eq!(result.thought, "plan the work");
        let formats = client.formats();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].name, "thought");
        assert_eq!(formats[0].description, "Think first");
        assert!(formats[0].strict);
        assert_eq!(formats[0].schema, Thought::json_schema());
    }

    #[tokio::test]
    async fn malformed_output_is_a_decode_error() {
        let client = Arc::new(ScriptedClient::new(vec!["{\"thought\": 42}"]));
        let predictor = StructuredPredictor::new(client);

        let err = predictor
            .predict::<Thought>(&[], "thought", "Think first")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { ref schema, .. } if schema == "thought"));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let client = Arc::new(ScriptedClient::new(Vec::<String>::new()));
        let predictor = StructuredPredictor::new(client);

        let err = predictor
            .predict::<Thought>(&[], "thought", "Think first")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}
