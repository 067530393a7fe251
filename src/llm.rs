use anyhow::{anyhow, Result};
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::enrichment::CompletionService;
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

/// Upper bound on a single completion request.
pub const LLM_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends one prompt to the configured backend and returns the raw text.
///
/// A single attempt bounded by [`LLM_REQUEST_TIMEOUT`]; callers decide what a
/// failure means for them.
pub async fn generate_llm_response(prompt: &str, params: &LLMParams) -> Result<String> {
    debug!(
        target: TARGET_LLM_REQUEST,
        "Sending LLM request to model {} ({} chars)",
        params.model,
        prompt.len()
    );

    let request = async {
        match &params.llm_client {
            LLMClient::Ollama(ollama) => {
                let mut request = GenerationRequest::new(params.model.clone(), prompt.to_string());
                request.options = Some(GenerationOptions::default().temperature(params.temperature));
                let response = ollama
                    .generate(request)
                    .await
                    .map_err(|e| anyhow!("Ollama request failed: {}", e))?;
                Ok(response.response)
            }
            LLMClient::OpenAI(client) => {
                let message = ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?;
                let request = CreateChatCompletionRequestArgs::default()
                    .model(params.model.clone())
                    .temperature(params.temperature)
                    .messages(vec![message.into()])
                    .build()?;
                let response = client.chat().create(request).await?;
                response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| anyhow!("OpenAI response contained no content"))
            }
        }
    };

    match timeout(LLM_REQUEST_TIMEOUT, request).await {
        Ok(Ok(text)) => {
            debug!(target: TARGET_LLM_REQUEST, "LLM response received ({} chars)", text.len());
            Ok(text)
        }
        Ok(Err(e)) => {
            warn!(target: TARGET_LLM_REQUEST, "Error generating response: {}", e);
            Err(e)
        }
        Err(_) => {
            warn!(target: TARGET_LLM_REQUEST, "LLM request timed out");
            Err(anyhow!(
                "LLM request timed out after {}s",
                LLM_REQUEST_TIMEOUT.as_secs()
            ))
        }
    }
}

impl CompletionService for LLMParams {
    async fn complete(&self, prompt: &str) -> Result<String> {
        generate_llm_response(prompt, self).await
    }
}
