use anyhow::{anyhow, Result};
use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;
use std::env;
use tracing::info;

use crate::clustering::{ClusterParams, Scoring, DEFAULT_TAG_LIMIT, DEFAULT_THRESHOLD};
use crate::enrichment::DEFAULT_ENRICH_CONCURRENCY;
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// Empty entries are dropped.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `delimiter`: The character to split the environment variable's value by.
///
/// # Returns
/// - `Vec<String>`
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Which completion backend enrichment talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmType {
    #[default]
    Ollama,
    OpenAI,
}

impl From<&str> for LlmType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" => LlmType::OpenAI,
            _ => LlmType::Ollama,
        }
    }
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub threshold: f64,
    pub title_merge: bool,
    pub scoring: Scoring,
    pub tag_limit: usize,
    pub enrich_concurrency: usize,
    pub llm_type: LlmType,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub model: String,
    pub openai_api_key: Option<String>,
    pub temperature: f32,
    pub cache_database_path: Option<String>,
    pub extra_companies: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            title_merge: false,
            scoring: Scoring::default(),
            tag_limit: DEFAULT_TAG_LIMIT,
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            llm_type: LlmType::default(),
            ollama_host: "localhost".to_string(),
            ollama_port: 11434,
            model: "llama3".to_string(),
            openai_api_key: None,
            temperature: 0.0,
            cache_database_path: None,
            extra_companies: Vec::new(),
        }
    }
}

impl Config {
    /// Builds a configuration from the process environment.
    ///
    /// Unset or unparseable variables keep their defaults. The threshold is
    /// clamped to [0, 1] and the enrichment concurrency is at least 1.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let threshold = env::var("CLUSTER_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .unwrap_or(defaults.threshold);

        Config {
            threshold: clamp_threshold(threshold),
            title_merge: env::var("CLUSTER_TITLE_MERGE")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.title_merge),
            scoring: env::var("CLUSTER_SCORING")
                .map(|s| Scoring::from(s.as_str()))
                .unwrap_or(defaults.scoring),
            tag_limit: env::var("CLUSTER_TAG_LIMIT")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.tag_limit),
            enrich_concurrency: env::var("ENRICH_CONCURRENCY")
                .ok()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(defaults.enrich_concurrency)
                .max(1),
            llm_type: env::var("ENRICH_LLM_TYPE")
                .map(|s| LlmType::from(s.as_str()))
                .unwrap_or(defaults.llm_type),
            ollama_host: env::var("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            ollama_port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.ollama_port),
            model: env::var("ENRICH_MODEL").unwrap_or(defaults.model),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            temperature: env::var("ENRICH_TEMPERATURE")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.temperature),
            cache_database_path: env::var("CACHE_DATABASE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            extra_companies: get_env_var_as_vec("EXTRA_COMPANIES", ';'),
        }
    }

    /// Overrides the threshold, keeping it inside [0, 1].
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = clamp_threshold(threshold);
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            threshold: self.threshold,
            title_merge: self.title_merge,
            scoring: self.scoring,
            generate_content: true,
            tag_limit: self.tag_limit,
            extra_companies: self.extra_companies.clone(),
        }
    }

    /// Builds the LLM client for enrichment.
    ///
    /// # Returns
    /// - `Err` when OpenAI is selected without an API key.
    pub fn llm_params(&self) -> Result<LLMParams> {
        let llm_client = match self.llm_type {
            LlmType::OpenAI => {
                let api_key = self
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| anyhow!("OPENAI_API_KEY must be set when ENRICH_LLM_TYPE is openai"))?;
                let config = OpenAIConfig::new().with_api_key(api_key);
                LLMClient::OpenAI(OpenAIClient::with_config(config))
            }
            LlmType::Ollama => {
                info!(
                    target: TARGET_LLM_REQUEST,
                    "Connecting to Ollama at {}:{}", self.ollama_host, self.ollama_port
                );
                LLMClient::Ollama(Ollama::new(self.ollama_host.clone(), self.ollama_port))
            }
        };

        Ok(LLMParams {
            llm_client,
            model: self.model.clone(),
            temperature: self.temperature,
        })
    }
}

fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        DEFAULT_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only variables no other test reads are touched here, since tests share
    // the process environment.
    #[test]
    fn test_get_env_var_as_vec() {
        env::set_var("NEWS_CLUSTERS_TEST_LIST", " nvidia ; ;openai;");
        assert_eq!(
            get_env_var_as_vec("NEWS_CLUSTERS_TEST_LIST", ';'),
            vec!["nvidia", "openai"]
        );
        assert!(get_env_var_as_vec("NEWS_CLUSTERS_TEST_UNSET", ';').is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_threshold_is_clamped() {
        let mut config = Config::default();
        config.set_threshold(1.7);
        assert_eq!(config.threshold, 1.0);
        config.set_threshold(-0.2);
        assert_eq!(config.threshold, 0.0);
        config.set_threshold(f64::NAN);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_llm_type_and_cluster_params() {
        assert_eq!(LlmType::from("OpenAI"), LlmType::OpenAI);
        assert_eq!(LlmType::from("anything"), LlmType::Ollama);

        let config = Config {
            title_merge: true,
            scoring: Scoring::Weighted,
            ..Config::default()
        };
        let params = config.cluster_params();
        assert!(params.title_merge);
        assert_eq!(params.scoring, Scoring::Weighted);
        assert_eq!(params.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_openai_requires_key() {
        let config = Config {
            llm_type: LlmType::OpenAI,
            ..Config::default()
        };
        assert!(config.llm_params().is_err());
    }
}
