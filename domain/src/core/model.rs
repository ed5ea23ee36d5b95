//! Model value object representing a locally served model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::DomainError;

/// Name of a model served by the inference backend (Value Object)
///
/// Ollama names are `family[:tag]`, e.g. `qwen2.5-coder:7b`. A name without a
/// tag refers to `latest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Model(String);

impl Model {
    /// Create a model name, rejecting empty or whitespace-containing names.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModel("model name is empty".to_string()));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidModel(format!(
                "model name contains whitespace: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Family part of the name (before `:`)
    pub fn family(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(family, _)| family)
    }

    /// Tag part of the name (after `:`), `latest` when absent
    pub fn tag(&self) -> &str {
        self.0.split_once(':').map_or("latest", |(_, tag)| tag)
    }

    /// Whether `other` names the same model, treating a missing tag as `latest`.
    pub fn matches(&self, other: &str) -> bool {
        match Model::new(other) {
            Ok(other) => self.family() == other.family() && self.tag() == other.tag(),
            Err(_) => false,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::new(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Model::new(s).map_err(serde::de::Error::custom)
    }
}

/// Sampling options forwarded to the backend (all optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Context window size
    #[serde(skip_serializing_if = "Option::is_none", alias = "context_window")]
    pub num_ctx: Option<u32>,
}

impl ModelOptions {
    /// Options used when nothing is configured for a model.
    pub fn agent_defaults() -> Self {
        Self {
            temperature: Some(0.7),
            num_predict: Some(2048),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_num_predict(mut self, num_predict: i32) -> Self {
        self.num_predict = Some(num_predict);
        self
    }

    /// Fill unset fields from `base`.
    pub fn merged_over(self, base: &ModelOptions) -> Self {
        Self {
            temperature: self.temperature.or(base.temperature),
            num_predict: self.num_predict.or(base.num_predict),
            top_k: self.top_k.or(base.top_k),
            top_p: self.top_p.or(base.top_p),
            num_ctx: self.num_ctx.or(base.num_ctx),
        }
    }
}
