//! Upstream model catalogue
//!
//! Closed set of model identifiers the aggregation service accepts, plus
//! the request aliases callers may use to select them.

use crate::types::ModelInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream model identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    /// GPT-4o Mini, the upstream default
    #[default]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    /// Claude 3 Haiku
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
    /// Llama 3.3 70B Instruct Turbo
    #[serde(rename = "meta-llama/Llama-3.3-70B-Instruct-Turbo")]
    Llama33,
    /// Mistral Small 24B Instruct
    #[serde(rename = "mistralai/Mistral-Small-24B-Instruct-2501")]
    MistralSmall,
    /// o4-mini
    #[serde(rename = "o4-mini")]
    O4Mini,
}

impl Model {
    /// The identifier sent on the wire
    pub fn id(&self) -> &'static str {
        match self {
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Claude3Haiku => "claude-3-haiku-20240307",
            Model::Llama33 => "meta-llama/Llama-3.3-70B-Instruct-Turbo",
            Model::MistralSmall => "mistralai/Mistral-Small-24B-Instruct-2501",
            Model::O4Mini => "o4-mini",
        }
    }

    /// Catalogue entries for the models endpoint
    pub fn catalogue() -> Vec<ModelInfo> {
        [
            (
                Model::Gpt4oMini,
                "GPT-4o Mini",
                "Fast, balanced general-purpose model",
                "gpt-4o-mini",
            ),
            (
                Model::Claude3Haiku,
                "Claude 3 Haiku",
                "Strong at creative writing and explanations",
                "claude-3-haiku",
            ),
            (
                Model::Llama33,
                "Llama 3.3 70B",
                "Geared towards programming and technical tasks",
                "llama",
            ),
            (
                Model::MistralSmall,
                "Mistral Small",
                "Good fit for analysis and reasoning",
                "mixtral",
            ),
            (Model::O4Mini, "o4-mini", "Very fast short answers", "o4mini"),
        ]
        .into_iter()
        .map(|(model, name, description, alias)| ModelInfo {
            id: model.id().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            alias: alias.to_string(),
        })
        .collect()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Model {
    type Err = crate::Error;

    /// Parse a model identifier or alias, case-insensitively.
    ///
    /// The empty string selects the default model so callers can omit the
    /// field entirely.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "gpt-4o-mini" | "gpt4mini" | "" => Ok(Model::Gpt4oMini),
            "claude-3-haiku-20240307" | "claude" | "claude3" => Ok(Model::Claude3Haiku),
            "meta-llama/llama-3.3-70b-instruct-turbo" | "llama" | "llama3" => Ok(Model::Llama33),
            "mistralai/mistral-small-24b-instruct-2501" | "mixtral" | "mistral" => {
                Ok(Model::MistralSmall)
            }
            "o4-mini" | "o4mini" => Ok(Model::O4Mini),
            other => Err(crate::Error::validation(
                "model",
                &format!("unsupported model: {}", other),
            )),
        }
    }
}
