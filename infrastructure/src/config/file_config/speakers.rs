//! Speaker declarations from TOML (`[[speakers]]` array)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSpeakerConfig {
    pub id: String,
    /// Provider kind, e.g. "openai" or "anthropic"
    pub provider: String,
    pub model: String,
    /// Name in `[characters]`, or a `.toml` / `.json` file
    #[serde(alias = "characterDefinition")]
    pub character: String,
}
