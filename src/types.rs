use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled PR";
pub const DEFAULT_ID: &str = "Unknown";

/// One merged pull request as supplied by the pull-request source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub description: String,
    pub diff: String,
    pub url: String,
}

/// Body of `POST /api/generate-notes`.
///
/// Every field may be absent or `null`; numbers are taken as their decimal
/// text, so `"prId": 42` reads as `"42"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "diff_or_empty")]
    pub diff: String,
    #[serde(rename = "prTitle", default = "default_title", deserialize_with = "title_or_default")]
    pub title: String,
    #[serde(rename = "prId", default = "default_id", deserialize_with = "id_or_default")]
    pub id: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_id() -> String {
    DEFAULT_ID.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Str(String),
    Number(serde_json::Number),
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::Str(s) => s,
        Text::Number(n) => n.to_string(),
    }))
}

fn diff_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(nullable_text(deserializer)?.unwrap_or_default())
}

fn title_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(nullable_text(deserializer)?.unwrap_or_else(default_title))
}

fn id_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(nullable_text(deserializer)?.unwrap_or_else(default_id))
}

impl GenerationRequest {
    pub fn new(diff: impl Into<String>) -> Self {
        Self {
            diff: diff.into(),
            title: default_title(),
            id: default_id(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.diff.is_empty()
    }
}

impl From<&PullRequest> for GenerationRequest {
    fn from(pr: &PullRequest) -> Self {
        Self {
            diff: pr.diff.clone(),
            title: pr.description.clone(),
            id: pr.id.clone(),
        }
    }
}
