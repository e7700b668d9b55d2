use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::Deserialize;

/// One entry of the API's `items` array.
#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawTagStat {
    pub(super) tag_name: String,
    #[serde(default)]
    pub(super) answer_score: u64,
    #[serde(default)]
    pub(super) answer_count: u64,
}

#[derive(Debug, Deserialize)]
struct TopTagsResponse {
    #[serde(default)]
    items: Vec<RawTagStat>,
    error_id: Option<u64>,
    error_message: Option<String>,
}

pub(super) fn parse_top_tags(raw: &str) -> Result<Vec<RawTagStat>> {
    let parsed: TopTagsResponse =
        serde_json::from_str(raw).context("invalid JSON from the Stack Exchange API")?;

    if let Some(error_id) = parsed.error_id {
        let message = parsed
            .error_message
            .unwrap_or_else(|| "unknown API error".to_owned());
        return Err(anyhow!("Stack Exchange API error {error_id}: {message}"));
    }

    Ok(parsed.items)
}

static PROFILE_URL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"users/(\d+)").expect("profile id pattern compiles"));

/// Accepts either a bare numeric id or a pasted profile URL such as
/// `https://stackoverflow.com/users/5806646/some-name`.
pub fn parse_user_input(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(id) = trimmed.parse::<u64>() {
        return Some(id);
    }

    PROFILE_URL_ID
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse::<u64>().ok())
}
