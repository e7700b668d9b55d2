use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::api::{http_get, top_answer_tags_url};
use super::data::{TagSet, TagStat};
use super::parse::{RawTagStat, parse_top_tags};

/// Fetches and aggregates the top answer tags for one user. Blocking; the
/// app runs this on a background thread.
pub fn fetch_tag_stats(user_id: u64) -> Result<TagSet> {
    let url = top_answer_tags_url(user_id);
    info!(user_id, "fetching top answer tags");

    let raw = http_get(&url)
        .with_context(|| format!("failed to fetch top answer tags for user {user_id}"))?;
    let items = parse_top_tags(&raw)
        .with_context(|| format!("failed to parse top answer tags for user {user_id}"))?;

    let tags = merge_duplicate_tags(items);
    if tags.is_empty() {
        return Err(anyhow!("user {user_id} has no scored answer tags"));
    }

    info!(user_id, tag_count = tags.len(), "top answer tags ready");
    Ok(TagSet { user_id, tags })
}

/// The API should never repeat a tag, but the chart keys animation state by
/// tag name, so repeats are folded together additively. First-seen order is
/// preserved.
fn merge_duplicate_tags(items: Vec<RawTagStat>) -> Vec<TagStat> {
    let mut index_by_tag: HashMap<String, usize> = HashMap::with_capacity(items.len());
    let mut tags: Vec<TagStat> = Vec::with_capacity(items.len());

    for item in items {
        if let Some(&index) = index_by_tag.get(&item.tag_name) {
            tags[index].score += item.answer_score;
            tags[index].answer_count += item.answer_count;
        } else {
            index_by_tag.insert(item.tag_name.clone(), tags.len());
            tags.push(TagStat {
                tag: item.tag_name,
                score: item.answer_score,
                answer_count: item.answer_count,
            });
        }
    }

    tags
}
