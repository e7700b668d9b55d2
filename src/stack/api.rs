use anyhow::{Context, Result};

const API_ROOT: &str = "https://api.stackexchange.com/2.2";
const API_KEY: &str = "U4DMV*8nvpm3EOpvf69Rxw((";
const SITE: &str = "stackoverflow";
const PAGE_SIZE: u32 = 100;

pub(super) fn top_answer_tags_url(user_id: u64) -> String {
    format!(
        "{API_ROOT}/users/{user_id}/top-answer-tags?key={API_KEY}&site={SITE}&pagesize={PAGE_SIZE}&filter=default"
    )
}

pub(super) fn http_get(url: &str) -> Result<String> {
    match ureq::get(url).call() {
        Ok(response) => response
            .into_string()
            .context("response body was not valid UTF-8"),
        // The API reports failures as a JSON error envelope with a 4xx
        // status; hand the body to the parser so it can surface the
        // error_message instead of just the status code.
        Err(ureq::Error::Status(_code, response)) => response
            .into_string()
            .context("error response body was not valid UTF-8"),
        Err(error) => Err(error).with_context(|| format!("GET {url} failed")),
    }
}
