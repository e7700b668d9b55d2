mod api;
mod data;
mod fetch;
mod parse;

pub use data::{TagSet, TagStat};
pub use fetch::fetch_tag_stats;
pub use parse::parse_user_input;

pub const DEFAULT_USER_ID: u64 = 5806646;
