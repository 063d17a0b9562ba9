//! Turns raw search index hits into [`SearchResult`]s.
//!
//! Everything here is a pure function of the raw item.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use signalscout_core::{SearchResult, SignalSource};

/// Author placeholder when the snippet names nobody.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// One entry of the index's `items` array.  Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

fn subreddit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)reddit\.com/r/([A-Za-z0-9_]+)").expect("valid regex"))
}

fn user_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)by u/([A-Za-z0-9_-]+)").expect("valid regex"))
}

fn posted_by_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)posted by ([A-Za-z0-9_-]+)").expect("valid regex"))
}

fn trailing_site_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+-\s+reddit\s*$").expect("valid regex"))
}

fn trailing_community_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+:\s+(r/)?([A-Za-z0-9_]+)\s*$").expect("valid regex"))
}

pub fn normalize(item: &RawItem) -> SearchResult {
    let url = item.link.as_deref().unwrap_or("").trim().to_string();
    let snippet = item.snippet.as_deref().unwrap_or("").trim().to_string();
    let subreddit = extract_subreddit(&url);
    let author = extract_author(&snippet);
    let title = clean_title(item.title.as_deref().unwrap_or(""), &subreddit);

    SearchResult {
        title,
        snippet,
        url,
        subreddit,
        author,
        source: SignalSource::Google,
    }
}

/// `…reddit.com/r/<name>…` → `<name>`, otherwise empty.
pub fn extract_subreddit(url: &str) -> String {
    subreddit_re()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// `by u/<name>` is tried before `posted by <name>`, so "posted by u/x"
/// yields `x` rather than `u`.
pub fn extract_author(snippet: &str) -> String {
    [user_mention_re(), posted_by_re()]
        .into_iter()
        .find_map(|re| re.captures(snippet).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Drop the " - Reddit" site suffix, then a " : r/<name>" (or " : <community>")
/// suffix.  A trailing " : word" that is not the community stays.
pub fn clean_title(raw: &str, community: &str) -> String {
    let mut title = trailing_site_re().replace(raw.trim(), "").into_owned();

    let cut = trailing_community_re().captures(&title).and_then(|caps| {
        let whole = caps.get(0)?;
        let prefixed = caps.get(1).is_some();
        let name = caps.get(2)?.as_str();
        let is_community = !community.is_empty() && name.eq_ignore_ascii_case(community);
        (prefixed || is_community).then_some(whole.start())
    });
    if let Some(start) = cut {
        title.truncate(start);
    }

    title.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(title: Option<&str>, snippet: Option<&str>, link: Option<&str>) -> RawItem {
        RawItem {
            title: title.map(str::to_string),
            snippet: snippet.map(str::to_string),
            link: link.map(str::to_string),
        }
    }

    #[test]
    fn normalizes_full_item() {
        let raw = item(
            Some("Invoicing in spreadsheets is killing me : smallbusiness - Reddit"),
            Some("Posted by jane_doe 3 days ago. Every month I copy numbers..."),
            Some("https://www.reddit.com/r/smallbusiness/comments/1abc/invoicing/"),
        );
        let result = normalize(&raw);
        assert_eq!(
            result,
            SearchResult {
                title: "Invoicing in spreadsheets is killing me".to_string(),
                snippet: "Posted by jane_doe 3 days ago. Every month I copy numbers...".to_string(),
                url: "https://www.reddit.com/r/smallbusiness/comments/1abc/invoicing/".to_string(),
                subreddit: "smallbusiness".to_string(),
                author: "jane_doe".to_string(),
                source: SignalSource::Google,
            }
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let result = normalize(&RawItem::default());
        assert_eq!(result.title, "");
        assert_eq!(result.url, "");
        assert_eq!(result.subreddit, "");
        assert_eq!(result.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn subreddit_requires_r_path() {
        assert_eq!(extract_subreddit("https://old.reddit.com/r/SaaS/comments/x"), "SaaS");
        assert_eq!(extract_subreddit("https://www.reddit.com/user/someone/"), "");
        assert_eq!(extract_subreddit("https://example.com/r/saas"), "");
    }

    #[test]
    fn author_prefers_user_mention() {
        assert_eq!(extract_author("Submitted BY u/Founder-42 yesterday"), "Founder-42");
        assert_eq!(extract_author("posted by u/alice"), "alice");
        assert_eq!(extract_author("POSTED BY bob_smith"), "bob_smith");
        assert_eq!(extract_author("no attribution here"), UNKNOWN_AUTHOR);
    }

    #[test]
    fn title_cleanup_variants() {
        assert_eq!(clean_title("Need help : r/startups", "startups"), "Need help");
        assert_eq!(clean_title("Need help : r/other", ""), "Need help");
        assert_eq!(clean_title("Need help - Reddit", ""), "Need help");
        assert_eq!(clean_title("Need help : startups - Reddit", "startups"), "Need help");
        assert_eq!(clean_title("Win ratio : 5", "startups"), "Win ratio : 5");
        assert_eq!(clean_title("", "startups"), "");
    }

    #[test]
    fn normalize_is_deterministic() {
        let raw = item(
            Some("Hate manual invoices : r/freelance"),
            Some("by u/carol"),
            Some("https://www.reddit.com/r/freelance/comments/9"),
        );
        let first = normalize(&raw);
        let _ = normalize(&item(Some("other"), None, None));
        assert_eq!(normalize(&raw), first);
    }
}
