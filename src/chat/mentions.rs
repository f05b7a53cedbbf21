//! File mention extraction from chat message text
//!
//! Finds things that look like file paths (`src/main.rs`, `./config.json`)
//! and well-known extensionless files (`Makefile`, `Dockerfile`) so the
//! session detail view can link them. URLs, host names and IP addresses are
//! filtered out.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Mentions longer than this are never treated as paths
const MAX_MENTION_LEN: usize = 200;

const BOUNDED_PATTERNS: &[&str] = &[
    // Paths or filenames with an extension, bounded by whitespace, quotes,
    // brackets or trailing punctuation.
    r#"(?:^|\s|`|[\[("])([\./A-Za-z0-9_\-]+(?:/[A-Za-z0-9_\-.]+)*\.[A-Za-z0-9]{1,6})(?:\s|`|$|[\]\),.;:!\?"'])"#,
    // Well-known filenames, optionally prefixed by directories
    r#"(?:^|\s|`|[\[("])((?:[\./A-Za-z0-9_\-]+/)*?(?:Makefile|Dockerfile|README|LICENSE|CHANGELOG|Cargo\.toml|package\.json|pom\.xml|build\.gradle))(?:\s|`|$|[\]\),.;:!\?"'])"#,
];

/// Anything in backticks, filtered afterwards
const BACKTICK_PATTERN: &str = r#"`([^`]+)`"#;

const COMMON_FILENAMES: &[&str] = &[
    "Makefile",
    "Dockerfile",
    "README",
    "LICENSE",
    "CHANGELOG",
    "Cargo.toml",
    "package.json",
    "pom.xml",
    "build.gradle",
];

const FALSE_POSITIVES: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "0.0.0.0",
    "example.com",
    "www.",
    ".com",
    ".org",
    ".net",
    ".io",
];

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern = %pattern, error = %e, "Invalid mention pattern");
            None
        }
    }
}

fn bounded_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| BOUNDED_PATTERNS.iter().filter_map(|p| compile(p)).collect())
}

fn backtick_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| compile(BACKTICK_PATTERN)).as_ref()
}

/// Extract file mentions from `content`
///
/// Returns a sorted, de-duplicated list.
///
/// # Examples
///
/// ```
/// use commander::chat::extract_file_mentions;
///
/// let mentions = extract_file_mentions("Check src/main.rs and the Makefile");
/// assert_eq!(mentions, vec!["Makefile".to_string(), "src/main.rs".to_string()]);
/// ```
pub fn extract_file_mentions(content: &str) -> Vec<String> {
    let mut mentions = BTreeSet::new();
    let mut keep = |candidate: &str| {
        let candidate = candidate.trim();
        if is_likely_file_path(candidate) {
            mentions.insert(candidate.to_string());
        }
    };

    for pattern in bounded_patterns() {
        // Resume right after the captured path rather than after the whole
        // match, so a delimiter shared by two neighbouring mentions can
        // bound both of them.
        let mut pos = 0;
        while let Some(cap) = pattern.captures_at(content, pos) {
            let Some(m) = cap.get(1) else { break };
            keep(m.as_str());
            pos = m.end().max(pos + 1);
            if pos >= content.len() {
                break;
            }
        }
    }

    // Backtick spans pair up left to right; a closing backtick never opens
    // the next span.
    if let Some(pattern) = backtick_pattern() {
        for cap in pattern.captures_iter(content) {
            if let Some(m) = cap.get(1) {
                keep(m.as_str());
            }
        }
    }

    mentions.into_iter().collect()
}

fn is_likely_file_path(text: &str) -> bool {
    if text.is_empty()
        || text.len() > MAX_MENTION_LEN
        || text.contains("://")
        || text.starts_with("http")
    {
        return false;
    }

    let basename = text.rsplit(['/', '\\']).next().unwrap_or(text);

    let has_extension = basename
        .rsplit_once('.')
        .map(|(_, ext)| !ext.is_empty() && ext.len() <= 6)
        .unwrap_or(false);

    (has_extension || is_common_filename(basename)) && !is_false_positive(text)
}

fn is_common_filename(text: &str) -> bool {
    COMMON_FILENAMES
        .iter()
        .any(|name| text.eq_ignore_ascii_case(name))
}

fn is_false_positive(text: &str) -> bool {
    FALSE_POSITIVES.iter().any(|fp| text.contains(fp))
        || text.chars().all(|c| c.is_ascii_digit() || c == '.')
}
