//! Post text cleanup: strips the platform noise (mentions, hashtag markers,
//! repost prefixes, links, emoji) that would otherwise skew sentiment scoring
//! and clutter hover tooltips.

use fancy_regex::Regex;
use std::sync::LazyLock;

static CLEANUP: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // @mentions and trailing _handles
        (r"@[A-Za-z0-9_]+", ""),
        (r"_[A-Za-z0-9]+", ""),
        // repost marker
        (r"\bRT\s+", ""),
        // hyperlinks
        (r"https?://\S+", ""),
        // hashtag marker only, the tag word itself stays
        (r"#", ""),
        (r": ", ""),
        // emoji and pictograph blocks
        (
            r"[\u{1F1E6}-\u{1F1FF}\u{1F300}-\u{1FAFF}\u{2300}-\u{23FF}\u{2500}-\u{2BFF}\u{2600}-\u{27B0}\u{FE0F}\u{200D}\u{3030}]",
            "",
        ),
        // normalize whitespace and quote variants
        (r#"[\n\t"„“]"#, " "),
        (r" +", " "),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

pub fn clean_text(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in CLEANUP.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out.trim().to_string()
}

/// Canonical city key from a free-form location string: first comma segment,
/// trimmed and uppercased. `None` when nothing usable remains.
pub fn normalize_location(raw: &str) -> Option<String> {
    let first = raw.split(',').next().unwrap_or("").trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_uppercase())
    }
}
