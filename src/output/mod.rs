// Output formatting for analysis results.

pub mod terminal;

/// Link shown for items that have no external URL.
pub const ITEM_LINK_BASE: &str = "https://news.ycombinator.com/item?id=";

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// The item's own URL, or its discussion page when it has none.
pub fn item_link(item: &crate::models::Item) -> String {
    match &item.url {
        Some(url) => url.clone(),
        None => format!("{ITEM_LINK_BASE}{}", item.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn link_falls_back_to_discussion_page() {
        let mut item = Item::titled(42, "Ask HN: anything");
        assert_eq!(item_link(&item), "https://news.ycombinator.com/item?id=42");
        item.url = Some("https://example.com/post".to_string());
        assert_eq!(item_link(&item), "https://example.com/post");
    }
}
