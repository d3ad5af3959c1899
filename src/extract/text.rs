use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::document::{find_all, text_of};
use crate::record::Review;
use crate::{ExtractError, Result, LEADING_BOILERPLATE_PARAGRAPHS, TRAILING_BOILERPLATE_PARAGRAPHS};

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());

/// Paragraphs inside the review window that are still page furniture.
const BOILERPLATE_PREFIXES: &[&str] = &[
    "Besprochenes Werk kaufen",
    "Rezensent",
    "Rezensentin",
    "Rezension von",
];

/// Review body: the paragraphs of the main content box between the leading and trailing
/// boilerplate, minus known furniture. Also sets the word count.
pub fn extract_text(content: ElementRef<'_>, review: &mut Review) -> Result<()> {
    let paragraphs = find_all(content, &PARAGRAPH);
    let end = paragraphs.len().saturating_sub(TRAILING_BOILERPLATE_PARAGRAPHS);
    let window = paragraphs.get(LEADING_BOILERPLATE_PARAGRAPHS..end).unwrap_or_default();

    let text = window
        .iter()
        .map(|p| text_of(*p))
        .filter(|t| !t.is_empty() && !BOILERPLATE_PREFIXES.iter().any(|b| t.starts_with(b)))
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return Err(ExtractError::EmptyText.into());
    }

    let word_count = text.split_whitespace().count();
    debug!("Words: {word_count}");
    review.text = Some(text);
    review.word_count = Some(word_count);
    Ok(())
}

/// Non-empty `<h2>` texts of the main content box.
pub fn extract_headings(content: ElementRef<'_>, review: &mut Review) -> Result<()> {
    review.headings = find_all(content, &HEADING)
        .into_iter()
        .map(text_of)
        .filter(|h| !h.is_empty())
        .collect();
    debug!(headings = ?review.headings, "Headings");
    Ok(())
}
