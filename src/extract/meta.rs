use std::collections::BTreeSet;

use tracing::debug;

use crate::document::Page;
use crate::record::Review;
use crate::{ExtractError, Result};

/// Keywords from `<meta name="keywords">`. Entries starting with `_` are site annotations
/// (e.g. "recommended") and are dropped.
pub fn extract_keywords(page: &Page, review: &mut Review) -> Result<()> {
    let content = page
        .meta_content("keywords")?
        .ok_or(ExtractError::MissingMeta("keywords"))?;
    review.keywords = split_keywords(&content);
    debug!(keywords = ?review.keywords, "Keywords");
    Ok(())
}

pub fn extract_description(page: &Page, review: &mut Review) -> Result<()> {
    let content = page
        .meta_content("description")?
        .ok_or(ExtractError::MissingMeta("description"))?;
    debug!("Description: {content}");
    review.description = Some(content);
    Ok(())
}

/// Keywords are separated by `;`, sometimes by newlines.
fn split_keywords(content: &str) -> Vec<String> {
    content
        .split([';', '\n'])
        .map(str::trim)
        .filter(|k| !k.is_empty() && !k.starts_with('_'))
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
