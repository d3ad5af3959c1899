//! Field extractors. Each one locates a single region of a page and assigns into the review.
//! Mandatory fields fail with an `ExtractError`; optional ones log a warning and leave the
//! field empty.

pub mod dates;
pub mod heading;
pub mod links;
pub mod location;
pub mod meta;
pub mod reviewer;
pub mod text;

use crate::document::Page;
use crate::NOT_FOUND_MARKER;

/// A page whose title carries the "page not found" marker stands for a removed article.
pub fn is_not_found(page: &Page) -> bool {
    page.title()
        .is_some_and(|title| title.contains(NOT_FOUND_MARKER))
}
