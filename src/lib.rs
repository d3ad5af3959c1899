//! REVIEW PAGE SCRAPER
//! Turns a directory of archived review pages (`<id>.html`) into structured review records.

mod error;
mod macros;

pub mod config;
pub mod corpus;
pub mod document;
pub mod export;
pub mod extract;
pub mod gender;
pub mod interrupt;
pub mod process;
pub mod record;
pub mod title;

#[cfg(test)]
mod fixtures;

pub use error::{Error, ExtractError, Result};

/// Title text of a page whose article was removed.
const NOT_FOUND_MARKER: &str = "Seite nicht gefunden";
/// Text node carrying the publication (and access) date.
const DATE_MARKER: &str = "Rezension vom";
/// Paragraphs of the main content box that precede the review text.
const LEADING_BOILERPLATE_PARAGRAPHS: usize = 3;
/// Paragraphs of the main content box that follow the review text.
const TRAILING_BOILERPLATE_PARAGRAPHS: usize = 7;
const DNB_LINK_PREFIX: &str = "http://portal.d-nb.de/opac.htm?query=";
const REVIEWER_LINK_PREFIX: &str = "/rezensionen/rezensionen.php";
const CATEGORY_LINK_PATH: &str = "/stellenmarkt/index.php?auswahl=";

pub const IGNORE_LINKS_FILE: &str = "ignore-urls.txt";
pub const CITIES_FILE: &str = "german-cities.txt";
pub const TITLES_FILE: &str = "titles.txt";
