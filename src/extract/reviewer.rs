use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::info;

use crate::document::{clean_text, stripped_strings};
use crate::gender::{GenderMemo, Salutation};
use crate::record::Review;
use crate::title;
use crate::{ExtractError, Result};

/// Link text standing where the reviewer description is missing.
static NO_DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Alle \d+ Rezensionen von").unwrap());

/// Name, gender, description and titles of the reviewer.
///
/// The text node right after the salutation is the name, the one after that the description.
/// "Rezensentin"/"Rezensent" feed `memo`; "Rezension von" is resolved from it.
pub fn extract_reviewer(
    content: ElementRef<'_>,
    review: &mut Review,
    memo: &mut GenderMemo,
    known_titles: &[String],
) -> Result<()> {
    let mut strings = stripped_strings(content);
    let salutation = strings
        .find_map(Salutation::from_marker)
        .ok_or(ExtractError::MissingReviewer)?;
    let (Some(name), Some(description)) = (strings.next(), strings.next()) else {
        return Err(ExtractError::MissingReviewer.into());
    };

    let name = clean_text(name);
    let gender = memo.resolve(&name, salutation);
    let description = Some(clean_text(description)).filter(|d| !is_placeholder(d));

    info!("Reviewer: '{name}' (Gender: {})", gender.as_str());
    info!("Reviewer Description: {description:?}");

    let titles = title::classify(&name.split(' ').collect::<Vec<_>>(), known_titles);
    review.reviewer_title = titles.titles;
    review.reviewer_highest_title = Some(titles.highest);
    review.reviewer_name = Some(name);
    review.reviewer_gender = Some(gender);
    review.reviewer_description = description;
    review.salutation = Some(salutation);
    Ok(())
}

fn is_placeholder(description: &str) -> bool {
    NO_DESCRIPTION_RE.is_match(description) || description == "E-Mail" || description == "Homepage"
}
