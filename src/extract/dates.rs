use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use crate::document::stripped_strings;
use crate::record::Review;
use crate::{ExtractError, Result, DATE_MARKER};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-3][0-9]\.[0-1][0-9]\.[1-2][0-9]{3}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewDates {
    pub published: NaiveDate,
    pub accessed: Option<NaiveDate>,
}

/// Publication and access date from the "Rezension vom ..." line.
pub fn extract_dates(content: ElementRef<'_>, review: &mut Review) -> Result<()> {
    let line = stripped_strings(content)
        .find(|s| s.contains(DATE_MARKER))
        .ok_or(ExtractError::MissingReviewDate)?;

    let dates = parse_review_dates(line)?;
    debug!(published = %dates.published, accessed = ?dates.accessed, "Review dates");
    review.date = Some(dates.published);
    review.date_access = dates.accessed;
    Ok(())
}

/// The first date is the publication date and must exist, a second one is the access date.
/// Further dates are ignored.
pub fn parse_review_dates(line: &str) -> Result<ReviewDates> {
    let found: Vec<&str> = DATE_RE.find_iter(line).map(|m| m.as_str()).collect();

    let Some(first) = found.first() else {
        return Err(ExtractError::MissingReviewDate.into());
    };
    if found.len() > 2 {
        warn!("Too many dates found: {}", found.join(";"));
    }

    Ok(ReviewDates {
        published: parse_date(first)?,
        accessed: found.get(1).map(|d| parse_date(d)).transpose()?,
    })
}

/// `dd.mm.yyyy`
fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%d.%m.%Y")
        .map_err(|_| ExtractError::InvalidReviewDate(date.to_string()).into())
}
