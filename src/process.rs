use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{error, info, warn};

use crate::config::ExtractConfig;
use crate::document::Page;
use crate::extract::{self, dates, heading, links, location, meta, reviewer, text};
use crate::gender::GenderMemo;
use crate::record::{Outcome, Review};
use crate::{ExtractError, Result};

/// Reads and processes one document. Never fails: unreadable files become `ParseFailed`.
pub fn process_file(id: u64, path: &Path, config: &ExtractConfig, memo: &mut GenderMemo) -> Outcome {
    info!("Processing file: '{}'", path.display());
    match fs::read_to_string(path) {
        Ok(html) => process_document(id, &html, config, memo),
        Err(e) => {
            error!(id, error = ?e, "Could not read '{}'", path.display());
            Outcome::ParseFailed {
                review: failed(id),
                reason: e.to_string(),
            }
        }
    }
}

/// Runs the extractor sequence on one page and classifies the result.
///
/// Hard extraction failures, any other error and panics all end in `ParseFailed`, carrying
/// whatever fields were filled before the failure.
pub fn process_document(id: u64, html: &str, config: &ExtractConfig, memo: &mut GenderMemo) -> Outcome {
    let page = Page::parse(html);

    if extract::is_not_found(&page) {
        info!("Review {id} not found (404)");
        return Outcome::NotFound { id };
    }

    let mut review = Review::new(id);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        run_extractors(&page, &mut review, config, memo)
    }));

    match result {
        Ok(Ok(())) => {
            info!("Review {id} processed");
            Outcome::Success(review)
        }
        Ok(Err(e)) => {
            if e.is_classified() {
                warn!("Review {id}: {e}");
            } else {
                error!(id, error = ?e, "Unexpected error while extracting review");
            }
            review.parsed_success = false;
            Outcome::ParseFailed {
                review,
                reason: e.to_string(),
            }
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            error!(id, "Extractor panicked: {reason}");
            review.parsed_success = false;
            Outcome::ParseFailed { review, reason }
        }
    }
}

/// Fixed order; the first hard failure aborts the rest.
fn run_extractors(
    page: &Page,
    review: &mut Review,
    config: &ExtractConfig,
    memo: &mut GenderMemo,
) -> Result<()> {
    meta::extract_keywords(page, review)?;
    meta::extract_description(page, review)?;

    let boxes = page.content_boxes();
    let content = *boxes.first().ok_or(ExtractError::MissingContentBox)?;

    heading::extract_heading(content, review)?;
    dates::extract_dates(content, review)?;
    reviewer::extract_reviewer(content, review, memo, &config.titles)?;
    text::extract_text(content, review)?;
    text::extract_headings(content, review)?;
    links::extract_links(content, review, &config.ignore_links)?;
    links::extract_reviewer_id(content, review)?;
    links::extract_category(boxes.get(2).copied(), review);
    location::guess_cities(review, &config.cities);
    Ok(())
}

fn failed(id: u64) -> Review {
    let mut review = Review::new(id);
    review.parsed_success = false;
    review
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, PageSpec};
    use crate::gender::Gender;
    use crate::title::AcademicTitle;
    use chrono::NaiveDate;

    fn config() -> ExtractConfig {
        ExtractConfig {
            ignore_links: vec!["twitter.com".into()],
            cities: vec!["Köln".into(), "Berlin".into()],
            titles: vec!["Lic.".into()],
        }
    }

    fn process(spec: &PageSpec, memo: &mut GenderMemo) -> Outcome {
        process_document(42, &fixtures::review_page(spec), &config(), memo)
    }

    #[test]
    fn full_page_succeeds() {
        let mut memo = GenderMemo::new();
        let Outcome::Success(review) = process(&PageSpec::default(), &mut memo) else {
            panic!("expected success");
        };

        assert_eq!(review.id, 42);
        assert!(review.parsed_success);
        assert_eq!(review.keywords, vec!["Jugend", "Schule", "Soziale Arbeit"]);
        assert_eq!(review.description.as_deref(), Some("Rezension des Buches Soziale Arbeit heute"));
        assert_eq!(review.title.as_deref(), Some("Soziale Arbeit heute"));
        assert_eq!(review.publisher.as_deref(), Some("Votum Verlag"));
        assert_eq!(review.published_year, Some(2000));
        assert_eq!(review.pages, Some(424));
        assert_eq!(review.price, Some(24.9));
        assert_eq!(review.date, NaiveDate::from_ymd_opt(2010, 3, 5));
        assert_eq!(review.date_access, NaiveDate::from_ymd_opt(2010, 3, 7));
        assert_eq!(review.reviewer_name.as_deref(), Some("Prof. Dr. Jane Doe"));
        assert_eq!(review.reviewer_gender, Some(Gender::Female));
        assert_eq!(review.reviewer_highest_title, Some(AcademicTitle::Prof));
        assert_eq!(review.reviewer_location, vec!["Köln"]);
        assert_eq!(review.reviewer_id, Some(4711));
        assert_eq!(review.category.as_deref(), Some("Jugendhilfe"));
        assert_eq!(review.headings, vec!["Thema", "Fazit"]);
        assert_eq!(
            review.text.as_deref(),
            Some("Das Buch gibt einen Überblick über die Soziale Arbeit. Es richtet sich an Studierende.")
        );
        assert_eq!(review.word_count, Some(14));
        // the DNB link overrides the ISBN from the heading
        assert_eq!(review.isbn.as_deref(), Some("9783123456789"));
        assert_eq!(
            review.links,
            vec![
                "http://portal.d-nb.de/opac.htm?query=9783123456789&method=simpleSearch",
                "https://shop.example/buch",
            ]
        );
    }

    #[test]
    fn not_found_runs_no_extractor() {
        let mut memo = GenderMemo::new();
        let outcome = process_document(7, fixtures::NOT_FOUND_PAGE, &config(), &mut memo);
        assert_eq!(outcome, Outcome::NotFound { id: 7 });
        assert!(outcome.review().is_none());
    }

    #[test]
    fn hard_failure_keeps_partial_fields() {
        let mut memo = GenderMemo::new();
        let spec = PageSpec {
            reviewer_id: None,
            ..PageSpec::default()
        };
        let Outcome::ParseFailed { review, reason } = process(&spec, &mut memo) else {
            panic!("expected parse failure");
        };
        assert!(!review.parsed_success);
        assert_eq!(reason, ExtractError::MissingReviewerId.to_string());
        // everything before the reviewer id ran
        assert!(review.text.is_some());
        assert!(!review.links.is_empty());
        // everything after it did not
        assert_eq!(review.category, None);
        assert!(review.reviewer_location.is_empty());
    }

    #[test]
    fn missing_heading_separator_aborts_early() {
        let mut memo = GenderMemo::new();
        let spec = PageSpec {
            heading: "Ohne Trenner".into(),
            ..PageSpec::default()
        };
        let Outcome::ParseFailed { review, .. } = process(&spec, &mut memo) else {
            panic!("expected parse failure");
        };
        assert_eq!(review.date, None);
        assert_eq!(review.reviewer_name, None);
        assert!(memo.is_empty());
    }

    #[test]
    fn empty_body_fails() {
        let mut memo = GenderMemo::new();
        let spec = PageSpec {
            body: Vec::new(),
            ..PageSpec::default()
        };
        assert!(matches!(
            process(&spec, &mut memo),
            Outcome::ParseFailed { reason, .. } if reason == ExtractError::EmptyText.to_string()
        ));
    }

    #[test]
    fn unclassified_error_is_parse_failure() {
        let mut memo = GenderMemo::new();
        let spec = PageSpec {
            reviewer_id: Some("abc".into()),
            ..PageSpec::default()
        };
        assert!(matches!(process(&spec, &mut memo), Outcome::ParseFailed { .. }));
    }

    #[test]
    fn missing_content_box() {
        let mut memo = GenderMemo::new();
        let html = r#"<html><head><meta name="keywords" content="a"><meta name="description" content="d"></head><body></body></html>"#;
        assert!(matches!(
            process_document(1, html, &config(), &mut memo),
            Outcome::ParseFailed { reason, .. } if reason == ExtractError::MissingContentBox.to_string()
        ));
    }

    #[test]
    fn memo_carries_across_documents() {
        let mut memo = GenderMemo::new();
        process(&PageSpec::default().reviewer("Rezensentin", "Jane Doe"), &mut memo);
        let Outcome::Success(review) =
            process(&PageSpec::default().reviewer("Rezension von", "Jane Doe"), &mut memo)
        else {
            panic!("expected success");
        };
        assert_eq!(review.reviewer_gender, Some(Gender::Female));
    }

    #[test]
    fn unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut memo = GenderMemo::new();
        let outcome = process_file(3, &dir.path().join("3.html"), &config(), &mut memo);
        assert!(matches!(outcome, Outcome::ParseFailed { review, .. } if review.id == 3));
    }
}
