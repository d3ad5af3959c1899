use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use crate::document::{clean_text, find_first, stripped_strings};
use crate::record::Review;
use crate::{ExtractError, Result};

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
/// e.g. "Votum Verlag (Münster) 2000"
static PUBLISHER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\s+\((.+)\)\s+(\d+)").unwrap());
/// e.g. "424 Seiten"
static PAGES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+) Seiten").unwrap());

/// Only the first strings of the heading paragraph belong to the book reference.
const HEADING_STRINGS: usize = 3;

/// Classification of one `.`-separated piece of the article heading.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Isbn(Option<String>),
    Price { amount: Option<f64>, currency: Option<String> },
    Publisher { publisher: String, location: String, year: Option<i32> },
    Pages(Option<u32>),
    Title(String),
}

/// Reads the book reference from the first paragraph of the main content box:
/// `Author: Title. Publisher (Location) Year. 424 Seiten. ISBN 978-... 24,90 EUR.`
pub fn extract_heading(content: ElementRef<'_>, review: &mut Review) -> Result<()> {
    let heading = find_first(content, &PARAGRAPH)
        .map(|p| {
            stripped_strings(p)
                .take(HEADING_STRINGS)
                .map(clean_text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let Some((_, reference)) = heading.split_once(':') else {
        return Err(ExtractError::MalformedHeading(heading).into());
    };
    debug!("Header: {reference}");

    let mut title_segments = Vec::new();
    for segment in classify_reference(reference) {
        match segment {
            Segment::Isbn(Some(isbn)) => {
                debug!("ISBN: '{isbn}'");
                review.isbn = Some(isbn);
            }
            Segment::Isbn(None) => warn!(id = review.id, "ISBN extraction failed"),
            Segment::Price { amount: Some(amount), currency } => {
                review.price = Some(amount);
                review.price_unit = currency;
            }
            // The amount has to lead the segment, e.g. "24,90 EUR".
            Segment::Price { amount: None, .. } => {
                return Err(ExtractError::MalformedPrice(reference.trim().to_string()).into());
            }
            Segment::Publisher { publisher, location, year } => {
                debug!("Publisher: '{publisher}', Location: '{location}', Year: {year:?}");
                review.publisher = Some(publisher);
                review.published_location = Some(location);
                review.published_year = year;
            }
            Segment::Pages(pages) => review.pages = pages,
            Segment::Title(fragment) => title_segments.push(fragment),
        }
    }

    if !title_segments.is_empty() {
        let title = title_segments.join(". ");
        debug!("Title: '{title}'");
        review.title = Some(title);
    }

    if review.pages.is_none() {
        warn!(id = review.id, "No Page Segment found");
    }
    if review.published_year.is_none() {
        warn!(id = review.id, "No Publisher Segment found");
    }
    Ok(())
}

/// Splits the reference on `.` and classifies each non-empty piece, in order.
pub fn classify_reference(reference: &str) -> Vec<Segment> {
    reference
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(classify_segment)
        .collect()
}

pub fn classify_segment(segment: &str) -> Segment {
    if segment.contains("ISBN") {
        return Segment::Isbn(segment.split_whitespace().nth(1).map(String::from));
    }

    if segment.contains("EUR") || segment.contains("sFr") {
        let amount = segment
            .split_whitespace()
            .next()
            .and_then(|p| p.replace(',', ".").parse::<f64>().ok());
        let currency = segment
            .split_whitespace()
            .find(|t| t.contains("EUR") || t.contains("sFr"))
            .map(|c| c.trim_matches(['.', ' ']).to_string());
        return Segment::Price { amount, currency };
    }

    if let Some(caps) = PUBLISHER_RE.captures(segment) {
        return Segment::Publisher {
            publisher: caps[1].to_string(),
            location: caps[2].to_string(),
            year: caps[3].parse().ok(),
        };
    }

    if let Some(caps) = PAGES_RE.captures(segment) {
        return Segment::Pages(caps[1].parse().ok());
    }

    Segment::Title(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;
    use crate::Error;

    const REFERENCE: &str =
        " Soziale Arbeit heute. Votum Verlag (Münster) 2000. 424 Seiten. ISBN 978-3-12345-678-9. 24,90 EUR.";

    #[test]
    fn segments_in_order() {
        let segments = classify_reference(REFERENCE);
        assert_eq!(
            segments,
            vec![
                Segment::Title("Soziale Arbeit heute".into()),
                Segment::Publisher {
                    publisher: "Votum Verlag".into(),
                    location: "Münster".into(),
                    year: Some(2000),
                },
                Segment::Pages(Some(424)),
                Segment::Isbn(Some("978-3-12345-678-9".into())),
                Segment::Price { amount: Some(24.9), currency: Some("EUR".into()) },
            ]
        );
    }

    #[test]
    fn reparse_is_identical() {
        assert_eq!(classify_reference(REFERENCE), classify_reference(REFERENCE));
    }

    #[test]
    fn swiss_price_and_bare_isbn() {
        assert_eq!(
            classify_segment("39 sFr"),
            Segment::Price { amount: Some(39.0), currency: Some("sFr".into()) }
        );
        assert_eq!(classify_segment("ISBN"), Segment::Isbn(None));
    }

    #[test]
    fn currency_first_price_keeps_currency() {
        assert_eq!(
            classify_segment("EUR 24,90"),
            Segment::Price { amount: None, currency: Some("EUR".into()) }
        );
    }

    #[test]
    fn unparsable_price_fails() {
        let page = Page::parse(
            r#"<div class="contentbox"><p>Autor: Ein Titel. 424 Seiten. EUR 24,90.</p></div>"#,
        );
        let mut review = Review::new(7);
        assert!(matches!(
            extract_heading(page.content_boxes()[0], &mut review),
            Err(Error::Extract(ExtractError::MalformedPrice(_)))
        ));
        assert_eq!(review.price, None);
        assert_eq!(review.price_unit, None);
    }

    #[test]
    fn multi_word_location() {
        assert_eq!(
            classify_segment("Fachhochschulverlag (Frankfurt am Main) 1999"),
            Segment::Publisher {
                publisher: "Fachhochschulverlag".into(),
                location: "Frankfurt am Main".into(),
                year: Some(1999),
            }
        );
    }

    #[test]
    fn heading_fills_review() {
        let page = Page::parse(
            r#"<div class="contentbox"><p><strong>Hans Meier:</strong> Soziale Arbeit heute. Ein Handbuch. Votum Verlag (Münster) 2000. 424 Seiten. 24,90 EUR.</p></div>"#,
        );
        let content = page.content_boxes()[0];
        let mut review = Review::new(7);
        extract_heading(content, &mut review).unwrap();
        assert_eq!(review.title.as_deref(), Some("Soziale Arbeit heute. Ein Handbuch"));
        assert_eq!(review.publisher.as_deref(), Some("Votum Verlag"));
        assert_eq!(review.published_location.as_deref(), Some("Münster"));
        assert_eq!(review.published_year, Some(2000));
        assert_eq!(review.pages, Some(424));
        assert_eq!(review.price, Some(24.9));
        assert_eq!(review.price_unit.as_deref(), Some("EUR"));
        assert_eq!(review.isbn, None);
    }

    #[test]
    fn missing_pages_is_soft() {
        let page = Page::parse(r#"<div class="contentbox"><p>Autor: Nur ein Titel.</p></div>"#);
        let mut review = Review::new(7);
        extract_heading(page.content_boxes()[0], &mut review).unwrap();
        assert_eq!(review.title.as_deref(), Some("Nur ein Titel"));
        assert_eq!(review.pages, None);
        assert_eq!(review.published_year, None);
    }

    #[test]
    fn heading_without_colon_fails() {
        let page = Page::parse(r#"<div class="contentbox"><p>Kein Doppelpunkt hier</p></div>"#);
        let mut review = Review::new(7);
        assert!(matches!(
            extract_heading(page.content_boxes()[0], &mut review),
            Err(Error::Extract(ExtractError::MalformedHeading(h))) if h == "Kein Doppelpunkt hier"
        ));
    }
}
