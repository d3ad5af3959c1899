use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::{debug, info};

use crate::document::{create_selector, hrefs};
use crate::record::Review;
use crate::{ExtractError, Result, CATEGORY_LINK_PATH, DNB_LINK_PREFIX, REVIEWER_LINK_PREFIX};

static HTTP_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="http://"]"#).unwrap());
static HTTPS_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="https://"]"#).unwrap());

/// Outbound links of the main content box. The DNB catalogue link also carries the ISBN.
/// Links containing an entry of `ignore` are dropped.
pub fn extract_links(content: ElementRef<'_>, review: &mut Review, ignore: &[String]) -> Result<()> {
    let mut links = hrefs(content, &HTTP_LINK);
    links.extend(hrefs(content, &HTTPS_LINK));

    if let Some(dnb) = links.iter().find(|l| l.starts_with(DNB_LINK_PREFIX)) {
        debug!("DNB-Link: {dnb}");
        let isbn = dnb[DNB_LINK_PREFIX.len()..].split('&').next().unwrap_or_default();
        review.isbn = Some(isbn.to_string());
        review.dnb_link = Some(dnb.clone());
    }

    links.retain(|link| !ignore.iter().any(|i| link.contains(i.as_str())));
    debug!(links = ?links, "Links");
    review.links = links;
    Ok(())
}

/// Numeric id from the first link to the reviewer's review list.
pub fn extract_reviewer_id(content: ElementRef<'_>, review: &mut Review) -> Result<()> {
    let selector = create_selector(&format!(r#"a[href^="{REVIEWER_LINK_PREFIX}"]"#))?;
    let href = hrefs(content, &selector)
        .into_iter()
        .next()
        .ok_or(ExtractError::MissingReviewerId)?;
    let reviewer_id = href
        .split('=')
        .nth(1)
        .ok_or(ExtractError::MissingReviewerId)?
        .parse::<u64>()?;
    info!("Reviewer-ID: {reviewer_id}");
    review.reviewer_id = Some(reviewer_id);
    Ok(())
}

/// Best effort: the job market link in the category box names the category. Leaves the
/// field empty when there is none.
pub fn extract_category(category_box: Option<ElementRef<'_>>, review: &mut Review) {
    let category = category_box
        .into_iter()
        .flat_map(|b| hrefs(b, &HTTPS_LINK))
        .find(|l| l.contains(CATEGORY_LINK_PATH))
        .and_then(|l| l.split('=').nth(1).map(String::from));

    match &category {
        Some(c) => info!("Category: {c}"),
        None => debug!(id = review.id, "No category"),
    }
    review.category = category;
}
