//! Thin typed layer over the parsed HTML tree. Extractors only query pages through these
//! functions: find the first/all elements matching a selector, read attributes, walk text nodes.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static CONTENT_BOX: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[class="contentbox"]"#).unwrap());

/// A parsed review page.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Cleaned text of `<title>`, if the page has one.
    pub fn title(&self) -> Option<String> {
        self.html.select(&TITLE).next().map(text_of)
    }

    /// `content` attribute of `<meta name="{name}">`.
    pub fn meta_content(&self, name: &str) -> Result<Option<String>> {
        let selector = create_selector(&format!(r#"meta[name="{name}"]"#))?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(String::from))
    }

    /// All `<div class="contentbox">` in document order. The first one holds the article.
    pub fn content_boxes(&self) -> Vec<ElementRef<'_>> {
        self.html.select(&CONTENT_BOX).collect()
    }
}

#[inline]
pub fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

pub fn find_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

pub fn find_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// Every descendant text node, trimmed, skipping the empty ones.
pub fn stripped_strings<'a>(scope: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    scope.text().map(str::trim).filter(|s| !s.is_empty())
}

/// Whole text content of an element, cleaned.
pub fn text_of(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// `href` values of the anchors matched by `selector`, in document order.
pub fn hrefs(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope
        .select(selector)
        .filter_map(|a| a.value().attr("href"))
        .map(String::from)
        .collect()
}

/// Drops newlines and tabs, collapses whitespace runs to a single space.
pub fn clean_text(text: &str) -> String {
    text.replace(['\n', '\t'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
