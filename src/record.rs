use chrono::NaiveDate;

use crate::gender::{Gender, Salutation};
use crate::title::AcademicTitle;

/// One review page turned into a structured record.
///
/// Not-found pages never get a `Review` (see [`Outcome::NotFound`]). `parsed_success` only turns
/// false on the partial review a `ParseFailed` outcome carries, so it is not exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: u64,
    pub parsed_success: bool,
    pub date_access: Option<NaiveDate>,

    // book
    pub title: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub price_unit: Option<String>,
    pub pages: Option<u32>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_location: Option<String>,
    pub published_year: Option<i32>,

    // content
    pub description: Option<String>,
    pub text: Option<String>,
    pub headings: Vec<String>,
    pub keywords: Vec<String>,
    pub word_count: Option<usize>,
    pub links: Vec<String>,
    pub dnb_link: Option<String>,

    // reviewer
    pub reviewer_name: Option<String>,
    pub reviewer_gender: Option<Gender>,
    pub reviewer_title: Vec<AcademicTitle>,
    pub reviewer_highest_title: Option<AcademicTitle>,
    pub reviewer_description: Option<String>,
    pub reviewer_location: Vec<String>,
    pub reviewer_id: Option<u64>,

    /// Marker the reviewer block started with; drives the global gender pass.
    pub salutation: Option<Salutation>,
}

impl Review {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            parsed_success: true,
            date_access: None,
            title: None,
            category: None,
            date: None,
            price: None,
            price_unit: None,
            pages: None,
            isbn: None,
            publisher: None,
            published_location: None,
            published_year: None,
            description: None,
            text: None,
            headings: Vec::new(),
            keywords: Vec::new(),
            word_count: None,
            links: Vec::new(),
            dnb_link: None,
            reviewer_name: None,
            reviewer_gender: None,
            reviewer_title: Vec::new(),
            reviewer_highest_title: None,
            reviewer_description: None,
            reviewer_location: Vec::new(),
            reviewer_id: None,
            salutation: None,
        }
    }
}

/// Terminal state of one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Review),
    /// The page exists but its article was removed. No extractor ran.
    NotFound { id: u64 },
    /// Extraction aborted; `review` holds whatever was extracted before the failure.
    ParseFailed { review: Review, reason: String },
}

impl Outcome {
    pub fn id(&self) -> u64 {
        match self {
            Outcome::Success(review) | Outcome::ParseFailed { review, .. } => review.id,
            Outcome::NotFound { id } => *id,
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            Outcome::Success(review) | Outcome::ParseFailed { review, .. } => Some(review),
            Outcome::NotFound { .. } => None,
        }
    }

    pub fn review_mut(&mut self) -> Option<&mut Review> {
        match self {
            Outcome::Success(review) | Outcome::ParseFailed { review, .. } => Some(review),
            Outcome::NotFound { .. } => None,
        }
    }
}
