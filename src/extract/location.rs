use tracing::debug;

use crate::record::Review;

/// Best effort guess of the reviewer's home cities from the free text description.
pub fn guess_cities(review: &mut Review, cities: &[String]) {
    review.reviewer_location = match review.reviewer_description.as_deref() {
        Some(description) => cities
            .iter()
            .filter(|city| mentions_city(description, city))
            .inspect(|city| debug!("Found City: {city}"))
            .cloned()
            .collect(),
        None => Vec::new(),
    };
}

/// The city has to stand as a word of its own, e.g. "Hochschule Köln, Fakultät" or
/// "Berlin/Potsdam", so that "Essen" does not match "Essener".
fn mentions_city(description: &str, city: &str) -> bool {
    [" ", ".", ",", ";", "/"]
        .iter()
        .any(|end| description.contains(&format!(" {city}{end}")))
        || description.contains(&format!("/{city}"))
        || description.ends_with(&format!(" {city}"))
}
