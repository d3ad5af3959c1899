use std::collections::HashMap;

use tracing::debug;

use crate::record::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// The marker that introduced the reviewer block of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Salutation {
    /// "Rezensentin"
    Female,
    /// "Rezensent"
    Male,
    /// "Rezension von", says nothing about gender.
    Neutral,
}

impl Salutation {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "Rezensentin" => Some(Salutation::Female),
            "Rezensent" => Some(Salutation::Male),
            "Rezension von" => Some(Salutation::Neutral),
            _ => None,
        }
    }

    pub fn gender(self) -> Option<Gender> {
        match self {
            Salutation::Female => Some(Gender::Female),
            Salutation::Male => Some(Gender::Male),
            Salutation::Neutral => None,
        }
    }
}

/// Reviewer display name -> last observed gender.
///
/// Equal names are assumed to belong to the same person; this is not an identity join.
#[derive(Debug, Default, Clone)]
pub struct GenderMemo {
    genders: HashMap<String, Gender>,
}

impl GenderMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, name: &str, gender: Gender) {
        self.genders.insert(name.to_string(), gender);
    }

    pub fn get(&self, name: &str) -> Option<Gender> {
        self.genders.get(name).copied()
    }

    /// Records the gender a salutation implies, or looks the name up when it implies none.
    pub fn resolve(&mut self, name: &str, salutation: Salutation) -> Gender {
        match salutation.gender() {
            Some(gender) => {
                self.observe(name, gender);
                gender
            }
            None => self.get(name).unwrap_or(Gender::Other),
        }
    }

    pub fn len(&self) -> usize {
        self.genders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genders.is_empty()
    }

    /// Builds a memo from every unambiguous salutation in `outcomes`, visited in the given order.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        let mut memo = Self::new();
        for review in outcomes.into_iter().filter_map(Outcome::review) {
            if let (Some(name), Some(gender)) = (
                review.reviewer_name.as_deref(),
                review.salutation.and_then(Salutation::gender),
            ) {
                memo.observe(name, gender);
            }
        }
        memo
    }
}

/// Re-resolves every neutral salutation against `memo`. `outcomes` may be in any order.
pub fn resolve_neutral(outcomes: &mut [Outcome], memo: &GenderMemo) -> usize {
    let mut changed = 0;
    for review in outcomes.iter_mut().filter_map(Outcome::review_mut) {
        if review.salutation != Some(Salutation::Neutral) {
            continue;
        }
        let Some(gender) = review.reviewer_name.as_deref().and_then(|n| memo.get(n)) else {
            continue;
        };
        if review.reviewer_gender != Some(gender) {
            debug!(id = review.id, ?gender, "Resolved reviewer gender from global memo");
            review.reviewer_gender = Some(gender);
            changed += 1;
        }
    }
    changed
}
