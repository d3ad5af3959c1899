use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

/// Academic title of a reviewer. Variants are declared lowest rank first so the derived
/// ordering is the rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AcademicTitle {
    None = 0,
    Unknown = 1,
    Bachelor = 2,
    Master = 3,
    Diploma = 4,
    Magister = 5,
    Phd = 6,
    Prof = 7,
}

impl AcademicTitle {
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Highest rank among `titles`, `None` for an empty slice.
    pub fn highest(titles: &[AcademicTitle]) -> AcademicTitle {
        titles.iter().copied().max().unwrap_or(AcademicTitle::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AcademicTitle::None => "none",
            AcademicTitle::Unknown => "unknown",
            AcademicTitle::Bachelor => "bachelor",
            AcademicTitle::Master => "master",
            AcademicTitle::Diploma => "diploma",
            AcademicTitle::Magister => "magister",
            AcademicTitle::Phd => "phd",
            AcademicTitle::Prof => "prof",
        }
    }
}

impl fmt::Display for AcademicTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AcademicTitle::Prof => "Professor",
            AcademicTitle::Phd => "Doktor",
            AcademicTitle::Magister => "Magister",
            AcademicTitle::Diploma => "Diplom",
            AcademicTitle::Master => "Master",
            AcademicTitle::Bachelor => "Bachelor",
            AcademicTitle::Unknown => "Unbekannt",
            AcademicTitle::None => "No-Title",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleClassification {
    pub titles: Vec<AcademicTitle>,
    pub highest: AcademicTitle,
}

/// Classifies the whitespace tokens of a reviewer name, e.g. `["Prof.", "Dr.", "Jane", "Doe"]`.
///
/// Tokens are scanned for title markers in order. When nothing matches, any token found in
/// `known_titles` yields a single `Unknown` tag no matter how many tokens match. An empty
/// result falls back to `[None]`.
pub fn classify<S: AsRef<str>>(tokens: &[S], known_titles: &[String]) -> TitleClassification {
    let mut titles = Vec::new();

    for token in tokens.iter().map(AsRef::as_ref) {
        titles.extend(markers(token));
    }

    if titles.is_empty() {
        if let Some(token) = tokens
            .iter()
            .map(AsRef::as_ref)
            .find(|t| known_titles.iter().any(|k| k == t))
        {
            warn!("Unhandled Title: {token}");
            titles.push(AcademicTitle::Unknown);
        }
    }

    if titles.is_empty() {
        titles.push(AcademicTitle::None);
    }

    let highest = AcademicTitle::highest(&titles);
    info!(?titles, %highest, "Reviewer Title");
    TitleClassification { titles, highest }
}

/// One token can carry several markers (e.g. "Dipl.-Prof.").
fn markers(token: &str) -> Vec<AcademicTitle> {
    let mut found = Vec::new();
    if token.contains("Dr.") || token == "Dr" {
        found.push(AcademicTitle::Phd);
    }
    if token.contains("Prof") {
        found.push(AcademicTitle::Prof);
    }
    if token.contains("MSc") || token == "M" || token.contains("M.Sc.") {
        found.push(AcademicTitle::Master);
    }
    if token == "BSc" {
        found.push(AcademicTitle::Bachelor);
    }
    if token == "Mag." {
        found.push(AcademicTitle::Magister);
    }
    if token.contains("Dipl.") || token.contains("Diplom") || token.contains("Dipl-") {
        found.push(AcademicTitle::Diploma);
    }
    found
}
