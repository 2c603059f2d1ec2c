//! Input validation utilities.
//!
//! Everything here runs before a store is touched. A function either returns a
//! value that is safe to store or the error the operation should return.

use crate::error::{ClinicError, ClinicResult};
use crate::model::{MultiMediaContent, Patient};
use crate::store::EntityStore;

/// A string that is guaranteed to contain at least one non-whitespace character.
///
/// The input is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and rejects it if nothing is left.
    ///
    /// `field` names the argument in the error message.
    pub fn new(field: &str, input: impl AsRef<str>) -> ClinicResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            tracing::warn!(field, "rejected blank text field");
            return Err(ClinicError::invalid_input(format!(
                "{field} cannot be empty"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Shorthand for `NonEmptyText::new(field, input)?.into_string()`.
pub fn require_text(field: &str, input: impl AsRef<str>) -> ClinicResult<String> {
    NonEmptyText::new(field, input).map(NonEmptyText::into_string)
}

/// Drops blank URL fields and collapses content with no URL left to `None`.
///
/// URLs are otherwise stored as given; their format is not checked.
pub fn normalise_multimedia(content: Option<MultiMediaContent>) -> Option<MultiMediaContent> {
    fn keep(url: Option<String>) -> Option<String> {
        url.and_then(|u| {
            let trimmed = u.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
    }

    let content = content?;
    let content = MultiMediaContent {
        image_url: keep(content.image_url),
        audio_url: keep(content.audio_url),
        video_url: keep(content.video_url),
    };
    (!content.is_empty()).then_some(content)
}

/// Parses an identifier supplied as text, e.g. a URL path segment.
pub fn parse_id(field: &str, raw: &str) -> ClinicResult<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        ClinicError::invalid_input(format!(
            "{field} must be an unsigned 64-bit integer, got {raw:?}"
        ))
    })
}

/// Checks that `patient_id` resolves to a stored patient.
pub fn require_patient(patients: &EntityStore<Patient>, patient_id: u64) -> ClinicResult<()> {
    if patients.contains(patient_id) {
        Ok(())
    } else {
        tracing::warn!(patient_id, "referenced patient does not exist");
        Err(ClinicError::not_found(format!(
            "patient with id={patient_id} not found"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdAllocator;

    #[test]
    fn test_non_empty_text_trims() {
        let text = NonEmptyText::new("name", "  Alice \n").unwrap();
        assert_eq!(text.as_str(), "Alice");
    }

    #[test]
    fn test_blank_text_is_invalid_input() {
        for input in ["", "   ", "\t\n"] {
            let err = require_text("reason", input).unwrap_err();
            assert_eq!(err, ClinicError::invalid_input("reason cannot be empty"));
        }
    }

    #[test]
    fn test_multimedia_without_urls_is_absent() {
        assert_eq!(normalise_multimedia(None), None);
        assert_eq!(normalise_multimedia(Some(MultiMediaContent::default())), None);

        let blank = MultiMediaContent {
            image_url: Some("  ".into()),
            audio_url: Some(String::new()),
            video_url: None,
        };
        assert_eq!(normalise_multimedia(Some(blank)), None);
    }

    #[test]
    fn test_multimedia_keeps_set_urls_only() {
        let content = MultiMediaContent {
            image_url: Some("https://img.example/x.png".into()),
            audio_url: Some(" ".into()),
            video_url: None,
        };
        let normalised = normalise_multimedia(Some(content)).unwrap();
        assert_eq!(
            normalised.image_url.as_deref(),
            Some("https://img.example/x.png")
        );
        assert_eq!(normalised.audio_url, None);
    }

    #[test]
    fn test_parse_id_accepts_u64_range() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert_eq!(parse_id("id", "18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_parse_id_rejects_non_numeric_and_overflow() {
        for raw in ["abc", "-1", "18446744073709551616", ""] {
            assert!(matches!(
                parse_id("id", raw),
                Err(ClinicError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_require_patient() {
        let ids = IdAllocator::new();
        let mut patients = EntityStore::new();
        patients.insert(&ids, |id| Patient {
            id,
            name: "Alice".into(),
            contact_details: "555-0100".into(),
            medical_history: "none".into(),
        })
        .unwrap();

        assert!(require_patient(&patients, 1).is_ok());
        assert_eq!(
            require_patient(&patients, 42).unwrap_err(),
            ClinicError::not_found("patient with id=42 not found")
        );
    }
}
