//! Symptom gallery — the metadata backing the symptom picker, the
//! smart-entry path, and the body-location skip predicate.

use serde::{Deserialize, Serialize};

/// Metadata for one symptom the companion knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomInfo {
    /// Canonical id — the only key ever seeded into preset answers.
    pub id: &'static str,
    /// Display label for pickers and summaries.
    pub label: &'static str,
    /// Whether the anatomical-region step applies to this symptom.
    pub has_body_location: bool,
}

/// The fixed symptom gallery, in display order.
pub const GALLERY: &[SymptomInfo] = &[
    SymptomInfo {
        id: "headache",
        label: "Headache",
        has_body_location: true,
    },
    SymptomInfo {
        id: "back-pain",
        label: "Back pain",
        has_body_location: true,
    },
    SymptomInfo {
        id: "joint-pain",
        label: "Joint pain",
        has_body_location: true,
    },
    SymptomInfo {
        id: "stomach-ache",
        label: "Stomach ache",
        has_body_location: true,
    },
    SymptomInfo {
        id: "rash",
        label: "Rash",
        has_body_location: true,
    },
    SymptomInfo {
        id: "chest-pain",
        label: "Chest pain",
        has_body_location: true,
    },
    SymptomInfo {
        id: "nausea",
        label: "Nausea",
        has_body_location: false,
    },
    SymptomInfo {
        id: "fatigue",
        label: "Fatigue",
        has_body_location: false,
    },
    SymptomInfo {
        id: "dizziness",
        label: "Dizziness",
        has_body_location: false,
    },
    SymptomInfo {
        id: "fever",
        label: "Fever",
        has_body_location: false,
    },
    SymptomInfo {
        id: "shortness-of-breath",
        label: "Shortness of breath",
        has_body_location: false,
    },
];

/// Look up a symptom by canonical id.
pub fn find(id: &str) -> Option<&'static SymptomInfo> {
    GALLERY.iter().find(|s| s.id == id)
}

/// Whether the body-location step applies. Unknown ids keep the step — a
/// question too many beats a silently dropped one.
pub fn has_body_location(id: &str) -> bool {
    find(id).is_none_or(|s| s.has_body_location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_known_symptoms() {
        assert_eq!(find("headache").unwrap().label, "Headache");
        assert!(find("headache").unwrap().has_body_location);
        assert!(!find("nausea").unwrap().has_body_location);
        assert!(find("sneezing").is_none());
    }

    #[test]
    fn unknown_ids_keep_body_location_step() {
        assert!(has_body_location("sneezing"));
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in GALLERY.iter().enumerate() {
            for b in &GALLERY[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate symptom id {}", a.id);
            }
        }
    }
}
