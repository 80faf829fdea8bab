pub mod cache;
pub mod extract;

use serde::{Deserialize, Serialize};

pub use cache::{KeyValueStore, LocalStore, MemoryStore, NotesCache};
pub use extract::{extract, Section};

/// The four sections recovered from one completed generation.
///
/// Every field is always populated: sections the model did not produce hold
/// the fallback text of their [`Section`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedNotes {
    pub developer: String,
    pub marketing: String,
    #[serde(default)]
    pub contributors: String,
    #[serde(default)]
    pub related_issues: String,
}

impl ExtractedNotes {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Developer => &self.developer,
            Section::Marketing => &self.marketing,
            Section::Contributors => &self.contributors,
            Section::RelatedIssues => &self.related_issues,
        }
    }

    fn slot(&mut self, section: Section) -> &mut String {
        match section {
            Section::Developer => &mut self.developer,
            Section::Marketing => &mut self.marketing,
            Section::Contributors => &mut self.contributors,
            Section::RelatedIssues => &mut self.related_issues,
        }
    }

    /// Replaces blank fields with their fallback text.
    pub fn with_fallbacks(mut self) -> Self {
        for section in Section::CANONICAL {
            let slot = self.slot(section);
            if slot.trim().is_empty() {
                *slot = section.fallback().to_string();
            }
        }
        self
    }

    /// True when the section holds generated text rather than its fallback.
    pub fn is_generated(&self, section: Section) -> bool {
        self.get(section) != section.fallback()
    }
}

impl Default for ExtractedNotes {
    fn default() -> Self {
        Self {
            developer: String::new(),
            marketing: String::new(),
            contributors: String::new(),
            related_issues: String::new(),
        }
        .with_fallbacks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let notes = ExtractedNotes {
            developer: "d".into(),
            marketing: "m".into(),
            contributors: "c".into(),
            related_issues: "#1".into(),
        };
        let json = serde_json::to_value(&notes).unwrap();
        assert_eq!(json["relatedIssues"], "#1");
        assert_eq!(json["developer"], "d");
    }

    #[test]
    fn default_is_all_fallbacks() {
        let notes = ExtractedNotes::default();
        for section in Section::CANONICAL {
            assert_eq!(notes.get(section), section.fallback());
            assert!(!notes.is_generated(section));
        }
    }
}
