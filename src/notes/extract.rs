//! Recovers the labelled sections from the full text of a generation.
//!
//! Section boundaries can only be decided once a later label (or the end of
//! the text) has been seen, so extraction runs once over the complete buffer
//! rather than per token.
//!
//! The scan is a single forward pass. Each label occurrence opens its
//! section the first time that label is seen, and closes every open section
//! of lower canonical rank. Whatever is still open at the end of the text
//! runs to the end. This reproduces "a section ends at the first later
//! occurrence of any label that follows it in canonical order": repeated
//! labels are absorbed into the body of the section they appear in, and a
//! label seen out of order does not close sections ranked above it.

use super::ExtractedNotes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Developer,
    Marketing,
    Contributors,
    RelatedIssues,
}

impl Section {
    /// Canonical order used to resolve section boundaries.
    pub const CANONICAL: [Section; 4] = [
        Section::Developer,
        Section::Marketing,
        Section::Contributors,
        Section::RelatedIssues,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Developer => "DEVELOPER_NOTES:",
            Section::Marketing => "MARKETING_NOTES:",
            Section::Contributors => "CONTRIBUTORS:",
            Section::RelatedIssues => "RELATED_ISSUES:",
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            Section::Developer => "No developer notes generated",
            Section::Marketing => "No marketing notes generated",
            Section::Contributors => "No contributors identified",
            Section::RelatedIssues => "No related issues identified",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Section::Developer => "Developer Notes:",
            Section::Marketing => "Marketing Notes:",
            Section::Contributors => "Contributors:",
            Section::RelatedIssues => "Related Issues:",
        }
    }

    fn rank(self) -> usize {
        self as usize
    }

    /// Label starting at the beginning of `bytes`, compared ASCII
    /// case-insensitively.
    fn at(bytes: &[u8]) -> Option<Section> {
        Section::CANONICAL.into_iter().find(|section| {
            let label = section.label().as_bytes();
            bytes.len() >= label.len() && bytes[..label.len()].eq_ignore_ascii_case(label)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unseen,
    Open(usize),
    Closed(usize, usize),
}

/// Partitions `text` into [`ExtractedNotes`]. Pure: identical input always
/// yields identical output.
pub fn extract(text: &str) -> ExtractedNotes {
    let bytes = text.as_bytes();
    let mut slots = [Slot::Unseen; 4];

    let mut pos = 0;
    while pos < bytes.len() {
        // Labels are ASCII, so a match can only start on a char boundary.
        let Some(section) = Section::at(&bytes[pos..]) else {
            pos += 1;
            continue;
        };
        let rank = section.rank();
        for slot in slots.iter_mut().take(rank) {
            if let Slot::Open(start) = *slot {
                *slot = Slot::Closed(start, pos);
            }
        }
        pos += section.label().len();
        if slots[rank] == Slot::Unseen {
            slots[rank] = Slot::Open(pos);
        }
    }

    let body = |slot: Slot| match slot {
        Slot::Unseen => "",
        Slot::Open(start) => text[start..].trim(),
        Slot::Closed(start, end) => text[start..end].trim(),
    };

    ExtractedNotes {
        developer: body(slots[0]).to_string(),
        marketing: body(slots[1]).to_string(),
        contributors: body(slots[2]).to_string(),
        related_issues: body(slots[3]).to_string(),
    }
    .with_fallbacks()
}
