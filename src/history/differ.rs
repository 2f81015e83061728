use serde::Serialize;

use crate::history::section::SectionSet;

/// Structural change between an older and a newer snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub enhanced: Vec<String>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.enhanced.is_empty()
    }
}

/// Character count with every whitespace run collapsed to one space.
fn normalized_len(body: &str) -> usize {
    let mut count = 0usize;
    for (i, word) in body.split_whitespace().enumerate() {
        if i > 0 {
            count += 1;
        }
        count += word.chars().count();
    }
    count
}

/// Classifies sections as added, removed, or enhanced.
///
/// "Enhanced" is a growth signal only: a section counts when its normalized
/// body got strictly longer. Same-length rewrites and shrinking sections are
/// reported nowhere.
pub fn diff(older: &SectionSet, newer: &SectionSet) -> Delta {
    let mut delta = Delta::default();

    for section in newer {
        match older.get(&section.name) {
            None => delta.added.push(section.name.clone()),
            Some(prev) => {
                if normalized_len(&section.body) > normalized_len(&prev.body) {
                    delta.enhanced.push(section.name.clone());
                }
            }
        }
    }

    delta.removed = older
        .names()
        .filter(|name| !newer.contains(name))
        .map(ToOwned::to_owned)
        .collect();

    delta
}
