use std::collections::HashMap;

use serde::Serialize;

const TITLE_PREFIX: &str = "# ";
const SECTION_PREFIX: &str = "## ";
const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub body: String,
}

/// Sections of one document in order of first appearance.
///
/// A repeated heading keeps the position of its first appearance and the body
/// of its last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSet {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl SectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, body: String) {
        match self.index.get(&name) {
            Some(&slot) => self.sections[slot].body = body,
            None => {
                self.index.insert(name.clone(), self.sections.len());
                self.sections.push(Section { name, body });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&slot| &self.sections[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionSet {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix(SECTION_PREFIX).map(str::trim)
}

fn join_body(body: &[&str]) -> String {
    let start = body.iter().position(|l| !l.trim().is_empty());
    let end = body.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => body[start..=end].join("\n"),
        _ => String::new(),
    }
}

pub fn extract_sections(text: &str) -> SectionSet {
    let mut set = SectionSet::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in lines(text) {
        if let Some(name) = section_name(line) {
            if let Some((prev, body)) = current.take() {
                set.insert(prev.to_string(), join_body(&body));
            }
            current = Some((name, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((prev, body)) = current {
        set.insert(prev.to_string(), join_body(&body));
    }

    set
}

/// Text of the first `# ` heading.
pub fn extract_title(text: &str) -> Option<String> {
    lines(text)
        .find_map(|line| line.strip_prefix(TITLE_PREFIX))
        .map(|title| title.trim().to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub lines: usize,
    pub words: usize,
    pub sections: usize,
}

impl DocumentStats {
    pub fn of(text: &str) -> Self {
        Self::with_sections(text, &extract_sections(text))
    }

    pub fn with_sections(text: &str, sections: &SectionSet) -> Self {
        Self {
            lines: text.split('\n').count(),
            words: text.split_whitespace().count(),
            sections: sections.len(),
        }
    }
}
