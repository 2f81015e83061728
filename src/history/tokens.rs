use serde::Serialize;

pub const LOG_SEPARATOR: &str = "---\n\n";

/// Heuristic token counts for a document. None of these match a real
/// tokenizer; they bracket the likely range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenEstimate {
    pub word_based: usize,
    pub character_based: usize,
    pub subword_based: usize,
    pub average: usize,
    pub word_count: usize,
    pub character_count: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '\''
}

/// Runs of word characters count once, every other non-space character
/// counts once per UTF-16 unit.
fn count_subwords(text: &str) -> usize {
    let mut count = 0usize;
    let mut in_word = false;
    for ch in text.chars() {
        if is_word_char(ch) {
            if !in_word {
                count += 1;
                in_word = true;
            }
        } else {
            in_word = false;
            if !ch.is_whitespace() {
                count += ch.len_utf16();
            }
        }
    }
    count
}

pub fn estimate_tokens(text: &str) -> TokenEstimate {
    let words: Vec<&str> = text.split_whitespace().collect();
    let normalized = words.join(" ");

    let word_count = words.len();
    // UTF-16 units, so characters outside the BMP count twice.
    let character_count = normalized.encode_utf16().count();
    let subwords = count_subwords(&normalized);

    // ~1.3 tokens per word, ~4 characters per token, ~1.1 tokens per subword.
    let word_based = (word_count * 13).div_ceil(10);
    let character_based = character_count.div_ceil(4);
    let subword_based = (subwords * 11).div_ceil(10);
    let sum = word_based + character_based + subword_based;

    TokenEstimate {
        word_based,
        character_based,
        subword_based,
        // sum / 3 never ends in .5, so this is plain rounding.
        average: (sum + 1) / 3,
        word_count,
        character_count,
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn log_header(file_label: &str) -> String {
    format!(
        "# Token Estimation Log\n\nThis file tracks token estimates for {file_label} over time.\n\n{LOG_SEPARATOR}"
    )
}

pub fn render_token_entry(estimate: &TokenEstimate, file_label: &str, timestamp: &str) -> String {
    let mut out = format!("## Token Estimation - {timestamp}\n\n");
    out.push_str(&format!("**File:** {file_label}\n"));
    out.push_str(&format!(
        "**Word Count:** {}\n",
        group_thousands(estimate.word_count)
    ));
    out.push_str(&format!(
        "**Character Count:** {}\n\n",
        group_thousands(estimate.character_count)
    ));
    out.push_str("**Token Estimates:**\n");
    out.push_str(&format!(
        "- Word-based: ~{} tokens\n",
        group_thousands(estimate.word_based)
    ));
    out.push_str(&format!(
        "- Character-based: ~{} tokens\n",
        group_thousands(estimate.character_based)
    ));
    out.push_str(&format!(
        "- Subword-based: ~{} tokens\n",
        group_thousands(estimate.subword_based)
    ));
    out.push_str(&format!(
        "- **Average Estimate: ~{} tokens**\n\n",
        group_thousands(estimate.average)
    ));
    out.push_str(LOG_SEPARATOR);
    out
}

/// Inserts `entry` right after the first separator so the newest entry comes
/// first. A log without a separator gets one appended.
pub fn prepend_token_entry(existing: Option<&str>, entry: &str, file_label: &str) -> String {
    let base = match existing {
        Some(text) => text.to_string(),
        None => log_header(file_label),
    };
    if base.contains(LOG_SEPARATOR) {
        base.replacen(LOG_SEPARATOR, &format!("{LOG_SEPARATOR}{entry}"), 1)
    } else {
        let mut out = base.trim_end().to_string();
        out.push_str("\n\n");
        out.push_str(LOG_SEPARATOR);
        out.push_str(entry);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_follow_the_three_heuristics() {
        // Normalizes to "Hello, world! It's fine." (24 chars).
        let est = estimate_tokens("Hello,  world!\n It's   fine.");
        assert_eq!(est.word_count, 4);
        assert_eq!(est.character_count, 24);
        // Hello , world ! It's fine . -> 7 subwords.
        assert_eq!(est.subword_based, 8);
        assert_eq!(est.word_based, 6);
        assert_eq!(est.character_based, 6);
        assert_eq!(est.average, 7);
    }

    #[test]
    fn empty_text_estimates_zero() {
        let est = estimate_tokens("   \n\t");
        assert_eq!(est.word_count, 0);
        assert_eq!(est.character_count, 0);
        assert_eq!(est.average, 0);
    }

    #[test]
    fn subwords_split_punctuation_and_keep_apostrophes() {
        assert_eq!(count_subwords("don't stop"), 2);
        assert_eq!(count_subwords("a.b-c"), 5);
        assert_eq!(count_subwords("snake_case"), 1);
        assert_eq!(count_subwords("## Heading"), 3);
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let est = estimate_tokens("rocket \u{1f680}");
        assert_eq!(est.character_count, 9);
        assert_eq!(count_subwords("rocket \u{1f680}"), 3);
        assert_eq!(estimate_tokens("caf\u{e9}").character_count, 4);
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn new_entries_land_first_after_the_header() {
        let est = estimate_tokens("one two three");
        let first = render_token_entry(&est, "latest.md", "2025-08-03 10:00:00 UTC");
        let log = prepend_token_entry(None, &first, "latest.md");
        assert!(log.starts_with("# Token Estimation Log\n"));
        assert!(log.contains("## Token Estimation - 2025-08-03 10:00:00 UTC"));

        let second = render_token_entry(&est, "latest.md", "2025-08-04 10:00:00 UTC");
        let log = prepend_token_entry(Some(&log), &second, "latest.md");
        let newer = log.find("2025-08-04").unwrap();
        let older = log.find("2025-08-03").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn log_without_separator_gets_one() {
        let log = prepend_token_entry(Some("# Custom log\n"), "ENTRY\n", "latest.md");
        assert_eq!(log, "# Custom log\n\n---\n\nENTRY\n");
    }
}
