//! Participant index: distinct authors of a transcript, with search filtering.
//!
//! Pure functions. Recomputed on demand; the transcript is static per loaded file.

use crate::domain::Transcript;
use std::collections::BTreeSet;

/// Distinct authors across the transcript, sorted.
pub fn distinct_authors(transcript: &Transcript) -> BTreeSet<String> {
    transcript.iter().map(|m| m.author.clone()).collect()
}

/// Authors whose name contains `term`, case-insensitively. An empty term keeps everyone.
pub fn filter_authors<'a, I>(authors: I, term: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let needle = term.to_lowercase();
    authors
        .into_iter()
        .filter(|a| a.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;
    use chrono::NaiveDate;

    fn transcript(authors: &[&str]) -> Transcript {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        authors
            .iter()
            .map(|a| Message::new(ts, *a, "text"))
            .collect::<Vec<_>>()
            .into()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_distinct_authors() {
        let t = transcript(&["Bob", "Alice", "Bob", "Alicia", "Alice"]);
        assert_eq!(distinct_authors(&t), set(&["Alice", "Alicia", "Bob"]));
    }

    #[test]
    fn test_distinct_authors_empty() {
        assert!(distinct_authors(&Transcript::new()).is_empty());
    }

    #[test]
    fn test_filter_case_insensitive() {
        let authors = set(&["Alice", "Bob", "Alicia"]);
        assert_eq!(filter_authors(&authors, "ali"), set(&["Alice", "Alicia"]));
        assert_eq!(filter_authors(&authors, "ALI"), set(&["Alice", "Alicia"]));
    }

    #[test]
    fn test_filter_grow_and_shrink() {
        let authors = set(&["Alice", "Bob", "Alicia"]);
        assert_eq!(filter_authors(&authors, "alic"), set(&["Alice", "Alicia"]));
        assert_eq!(filter_authors(&authors, "alici"), set(&["Alicia"]));
        assert_eq!(filter_authors(&authors, ""), authors);
        assert!(filter_authors(&authors, "zed").is_empty());
    }

    #[test]
    fn test_filter_non_ascii() {
        let authors = set(&["김철수", "이영희"]);
        assert_eq!(filter_authors(&authors, "철"), set(&["김철수"]));
    }
}
