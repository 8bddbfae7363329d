//! Circuit selection parsing.
//!
//! Turns a selection expression into an ordered list of circuit labels drawn
//! from a matrix's label set:
//!
//! - `all` or `*` selects every label in matrix order;
//! - `1 3 7` or `1,3,7` selects by 1-based position;
//! - comma-separated tokens may also be exact label names, so multi-word
//!   names stay addressable (`4, Circuit de Monaco, 7`).
//!
//! Duplicates are dropped keeping the first occurrence. Anything the matrix
//! does not know is rejected before a heuristic ever runs.

use crate::error::{Error, Result};

/// Parse a selection expression against the ordered label set.
pub fn parse_selection(input: &str, labels: &[String]) -> Result<Vec<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_selection("empty input"));
    }

    if trimmed.eq_ignore_ascii_case("all") || trimmed == "*" {
        return check_count(labels.to_vec());
    }

    let only_numbers = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == ',');

    let tokens: Vec<&str> = if only_numbers {
        trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        // Names may contain spaces, so commas are the only separator here
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    };

    if tokens.is_empty() {
        return Err(Error::invalid_selection("empty input"));
    }

    let mut selected = Vec::with_capacity(tokens.len());
    for token in tokens {
        let label = resolve_token(token, labels)?;
        // Drop duplicates, keeping the first occurrence
        if !selected.contains(&label) {
            selected.push(label);
        }
    }

    check_count(selected)
}

fn resolve_token(token: &str, labels: &[String]) -> Result<String> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        let k: usize = token
            .parse()
            .map_err(|_| Error::invalid_selection(format!("non-numeric token: '{token}'")))?;
        if !(1..=labels.len()).contains(&k) {
            return Err(Error::invalid_selection(format!(
                "out of range: {k} (must be 1..{})",
                labels.len()
            )));
        }
        Ok(labels[k - 1].clone())
    } else if let Some(label) = labels.iter().find(|l| l.as_str() == token) {
        Ok(label.clone())
    } else {
        Err(Error::UnknownLabel(token.to_string()))
    }
}

fn check_count(selected: Vec<String>) -> Result<Vec<String>> {
    if selected.len() < 2 {
        return Err(Error::TooFewNodes(selected.len()));
    }
    Ok(selected)
}

/// The numbered mapping shown to users picking circuits by position.
pub fn format_label_listing(labels: &[String]) -> String {
    let mut out = String::new();
    out.push_str("# ===== CIRCUIT NUMBER MAPPING =====\n");
    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!("# {:2}: {}\n", i + 1, label));
    }
    out.push_str("# ==================================\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec![
            "Circuit de Monaco".to_string(),
            "Silverstone Circuit".to_string(),
            "Hungaroring".to_string(),
            "Suzuka International Racing Course".to_string(),
        ]
    }

    #[test]
    fn test_all_selects_everything_in_order() {
        let selection = parse_selection("all", &labels()).unwrap();
        assert_eq!(selection, labels());
        let star = parse_selection("*", &labels()).unwrap();
        assert_eq!(star, labels());
    }

    #[test]
    fn test_numbers_with_mixed_separators() {
        let selection = parse_selection("1, 3 4", &labels()).unwrap();
        assert_eq!(
            selection,
            vec![
                "Circuit de Monaco".to_string(),
                "Hungaroring".to_string(),
                "Suzuka International Racing Course".to_string(),
            ]
        );
    }

    #[test]
    fn test_names_and_numbers_mixed() {
        let selection = parse_selection("2, Circuit de Monaco", &labels()).unwrap();
        assert_eq!(
            selection,
            vec![
                "Silverstone Circuit".to_string(),
                "Circuit de Monaco".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let selection = parse_selection("2 1 2 3 1", &labels()).unwrap();
        assert_eq!(
            selection,
            vec![
                "Silverstone Circuit".to_string(),
                "Circuit de Monaco".to_string(),
                "Hungaroring".to_string(),
            ]
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            parse_selection("1 9", &labels()),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            parse_selection("0 1", &labels()),
            Err(Error::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!(matches!(
            parse_selection("1, Atlantis Raceway", &labels()),
            Err(Error::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_single_pick_rejected() {
        assert!(matches!(
            parse_selection("2", &labels()),
            Err(Error::TooFewNodes(1))
        ));
        assert!(matches!(
            parse_selection("2 2 2", &labels()),
            Err(Error::TooFewNodes(1))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse_selection("  ", &labels()).is_err());
        assert!(parse_selection(", ,", &labels()).is_err());
    }

    #[test]
    fn test_listing_contains_every_label() {
        let listing = format_label_listing(&labels());
        for label in labels() {
            assert!(listing.contains(&label));
        }
    }
}
