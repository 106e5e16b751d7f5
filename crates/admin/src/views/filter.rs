//! Client-style search over fetched records.

/// A record that can be matched by the search box.
pub trait Searchable {
    /// The designated fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Whether any designated field contains `needle` (already lowercase).
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Keep the records matching `term` case-insensitively, in their original
/// order. A blank term keeps everything.
#[must_use]
pub fn filter_records<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        email: String,
        hidden: String,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.email.as_str()]
        }
    }

    fn row(name: &str, email: &str, hidden: &str) -> Row {
        Row {
            name: name.to_string(),
            email: email.to_string(),
            hidden: hidden.to_string(),
        }
    }

    #[test]
    fn test_case_insensitive_substring() {
        let rows = vec![
            row("Asha Rao", "asha@tunenest.app", ""),
            row("Ravi", "ravi@FIX.in", ""),
        ];
        assert_eq!(filter_records(&rows, "ASHA"), vec![&rows[0]]);
        assert_eq!(filter_records(&rows, "fix"), vec![&rows[1]]);
        assert_eq!(filter_records(&rows, "  "), vec![&rows[0], &rows[1]]);
    }

    #[test]
    fn test_only_designated_fields_match() {
        let rows = vec![row("Asha", "asha@tunenest.app", "premium")];
        assert!(filter_records(&rows, "premium").is_empty());
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            ("[a-zA-Z ]{0,12}", "[a-zA-Z@.]{0,12}", "[a-z]{0,6}")
                .prop_map(|(n, e, h)| row(&n, &e, &h)),
            0..20,
        )
    }

    proptest! {
        #[test]
        fn prop_empty_term_keeps_all(rows in rows_strategy()) {
            let kept = filter_records(&rows, "");
            prop_assert_eq!(kept.len(), rows.len());
            prop_assert!(kept.iter().zip(&rows).all(|(a, b)| *a == b));
        }

        #[test]
        fn prop_result_is_matching_subset(rows in rows_strategy(), term in "[a-zA-Z]{1,3}") {
            let kept = filter_records(&rows, &term);
            let needle = term.to_lowercase();

            prop_assert!(kept.len() <= rows.len());
            for record in &kept {
                prop_assert!(rows.contains(record));
                prop_assert!(
                    record.name.to_lowercase().contains(&needle)
                        || record.email.to_lowercase().contains(&needle)
                );
            }

            // Nothing that matches is dropped
            let expected = rows
                .iter()
                .filter(|r| {
                    r.name.to_lowercase().contains(&needle)
                        || r.email.to_lowercase().contains(&needle)
                })
                .count();
            prop_assert_eq!(kept.len(), expected);
        }
    }
}
