use tracing::instrument;

use crate::models::Catalog;

/// Best catalog match for one raw title
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    pub title: String,
    /// Similarity ratio in [0, 100]
    pub score: u32,
}

/// Indel similarity ratio between two titles, as a whole number in [0, 100]
///
/// `2 * LCS / (len(a) + len(b))` over chars, rounded half to even. Symmetric and
/// case-sensitive; identical strings score 100, an empty string scores 0.
pub fn match_score(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let common = longest_common_subsequence(&a, &b);
    let ratio = 200.0 * common as f64 / (a.len() + b.len()) as f64;
    ratio.round_ties_even() as u32
}

/// Length of the longest common subsequence, single-row dynamic programming
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];

    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}

/// Finds the catalog title closest to `raw`
///
/// Ties go to the earliest title in catalog order.
pub fn best_match(raw: &str, catalog: &Catalog) -> Option<TitleMatch> {
    let mut best: Option<TitleMatch> = None;

    for title in catalog.titles() {
        let score = match_score(raw, title);
        if best.as_ref().map_or(true, |current| score > current.score) {
            best = Some(TitleMatch {
                title: title.to_string(),
                score,
            });
        }
    }

    best
}

/// Maps each raw user-entered title to its closest canonical catalog title
///
/// Output order and length follow the input; no deduplication. Empty input or an
/// empty catalog yields an empty result rather than an error.
#[instrument(skip_all, fields(inputs = raw_titles.len(), catalog = catalog.len()))]
pub fn reconcile<S: AsRef<str>>(raw_titles: &[S], catalog: &Catalog) -> Vec<String> {
    if raw_titles.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    raw_titles
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            let found = best_match(raw, catalog)?;
            tracing::debug!(
                input = %raw,
                matched = %found.title,
                score = found.score,
                "Reconciled title"
            );
            Some(found.title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;

    fn catalog(titles: &[&str]) -> Catalog {
        Catalog::new(titles.iter().map(|t| CatalogEntry::new(*t)).collect()).unwrap()
    }

    fn lcs(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        longest_common_subsequence(&a, &b)
    }

    #[test]
    fn test_longest_common_subsequence() {
        assert_eq!(lcs("things", "Stranger Things"), 6);
        assert_eq!(lcs("frid", "Friends"), 3);
        assert_eq!(lcs("abc", "xyz"), 0);
        assert_eq!(lcs("", "abc"), 0);
    }

    #[test]
    fn test_match_score_bounds() {
        assert_eq!(match_score("Lupin", "Lupin"), 100);
        assert_eq!(match_score("abc", "xyz"), 0);
        assert_eq!(match_score("", "Lupin"), 0);
        assert_eq!(match_score("Lopin", "Lupin"), match_score("Lupin", "Lopin"));
    }

    #[test]
    fn test_match_score_is_indel_ratio() {
        // 2 * 6 / (6 + 15) = 57.14
        assert_eq!(match_score("things", "Stranger Things"), 57);
        // 2 * 3 / (6 + 7) = 46.15
        assert_eq!(match_score("things", "Friends"), 46);
        // a substitution costs two indel operations: 2 * 4 / 10 = 80
        assert_eq!(match_score("Lopin", "Lupin"), 80);
    }

    #[test]
    fn test_match_score_rounds_half_to_even() {
        // 2 * 1 / (1 + 7) = 25.0 exactly; 2 * 1 / (1 + 15) = 12.5 rounds down
        assert_eq!(match_score("a", "bcdefga"), 25);
        assert_eq!(match_score("a", "bcdefghijklmnoa"), 12);
    }

    #[test]
    fn test_reconcile_empty_inputs() {
        let empty: [&str; 0] = [];
        assert!(reconcile(&empty, &catalog(&["Lupin"])).is_empty());
        assert!(reconcile(&["Lupin"], &Catalog::default()).is_empty());
        assert!(reconcile(&empty, &Catalog::default()).is_empty());
    }

    #[test]
    fn test_reconcile_tie_prefers_catalog_order() {
        // "ab" shares one char with both titles
        let cat = catalog(&["ax", "ay"]);
        assert_eq!(reconcile(&["ab"], &cat), vec!["ax"]);

        let reversed = catalog(&["ay", "ax"]);
        assert_eq!(reconcile(&["ab"], &reversed), vec!["ay"]);
    }

    #[test]
    fn test_reconcile_rounded_tie_prefers_catalog_order() {
        // 94.74 and 95.24 both round to 95
        assert_eq!(match_score("abcdefghij", "abcdefghi"), 95);
        assert_eq!(match_score("abcdefghij", "abcdefghijk"), 95);

        let cat = catalog(&["abcdefghi", "abcdefghijk"]);
        assert_eq!(reconcile(&["abcdefghij"], &cat), vec!["abcdefghi"]);

        let reversed = catalog(&["abcdefghijk", "abcdefghi"]);
        assert_eq!(reconcile(&["abcdefghij"], &reversed), vec!["abcdefghijk"]);
    }

    #[test]
    fn test_reconcile_does_not_deduplicate() {
        let cat = catalog(&["Lupin", "Dark"]);
        assert_eq!(
            reconcile(&["lupin", "Lupn"], &cat),
            vec!["Lupin".to_string(), "Lupin".to_string()]
        );
    }

    #[test]
    fn test_best_match_reports_score() {
        let cat = catalog(&["Lupin", "Dark"]);
        let found = best_match("Lupin", &cat).unwrap();
        assert_eq!(found.title, "Lupin");
        assert_eq!(found.score, 100);
    }
}
