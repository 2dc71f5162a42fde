use crate::matching::models::MatchResult;

pub const DEFAULT_TOP_N: usize = 5;

/// Sorts by score descending and keeps the first `top_n`.
///
/// `sort_by` is stable, so equal scores keep their encounter order.
pub fn rank(mut matches: Vec<MatchResult>, top_n: usize) -> Vec<MatchResult> {
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(top_n);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(address: &str, score: u32) -> MatchResult {
        MatchResult {
            address: address.to_string(),
            name: address.to_uppercase(),
            score,
            matching_skills: Default::default(),
            missing_skills: Default::default(),
            comments: String::new(),
        }
    }

    fn addresses(ranked: &[MatchResult]) -> Vec<&str> {
        ranked.iter().map(|m| m.address.as_str()).collect()
    }

    #[test]
    fn test_sorts_descending() {
        let ranked = rank(vec![result("a", 10), result("b", 90), result("c", 50)], 5);
        assert_eq!(addresses(&ranked), ["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let ranked = rank(
            vec![
                result("a", 70),
                result("b", 90),
                result("c", 70),
                result("d", 90),
                result("e", 70),
            ],
            5,
        );
        assert_eq!(addresses(&ranked), ["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let many: Vec<MatchResult> = (0..8).map(|i| result(&format!("f{i}"), i * 10)).collect();
        let ranked = rank(many, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), DEFAULT_TOP_N);
        assert_eq!(ranked[0].score, 70);
        assert_eq!(ranked[4].score, 30);
    }

    #[test]
    fn test_fewer_than_top_n_keeps_all() {
        let ranked = rank(vec![result("a", 1), result("b", 2)], DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_zero_top_n_and_empty_input() {
        assert!(rank(vec![result("a", 1)], 0).is_empty());
        assert!(rank(vec![], DEFAULT_TOP_N).is_empty());
    }
}
