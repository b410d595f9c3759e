/// Ranks of a pooled sample.
///
/// Ranks are 1-based; tied values share the average of the ranks they span.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Rank of each input value, in input order.
    pub ranks: Vec<f64>,
    /// Size of each group of tied values (groups of size 1 included).
    pub tie_sizes: Vec<usize>,
}

impl Ranking {
    /// Ranks `values`, averaging the ranks of tied values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lduclosure_stats::rank::Ranking;
    /// let ranking = Ranking::new(&[10.0, 30.0, 20.0, 20.0]);
    /// assert_eq!(ranking.ranks, [1.0, 4.0, 2.5, 2.5]);
    /// assert!(ranking.has_ties());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let mut order = (0..values.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut ranks = vec![0.0; values.len()];
        let mut tie_sizes = vec![];
        let mut start = 0;
        while start < order.len() {
            let mut end = start + 1;
            while end < order.len() && values[order[end]] == values[order[start]] {
                end += 1;
            }
            // Positions start..end hold ranks start+1..=end.
            let average = (start + 1 + end) as f64 / 2.0;
            for &idx in &order[start..end] {
                ranks[idx] = average;
            }
            tie_sizes.push(end - start);
            start = end;
        }

        Self { ranks, tie_sizes }
    }

    /// Returns `true` if at least two values share a rank.
    #[must_use]
    pub fn has_ties(&self) -> bool {
        self.tie_sizes.iter().any(|&t| t > 1)
    }

    /// Returns `Σ (t³ - t)` over all tie groups, used by tie corrections.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn tie_term(&self) -> f64 {
        self.tie_sizes
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_values() {
        let ranking = Ranking::new(&[3.0, 1.0, 2.0]);
        assert_eq!(ranking.ranks, [3.0, 1.0, 2.0]);
        assert!(!ranking.has_ties());
        assert_eq!(ranking.tie_term(), 0.0);
    }

    #[test]
    fn test_all_tied() {
        let ranking = Ranking::new(&[5.0; 4]);
        assert_eq!(ranking.ranks, [2.5; 4]);
        assert_eq!(ranking.tie_sizes, [4]);
        assert_eq!(ranking.tie_term(), 60.0);
    }

    #[test]
    fn test_empty() {
        let ranking = Ranking::new(&[]);
        assert!(ranking.ranks.is_empty());
        assert!(ranking.tie_sizes.is_empty());
    }
}
