/// Summary statistics for a single sample.
///
/// Every field is computed over the values that are present; missing values
/// must be filtered out before construction (see [`SummaryStats::from_optional`]).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SummaryStats {
    /// Number of values in the sample.
    pub count: usize,
    /// Sum of all values.
    pub sum: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The median of the sample.
    ///
    /// For an even number of values this is the midpoint of the two central
    /// order statistics.
    pub median: f64,
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
}

impl SummaryStats {
    /// Computes summary statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(SummaryStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use lduclosure_stats::descriptive::SummaryStats;
    /// let stats = SummaryStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.sum, 15.0);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes summary statistics over the present entries of a sample with
    /// missing values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lduclosure_stats::descriptive::SummaryStats;
    /// let stats = SummaryStats::from_optional([Some(4.0), None, Some(2.0)]).unwrap();
    /// assert_eq!(stats.count, 2);
    /// assert_eq!(stats.median, 3.0);
    ///
    /// assert!(SummaryStats::from_optional([None, None]).is_none());
    /// ```
    #[must_use]
    pub fn from_optional<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::new(values.into_iter().flatten())
    }

    /// Computes summary statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let sum = sorted_values.iter().sum::<f64>();
        let mean = sum / count as f64;
        let median = median_of_sorted(sorted_values)?;

        Some(Self {
            count,
            sum,
            mean,
            median,
            min,
            max,
        })
    }
}

/// Returns the median of values sorted in ascending order.
///
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// # use lduclosure_stats::descriptive::median_of_sorted;
/// assert_eq!(median_of_sorted(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(median_of_sorted(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
/// assert_eq!(median_of_sorted(&[]), None);
/// ```
#[must_use]
pub fn median_of_sorted(sorted_values: &[f64]) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted_values[mid])
    } else {
        let (lo, hi) = (sorted_values[mid - 1], sorted_values[mid]);
        Some(lo + (hi - lo) / 2.0)
    }
}

/// Returns the arithmetic mean and the unbiased sample variance (`n - 1`
/// denominator) of a sample.
///
/// Returns `None` when the sample holds fewer than two values.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_and_sample_variance(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, variance))
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_small_groups() {
        let open = SummaryStats::new([1.0, 2.0, 3.0]).unwrap();
        let closed = SummaryStats::new([4.0, 5.0, 6.0]).unwrap();
        assert_eq!(open.mean, 2.0);
        assert_eq!(closed.mean, 5.0);
        assert_eq!(open.median, 2.0);
        assert_eq!(closed.median, 5.0);
        assert_eq!((open.min, open.max), (1.0, 3.0));
        assert_eq!((closed.min, closed.max), (4.0, 6.0));
    }

    #[test]
    fn test_empty_sample_is_none() {
        assert!(SummaryStats::new(std::iter::empty()).is_none());
        assert!(SummaryStats::from_optional([None]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = SummaryStats::new([7.5]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 7.5);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.max, 7.5);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let stats = SummaryStats::from_optional([None, Some(10.0), Some(30.0), None]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, 40.0);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.median, 20.0);
    }

    #[test]
    fn test_median_within_range_on_random_samples() {
        let mut rng = Pcg64Mcg::new(0x5eed);
        for _ in 0..200 {
            let len = rng.random_range(1..50);
            let values = (0..len)
                .map(|_| rng.random_range(-1000.0..1000.0))
                .collect::<Vec<f64>>();
            let stats = SummaryStats::new(values).unwrap();
            assert!(stats.min <= stats.median && stats.median <= stats.max);
            assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        }
    }

    #[test]
    fn test_sample_variance() {
        let (mean, var) = mean_and_sample_variance(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(mean, 2.0);
        assert_eq!(var, 1.0);
        assert!(mean_and_sample_variance(&[1.0]).is_none());
    }
}
