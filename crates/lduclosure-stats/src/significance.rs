//! Two-sample significance tests.
//!
//! - [`welch_t_test`] / [`student_t_test`]: independent two-sample t-tests
//! - [`mann_whitney_u`]: Mann-Whitney U rank-sum test with exact and
//!   asymptotic p-values
//!
//! All p-values are two-sided, so they do not depend on which sample is
//! passed first.

use crate::{
    descriptive::mean_and_sample_variance,
    distribution::{normal_sf, student_t_two_sided},
    rank::Ranking,
};

/// Largest `n1 * n2` for which the exact U distribution is tabulated.
pub const EXACT_MAX_U: usize = 1_000_000;

/// Error raised when a significance test cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TestError {
    #[display(
        "{test} requires at least {required} observation(s) per sample, got {first} and {second}"
    )]
    TooFewSamples {
        test: &'static str,
        required: usize,
        first: usize,
        second: usize,
    },
    #[display("{test} is undefined for samples without variance")]
    ZeroVariance { test: &'static str },
    #[display(
        "exact Mann-Whitney U distribution is infeasible for sample sizes {first} and {second}"
    )]
    ExactInfeasible { first: usize, second: usize },
}

/// Result of an independent two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TTestResult {
    /// The t statistic (`mean(a) - mean(b)` over its standard error).
    pub statistic: f64,
    /// Degrees of freedom (Welch-Satterthwaite for unequal variances).
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

const WELCH: &str = "Welch's t-test";
const STUDENT: &str = "Student's t-test";
const MANN_WHITNEY: &str = "Mann-Whitney U test";

/// Welch's t-test: independent samples without assuming equal variances.
///
/// # Examples
///
/// ```
/// # use lduclosure_stats::significance::welch_t_test;
/// let result = welch_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert!(result.p_value < 0.05);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<TTestResult, TestError> {
    let ((mean_a, var_a), (mean_b, var_b)) = two_sample_moments(WELCH, a, b)?;
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);

    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let se_squared = se_a + se_b;
    if se_squared <= 0.0 {
        return Err(TestError::ZeroVariance { test: WELCH });
    }

    let statistic = (mean_a - mean_b) / se_squared.sqrt();
    let df = se_squared.powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));
    let p_value = student_t_two_sided(statistic, df);

    Ok(TTestResult {
        statistic,
        df,
        p_value,
    })
}

/// Student's t-test: independent samples with a pooled variance estimate.
#[expect(clippy::cast_precision_loss)]
pub fn student_t_test(a: &[f64], b: &[f64]) -> Result<TTestResult, TestError> {
    let ((mean_a, var_a), (mean_b, var_b)) = two_sample_moments(STUDENT, a, b)?;
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);

    let df = n_a + n_b - 2.0;
    let pooled = ((n_a - 1.0) * var_a + (n_b - 1.0) * var_b) / df;
    let se_squared = pooled * (1.0 / n_a + 1.0 / n_b);
    if se_squared <= 0.0 {
        return Err(TestError::ZeroVariance { test: STUDENT });
    }

    let statistic = (mean_a - mean_b) / se_squared.sqrt();
    let p_value = student_t_two_sided(statistic, df);

    Ok(TTestResult {
        statistic,
        df,
        p_value,
    })
}

fn two_sample_moments(
    test: &'static str,
    a: &[f64],
    b: &[f64],
) -> Result<((f64, f64), (f64, f64)), TestError> {
    let too_few = || TestError::TooFewSamples {
        test,
        required: 2,
        first: a.len(),
        second: b.len(),
    };
    let moments_a = mean_and_sample_variance(a).ok_or_else(too_few)?;
    let moments_b = mean_and_sample_variance(b).ok_or_else(too_few)?;
    Ok((moments_a, moments_b))
}

/// How the Mann-Whitney U p-value is computed.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, serde::Serialize,
)]
pub enum MannWhitneyMethod {
    /// Exact when the exact distribution is feasible, asymptotic otherwise.
    #[default]
    Auto,
    /// Exact null distribution of U; fails for oversized samples.
    Exact,
    /// Normal approximation with tie and continuity corrections.
    Asymptotic,
}

/// Result of a Mann-Whitney U test.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MannWhitneyResult {
    /// U statistic of the first sample.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// The method actually used ([`MannWhitneyMethod::Exact`] or
    /// [`MannWhitneyMethod::Asymptotic`]).
    pub method: MannWhitneyMethod,
}

/// Mann-Whitney U rank-sum test of two independent samples.
///
/// The exact method follows the no-ties null distribution of U even when
/// ties are present; U values falling between integers (from averaged ranks)
/// are truncated when computing the tail probability, as scipy's exact method
/// does.
///
/// # Examples
///
/// ```
/// # use lduclosure_stats::significance::{mann_whitney_u, MannWhitneyMethod};
/// let result =
///     mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], MannWhitneyMethod::Exact).unwrap();
/// assert_eq!(result.statistic, 0.0);
/// assert!((result.p_value - 0.1).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mann_whitney_u(
    a: &[f64],
    b: &[f64],
    method: MannWhitneyMethod,
) -> Result<MannWhitneyResult, TestError> {
    if a.is_empty() || b.is_empty() {
        return Err(TestError::TooFewSamples {
            test: MANN_WHITNEY,
            required: 1,
            first: a.len(),
            second: b.len(),
        });
    }

    let (n_a, n_b) = (a.len(), b.len());
    let pooled = a.iter().chain(b).copied().collect::<Vec<_>>();
    let ranking = Ranking::new(&pooled);
    let rank_sum_a = ranking.ranks[..n_a].iter().sum::<f64>();
    let u_a = rank_sum_a - (n_a * (n_a + 1)) as f64 / 2.0;
    let u_b = (n_a * n_b) as f64 - u_a;
    let u_max = u_a.max(u_b);

    let (p_value, method) = match method {
        MannWhitneyMethod::Exact => (exact_p_value(u_max, n_a, n_b)?, MannWhitneyMethod::Exact),
        MannWhitneyMethod::Asymptotic => (
            asymptotic_p_value(u_max, n_a, n_b, &ranking)?,
            MannWhitneyMethod::Asymptotic,
        ),
        MannWhitneyMethod::Auto => match exact_p_value(u_max, n_a, n_b) {
            Ok(p) => (p, MannWhitneyMethod::Exact),
            Err(TestError::ExactInfeasible { .. }) => (
                asymptotic_p_value(u_max, n_a, n_b, &ranking)?,
                MannWhitneyMethod::Asymptotic,
            ),
            Err(e) => return Err(e),
        },
    };

    Ok(MannWhitneyResult {
        statistic: u_a,
        p_value,
        method,
    })
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn exact_p_value(u_max: f64, n_a: usize, n_b: usize) -> Result<f64, TestError> {
    let frequencies = exact_u_frequencies(n_a, n_b)?;
    let total = frequencies.iter().sum::<i128>();
    let threshold = (u_max.floor() as usize).min(frequencies.len());
    let upper_tail = frequencies[threshold..].iter().sum::<i128>();
    Ok((2.0 * upper_tail as f64 / total as f64).min(1.0))
}

/// Number of rank arrangements yielding each U value (index) for samples of
/// sizes `n_a` and `n_b` under the null hypothesis.
///
/// The frequencies are the coefficients of the Gaussian binomial coefficient
/// `[n_a + n_b choose m]_q` with `m = min(n_a, n_b)`, built up one factor
/// `(1 - q^(n + i)) / (1 - q^i)` at a time.
pub fn exact_u_frequencies(n_a: usize, n_b: usize) -> Result<Vec<i128>, TestError> {
    let infeasible = || TestError::ExactInfeasible {
        first: n_a,
        second: n_b,
    };

    let (m, n) = (n_a.min(n_b), n_a.max(n_b));
    let max_u = m.checked_mul(n).filter(|&u| u <= EXACT_MAX_U).ok_or_else(infeasible)?;
    binomial(m + n, m).ok_or_else(infeasible)?;

    let mut freq = vec![0_i128; max_u + 1];
    freq[0] = 1;
    for i in 1..=m {
        let shift = n + i;
        for k in (shift..=max_u).rev() {
            freq[k] = freq[k].checked_sub(freq[k - shift]).ok_or_else(infeasible)?;
        }
        for k in i..=max_u {
            freq[k] = freq[k].checked_add(freq[k - i]).ok_or_else(infeasible)?;
        }
    }
    Ok(freq)
}

fn binomial(n: usize, k: usize) -> Option<i128> {
    let k = k.min(n - k);
    let mut acc = 1_i128;
    for j in 1..=k {
        let numerator = i128::try_from(n - k + j).ok()?;
        let denominator = i128::try_from(j).ok()?;
        acc = acc.checked_mul(numerator)? / denominator;
    }
    Some(acc)
}

#[expect(clippy::cast_precision_loss)]
fn asymptotic_p_value(
    u_max: f64,
    n_a: usize,
    n_b: usize,
    ranking: &Ranking,
) -> Result<f64, TestError> {
    let n = (n_a + n_b) as f64;
    let product = (n_a * n_b) as f64;
    let mean = product / 2.0;
    let tie_correction = if n > 1.0 {
        ranking.tie_term() / (n * (n - 1.0))
    } else {
        0.0
    };
    let variance = product / 12.0 * ((n + 1.0) - tie_correction);
    if variance <= 0.0 {
        return Err(TestError::ZeroVariance { test: MANN_WHITNEY });
    }

    let z = (u_max - mean - 0.5) / variance.sqrt();
    Ok((2.0 * normal_sf(z)).min(1.0))
}
