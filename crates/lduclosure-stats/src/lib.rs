//! Statistical primitives for comparing open and closed LDU groups.
//!
//! This crate provides:
//!
//! - **Summary statistics**: count, sum, mean, median, minimum and maximum
//! - **Ranking**: average ranks with tie bookkeeping
//! - **Distributions**: Student's t, standard normal, incomplete beta
//! - **Significance tests**: Welch/Student t-tests and the Mann-Whitney U test
//!
//! # Modules
//!
//! - [`descriptive`]: Summary statistics over samples with missing values removed
//! - [`rank`]: Pooled-sample ranking used by rank-based tests
//! - [`distribution`]: Distribution functions behind the p-values
//! - [`significance`]: Two-sample hypothesis tests
//!
//! # Examples
//!
//! ## Summarizing a sample
//!
//! ```
//! use lduclosure_stats::descriptive::SummaryStats;
//!
//! let stats = SummaryStats::from_optional([Some(1.0), None, Some(2.0), Some(3.0)]).unwrap();
//! assert_eq!(stats.count, 3);
//! assert_eq!(stats.median, 2.0);
//! ```
//!
//! ## Comparing two samples
//!
//! ```
//! use lduclosure_stats::significance::{MannWhitneyMethod, mann_whitney_u, welch_t_test};
//!
//! let open = [1.0, 2.0, 3.0];
//! let closed = [4.0, 5.0, 6.0];
//!
//! let mwu = mann_whitney_u(&open, &closed, MannWhitneyMethod::Exact).unwrap();
//! assert!((mwu.p_value - 0.1).abs() < 1e-12);
//!
//! let t = welch_t_test(&open, &closed).unwrap();
//! assert!(t.p_value < 0.05);
//! ```

pub mod descriptive;
pub mod distribution;
pub mod rank;
pub mod significance;
