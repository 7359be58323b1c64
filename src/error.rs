//! Error types for catdraw

use std::fmt;
use thiserror::Error;

/// Result type alias using catdraw's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Which per-entry check a probability weight failed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProbabilityIssue {
    /// Entry is strictly negative
    Negative,
    /// Entry is infinite or NaN
    NonFinite,
}

impl fmt::Display for ProbabilityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityIssue::Negative => write!(f, "encountering probability entry < 0"),
            ProbabilityIssue::NonFinite => {
                write!(f, "encountering probability entry = infinity or NaN")
            }
        }
    }
}

/// Errors that can occur in catdraw operations
#[derive(Error, Debug)]
pub enum Error {
    /// A weight entry is negative or non-finite
    #[error("invalid multinomial distribution ({issue}): row {row}, category {index}, value {value}")]
    InvalidProbability {
        /// Distribution (row) index
        row: usize,
        /// Category index within the row
        index: usize,
        /// Offending value, widened to f64
        value: f64,
        /// Which check failed
        issue: ProbabilityIssue,
    },

    /// A row's total weight is not positive
    #[error("invalid multinomial distribution (sum of probabilities <= 0): row {row}, sum {sum}")]
    DegenerateDistribution {
        /// Distribution (row) index
        row: usize,
        /// Accumulated total of the row
        sum: f64,
    },

    /// Not enough positive-weight categories to sample without replacement
    #[error(
        "invalid multinomial distribution (with replacement=False, not enough non-negative category to sample): \
         row {row} has {positive} positive categories, {requested} samples requested"
    )]
    InsufficientSupport {
        /// Distribution (row) index
        row: usize,
        /// Number of strictly positive categories in the row
        positive: usize,
        /// Number of samples requested
        requested: usize,
    },

    /// Mass removal left a distribution that can no longer be renormalized
    #[error("internal invariant violated in row {row}: {reason}")]
    InternalInvariantViolation {
        /// Distribution (row) index
        row: usize,
        /// What went wrong
        reason: String,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Layout addresses elements outside of its storage
    #[error("Invalid layout: {reason}")]
    InvalidLayout {
        /// Description of the problem
        reason: String,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Row index the error refers to, for per-distribution failures
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::InvalidProbability { row, .. }
            | Self::DegenerateDistribution { row, .. }
            | Self::InsufficientSupport { row, .. }
            | Self::InternalInvariantViolation { row, .. } => Some(*row),
            _ => None,
        }
    }
}
