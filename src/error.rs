//! Error types for solver construction and insertion probing.

use std::error::Error as StdError;
use std::fmt;

/// Fatal errors surfaced while building the solver or its problem instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A destroy operator name in the configuration is not recognized.
    UnknownDestroyOperator(String),
    /// A repair operator name in the configuration is not recognized.
    UnknownRepairOperator(String),
    /// Neither a positive bucket width nor a positive bucket count was given.
    InvalidBucketConfig,
    /// The fleet cannot hold all customers even with the overflow allowance.
    InsufficientFleetCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownDestroyOperator(name) => {
                write!(f, "unknown destroy operator: {}", name)
            }
            Error::UnknownRepairOperator(name) => {
                write!(f, "unknown repair operator: {}", name)
            }
            Error::InvalidBucketConfig => {
                write!(f, "load buckets need a positive width or a positive count")
            }
            Error::InsufficientFleetCapacity => {
                write!(
                    f,
                    "total vehicle capacity cannot hold all customers even with the overflow allowance"
                )
            }
        }
    }
}

impl StdError for Error {}

/// Signal raised while probing an insertion whose capacity error would reach
/// the pseudo-capacity cap.
///
/// This is control flow, not a failure: the probing callsite rolls the
/// tentative edit back and skips the remaining positions of the route. It
/// never escapes an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Infeasibility;
