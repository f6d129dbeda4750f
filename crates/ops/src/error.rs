//! Error types for scalar operators

use thiserror::Error;

/// Errors raised by operators with a restricted domain.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OpsError {
    #[error("{op}: division by zero")]
    DivisionByZero { op: &'static str },

    #[error("{op}: input {value} is outside the domain")]
    Domain { op: &'static str, value: f64 },

    #[error("threshold must be finite and positive, got {value}")]
    InvalidThreshold { value: f64 },
}

pub type Result<T> = std::result::Result<T, OpsError>;
