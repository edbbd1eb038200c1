//! Error types for plotpaint operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plotpaint operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (configuration files, SVG export).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid dimensions for a frame or pad.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: f64,
        /// Height value.
        height: f64,
    },

    /// Data length mismatch between coordinate arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// A draw call was issued against an incompatible frame or overlay.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Painter state machine was driven through an invalid transition.
    #[error("Invalid painter transition from {from} to {to}")]
    InvalidTransition {
        /// State the painter was in.
        from: &'static str,
        /// State that was requested.
        to: &'static str,
    },

    /// A sequential draw queue was completed out of order.
    #[error("Draw queue completion out of order: expected task {expected:?}, got {got}")]
    QueueOrder {
        /// Index of the task currently in flight, if any.
        expected: Option<usize>,
        /// Index reported as completed.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions {
            width: 0.0,
            height: 100.0,
        };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch {
            x_len: 10,
            y_len: 20,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_invalid_transition_names_states() {
        let err = Error::InvalidTransition {
            from: "Disposed",
            to: "Ready",
        };
        let text = err.to_string();
        assert!(text.contains("Disposed"));
        assert!(text.contains("Ready"));
    }

    #[test]
    fn test_queue_order() {
        let err = Error::QueueOrder {
            expected: Some(1),
            got: 3,
        };
        assert!(err.to_string().contains("Some(1)"));
    }
}
