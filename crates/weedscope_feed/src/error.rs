//! Error types for decoding backend and weather payloads.

use thiserror::Error;

/// Errors that can occur while decoding a feed payload.
#[derive(Error, Debug)]
pub enum FeedError {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Detection confidence outside of [0, 1]
    #[error("Detection {index} has confidence {value} outside of [0, 1]")]
    ConfidenceOutOfRange {
        /// Position of the detection in its batch
        index: usize,
        /// The offending value
        value: f32,
    },

    /// Bounding box with a negative or non-finite extent
    #[error("Detection {index} has an invalid bounding box: {message}")]
    InvalidBox {
        /// Position of the detection in its batch
        index: usize,
        /// Description of the problem
        message: String,
    },

    /// Weather API key is missing or still the placeholder value
    #[error("Weather API key is not configured")]
    MissingApiKey,
}

impl FeedError {
    /// Create an invalid box error with a message.
    pub fn invalid_box(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidBox {
            index,
            message: message.into(),
        }
    }
}
