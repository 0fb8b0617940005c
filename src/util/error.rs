//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DetPostResult<T> = std::result::Result<T, DetPostError>;

/// Errors that can occur when validating inputs or running the pipeline.
///
/// An empty detection list is never an error; every variant here means the
/// call produced no result at all.
#[derive(Debug, Error, PartialEq)]
pub enum DetPostError {
    /// The score buffer length does not match `num_boxes * num_classes`.
    #[error("score buffer holds {got} values, expected num_boxes * num_classes = {expected}")]
    ScoreShapeMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        got: usize,
    },
    /// The box buffer length does not match `num_boxes * 4`.
    #[error("box buffer holds {got} values, expected num_boxes * 4 = {expected}")]
    BoxShapeMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        got: usize,
    },
    /// The class buffer length does not match the box count.
    #[error("class buffer holds {got} values, expected one per box = {expected}")]
    ClassShapeMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        got: usize,
    },
    /// Tensor shape metadata has an unexpected rank or batch size.
    #[error("unsupported tensor shape: {context}")]
    UnsupportedShape {
        /// Which expectation the shape violated.
        context: &'static str,
    },
    /// An index points outside the buffer it refers to.
    #[error("index {index} out of bounds for {context} of length {len}")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Length of the indexed buffer.
        len: usize,
        /// Which buffer was indexed.
        context: &'static str,
    },
    /// The IoU threshold is NaN or outside `[0, 1]`.
    #[error("iou threshold {value} outside [0, 1]")]
    InvalidIouThreshold {
        /// Rejected value.
        value: f32,
    },
    /// The score threshold is NaN.
    #[error("score threshold is NaN")]
    InvalidScoreThreshold,
    /// `max_outputs` is zero.
    #[error("max_outputs must be at least 1")]
    InvalidMaxOutputs,
}
