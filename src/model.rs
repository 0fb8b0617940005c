//! Seam between the pipeline and an external inference engine.

use crate::tensor::RawOutput;

/// An opaque detection model: image in, raw score and box buffers out.
///
/// The pipeline never drives inference itself; a host acquires a model
/// through whatever factory its inference stack provides, runs it, and hands
/// the resulting [`RawOutput`] to
/// [`Pipeline::detect`](crate::pipeline::Pipeline::detect). Implementations
/// must copy both buffers into host memory before returning; the pipeline
/// holds no references into device or backend memory. Inference errors
/// propagate to the host unchanged, and retry policy and deadlines live
/// there too.
pub trait Model {
    /// Preprocessed image representation the model consumes.
    type Input;
    /// Inference failure type.
    type Error;

    /// Runs the model on one image.
    fn infer(&mut self, input: &Self::Input) -> Result<RawOutput, Self::Error>;
}
