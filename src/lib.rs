//! Detpost turns raw object-detection model output into pixel-space
//! detections.
//!
//! The crate covers the post-processing half of a detector: given per-box
//! class scores and normalized corner boxes for one image, it reduces each
//! box to its best class, removes overlapping duplicates with greedy
//! non-maximum suppression, and denormalizes the survivors into ordered
//! pixel-space [`Detection`] records. Inference, label vocabularies, and
//! rendering belong to the host; optional parallelism is available via the
//! `rayon` feature and box overlays via the `overlay` feature.

pub mod lowlevel;
pub mod mapper;
pub mod model;
#[cfg(feature = "overlay")]
pub mod overlay;
pub mod pipeline;
pub mod reduce;
pub mod suppress;
pub mod tensor;
mod trace;
pub mod util;

pub use mapper::{map_boxes, BBox, Detection, ImageGeometry};
pub use model::Model;
pub use pipeline::{Pipeline, PipelineConfig, SuppressionMode};
pub use reduce::{reduce_max_scores, Reduction};
pub use suppress::{iou, non_max_suppression, non_max_suppression_per_class, SuppressParams};
pub use tensor::{BoxesView, Corners, RawOutput, ScoresView};
pub use util::{DetPostError, DetPostResult};
