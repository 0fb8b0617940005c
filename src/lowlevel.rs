//! Low-level building blocks for custom detection pipelines.
//!
//! These re-exports expose the individual stages and raw views for hosts
//! that need to interleave their own logic between reduction, suppression,
//! and mapping. Most users should prefer the top-level [`Pipeline`] type.
//!
//! [`Pipeline`]: crate::pipeline::Pipeline

pub use crate::mapper::map_boxes;
#[cfg(feature = "rayon")]
pub use crate::reduce::rayon::reduce_max_scores_par;
pub use crate::reduce::{reduce_max_scores, Reduction, NO_CLASS};
pub use crate::suppress::{
    iou, non_max_suppression, non_max_suppression_per_class, SuppressParams,
};
pub use crate::tensor::{BoxesView, Corners, ScoresView};
