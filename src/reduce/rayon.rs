//! Rayon-parallel score reduction (feature-gated).
//!
//! Boxes are reduced independently, so the parallel variant returns results
//! bit-identical to [`reduce_max_scores`](super::reduce_max_scores); only the
//! order in which rows are visited changes.

use rayon::prelude::*;

use super::{reduce_row, Reduction, NO_CLASS};
use crate::tensor::ScoresView;

/// Box-parallel max/arg-max reduction.
pub fn reduce_max_scores_par(scores: ScoresView<'_>) -> Reduction {
    let num_boxes = scores.num_boxes();
    if scores.num_classes() == 0 {
        return Reduction {
            max_scores: vec![f32::MIN; num_boxes],
            classes: vec![NO_CLASS; num_boxes],
        };
    }

    let (max_scores, classes) = scores
        .as_slice()
        .par_chunks_exact(scores.num_classes())
        .map(reduce_row)
        .unzip();
    Reduction {
        max_scores,
        classes,
    }
}
