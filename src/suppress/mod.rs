//! Greedy non-maximum suppression over scored candidate boxes.
//!
//! Candidates at or above the score threshold are ranked by descending score
//! (ties broken by ascending original index, so repeated runs are
//! deterministic) and accepted greedily: a candidate survives only if its IoU
//! with every already-accepted box stays below the threshold. Selection stops
//! once `max_outputs` boxes are kept.
//!
//! Suppression runs on host-resident slices; it never inspects class scores,
//! only the reduced per-box maximum. The per-class variant restricts
//! suppression to boxes of the same class.

use crate::tensor::{BoxesView, Corners};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetPostError, DetPostResult};

/// Thresholds and output cap for one suppression run.
#[derive(Clone, Copy, Debug)]
pub struct SuppressParams {
    /// Maximum number of boxes to keep.
    pub max_outputs: usize,
    /// Overlap at or above this IoU suppresses the lower-scored box.
    pub iou_threshold: f32,
    /// Candidates below this score are discarded before ranking.
    pub score_threshold: f32,
}

impl Default for SuppressParams {
    fn default() -> Self {
        Self {
            max_outputs: 20,
            iou_threshold: 0.5,
            score_threshold: 0.5,
        }
    }
}

impl SuppressParams {
    /// Rejects parameter values the algorithm cannot work with.
    ///
    /// A NaN score threshold would silently discard every candidate, so it is
    /// an error rather than an empty result.
    pub fn validate(&self) -> DetPostResult<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DetPostError::InvalidIouThreshold {
                value: self.iou_threshold,
            });
        }
        if self.score_threshold.is_nan() {
            return Err(DetPostError::InvalidScoreThreshold);
        }
        if self.max_outputs == 0 {
            return Err(DetPostError::InvalidMaxOutputs);
        }
        Ok(())
    }
}

/// Intersection over union of two corner boxes.
///
/// Areas are clamped at zero, so a degenerate box (zero or negative extent)
/// has zero IoU with everything: it never suppresses another box, though it
/// may still be selected on its own score.
pub fn iou(a: Corners, b: Corners) -> f32 {
    let area_a = (a.max_y - a.min_y).max(0.0) * (a.max_x - a.min_x).max(0.0);
    let area_b = (b.max_y - b.min_y).max(0.0) * (b.max_x - b.min_x).max(0.0);

    let inter_h = (a.max_y.min(b.max_y) - a.min_y.max(b.min_y)).max(0.0);
    let inter_w = (a.max_x.min(b.max_x) - a.min_x.max(b.min_x)).max(0.0);
    let intersection = inter_h * inter_w;

    let union = area_a + area_b - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

/// Class-agnostic greedy NMS.
///
/// Returns the surviving box indices in selection order (descending score
/// modulo the overlap removals). Boxes of different classes suppress each
/// other; use [`non_max_suppression_per_class`] to keep overlapping boxes of
/// distinct classes.
pub fn non_max_suppression(
    boxes: BoxesView<'_>,
    scores: &[f32],
    params: SuppressParams,
) -> DetPostResult<Vec<usize>> {
    params.validate()?;
    if scores.len() != boxes.num_boxes() {
        return Err(DetPostError::ScoreShapeMismatch {
            expected: boxes.num_boxes(),
            got: scores.len(),
        });
    }

    let _span = trace_span!("suppress", num_boxes = boxes.num_boxes()).entered();
    let order = ranked_candidates(scores, params.score_threshold);
    let corners: Vec<Corners> = boxes.iter_corners().collect();
    let kept = greedy_select(&corners, &order, None, params);
    trace_event!("suppress_kept", kept = kept.len());
    Ok(kept)
}

/// Greedy NMS where only boxes of the same class suppress each other.
pub fn non_max_suppression_per_class(
    boxes: BoxesView<'_>,
    scores: &[f32],
    classes: &[i32],
    params: SuppressParams,
) -> DetPostResult<Vec<usize>> {
    params.validate()?;
    if scores.len() != boxes.num_boxes() {
        return Err(DetPostError::ScoreShapeMismatch {
            expected: boxes.num_boxes(),
            got: scores.len(),
        });
    }
    if classes.len() != boxes.num_boxes() {
        return Err(DetPostError::ClassShapeMismatch {
            expected: boxes.num_boxes(),
            got: classes.len(),
        });
    }

    let _span = trace_span!("suppress", num_boxes = boxes.num_boxes(), per_class = true).entered();
    let order = ranked_candidates(scores, params.score_threshold);
    let corners: Vec<Corners> = boxes.iter_corners().collect();
    let kept = greedy_select(&corners, &order, Some(classes), params);
    trace_event!("suppress_kept", kept = kept.len());
    Ok(kept)
}

/// Indices of candidates at or above the threshold, best score first.
///
/// NaN scores fail the threshold comparison and drop out here, so the sort
/// below never sees them.
fn ranked_candidates(scores: &[f32], score_threshold: f32) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len())
        .filter(|&i| scores[i] >= score_threshold)
        .collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then_with(|| a.cmp(&b)));
    order
}

fn greedy_select(
    corners: &[Corners],
    order: &[usize],
    classes: Option<&[i32]>,
    params: SuppressParams,
) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::new();

    'candidates: for &idx in order {
        if kept.len() == params.max_outputs {
            break;
        }
        for &selected in kept.iter() {
            if let Some(classes) = classes {
                if classes[idx] != classes[selected] {
                    continue;
                }
            }
            if iou(corners[idx], corners[selected]) >= params.iou_threshold {
                continue 'candidates;
            }
        }
        kept.push(idx);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::iou;
    use crate::tensor::Corners;

    fn corners(min_y: f32, min_x: f32, max_y: f32, max_x: f32) -> Corners {
        Corners {
            min_y,
            min_x,
            max_y,
            max_x,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = corners(0.0, 0.0, 0.5, 0.5);
        assert!((iou(a, a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = corners(0.0, 0.0, 0.2, 0.2);
        let b = corners(0.5, 0.5, 0.9, 0.9);
        assert_eq!(iou(a, b), 0.0);
    }

    #[test]
    fn iou_matches_hand_computed_overlap() {
        // 0.5x0.5 squares offset by 0.05: intersection 0.45^2, union
        // 2 * 0.25 - 0.2025.
        let a = corners(0.0, 0.0, 0.5, 0.5);
        let b = corners(0.05, 0.05, 0.55, 0.55);
        let expected = 0.2025 / (0.5 - 0.2025);
        assert!((iou(a, b) - expected).abs() < 1e-5);
    }

    #[test]
    fn degenerate_box_has_zero_iou_with_anything() {
        let degenerate = corners(0.3, 0.3, 0.3, 0.3);
        let inverted = corners(0.6, 0.6, 0.1, 0.1);
        let normal = corners(0.0, 0.0, 1.0, 1.0);
        assert_eq!(iou(degenerate, normal), 0.0);
        assert_eq!(iou(inverted, normal), 0.0);
        assert_eq!(iou(degenerate, degenerate), 0.0);
    }
}
