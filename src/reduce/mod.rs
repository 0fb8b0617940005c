//! Max/arg-max reduction over the class axis.
//!
//! Each candidate box carries one score per class; suppression only needs the
//! best class and its score. The reduction is a pure function of its input,
//! O(boxes * classes), and boxes are independent of each other, which is what
//! the feature-gated parallel variant in [`rayon`] exploits.

use crate::tensor::ScoresView;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Class index reported when a box has no classes to reduce over.
pub const NO_CLASS: i32 = -1;

/// Per-box reduction result: best score and the class attaining it.
#[derive(Clone, Debug, PartialEq)]
pub struct Reduction {
    /// Maximum class score per box.
    pub max_scores: Vec<f32>,
    /// Arg-max class per box; [`NO_CLASS`] when `num_classes == 0`.
    pub classes: Vec<i32>,
}

/// Reduces each box's class-score row to its maximum and arg-max.
///
/// Ties go to the lower class index: a later class only replaces the
/// incumbent on a strictly greater score. With zero classes every box gets
/// the sentinel class [`NO_CLASS`] and `f32::MIN` as its score, which any
/// non-degenerate score threshold then filters out.
pub fn reduce_max_scores(scores: ScoresView<'_>) -> Reduction {
    let num_boxes = scores.num_boxes();
    if scores.num_classes() == 0 {
        return Reduction {
            max_scores: vec![f32::MIN; num_boxes],
            classes: vec![NO_CLASS; num_boxes],
        };
    }

    let mut max_scores = Vec::with_capacity(num_boxes);
    let mut classes = Vec::with_capacity(num_boxes);
    for row in scores.as_slice().chunks_exact(scores.num_classes()) {
        let (max, class) = reduce_row(row);
        max_scores.push(max);
        classes.push(class);
    }
    Reduction {
        max_scores,
        classes,
    }
}

pub(crate) fn reduce_row(row: &[f32]) -> (f32, i32) {
    let mut max = f32::MIN;
    let mut class = NO_CLASS;
    for (j, &value) in row.iter().enumerate() {
        if value > max {
            max = value;
            class = j as i32;
        }
    }
    (max, class)
}

#[cfg(test)]
mod tests {
    use super::{reduce_row, NO_CLASS};

    #[test]
    fn reduce_row_picks_first_class_on_ties() {
        assert_eq!(reduce_row(&[0.7, 0.7, 0.2]), (0.7, 0));
        assert_eq!(reduce_row(&[0.1, 0.4, 0.4]), (0.4, 1));
    }

    #[test]
    fn reduce_row_empty_yields_sentinel() {
        assert_eq!(reduce_row(&[]), (f32::MIN, NO_CLASS));
    }

    #[test]
    fn reduce_row_all_nan_yields_sentinel() {
        let (max, class) = reduce_row(&[f32::NAN, f32::NAN]);
        assert_eq!(max, f32::MIN);
        assert_eq!(class, NO_CLASS);
    }
}
