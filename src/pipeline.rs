//! Pipeline orchestration: reduce, suppress, map.
//!
//! A `Pipeline` owns nothing but its configuration. Every `detect` call
//! works on buffers owned by that call, so concurrent detections on one
//! `Pipeline` need no synchronization, and a cancelled call leaves nothing
//! to roll back.

use crate::mapper::{map_boxes, Detection, ImageGeometry};
use crate::reduce::{reduce_max_scores, Reduction};
use crate::suppress::{non_max_suppression, non_max_suppression_per_class, SuppressParams};
use crate::tensor::{RawOutput, ScoresView};
use crate::trace::{trace_event, trace_span};
use crate::util::DetPostResult;

/// Whether overlapping boxes of different classes suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuppressionMode {
    /// Suppression ignores class identity; any sufficient overlap removes
    /// the lower-scored box.
    #[default]
    ClassAgnostic,
    /// Only boxes sharing an arg-max class suppress each other.
    PerClass,
}

/// Configuration for a detection pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Maximum number of detections to return.
    pub max_outputs: usize,
    /// IoU at or above which a lower-scored box is suppressed.
    pub iou_threshold: f32,
    /// Minimum score a candidate needs to enter suppression.
    pub score_threshold: f32,
    /// Class handling during suppression.
    pub suppression: SuppressionMode,
    /// Run the score reduction box-parallel (requires the `rayon` feature;
    /// results are identical either way).
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_outputs: 20,
            iou_threshold: 0.5,
            score_threshold: 0.5,
            suppression: SuppressionMode::ClassAgnostic,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    /// Validates the suppression parameters.
    ///
    /// Called by [`Pipeline::with_config`], so an invalid configuration is
    /// rejected before any tensor is touched.
    pub fn validate(&self) -> DetPostResult<()> {
        self.suppress_params().validate()
    }

    pub(crate) fn suppress_params(&self) -> SuppressParams {
        SuppressParams {
            max_outputs: self.max_outputs,
            iou_threshold: self.iou_threshold,
            score_threshold: self.score_threshold,
        }
    }
}

/// Stateless detection post-processor.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    cfg: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with the default configuration
    /// (20 outputs, IoU 0.5, score 0.5, class-agnostic).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline after validating `cfg`.
    pub fn with_config(cfg: PipelineConfig) -> DetPostResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Runs reduce, suppress, map over one model output.
    ///
    /// Deterministic and idempotent: the same output and geometry always
    /// yield the same detection sequence, ordered by NMS selection
    /// (descending score modulo overlap removals). Zero candidate boxes, or
    /// none at or above the score threshold, yield an empty vector.
    pub fn detect(
        &self,
        output: &RawOutput,
        geometry: ImageGeometry,
    ) -> DetPostResult<Vec<Detection>> {
        let _span = trace_span!(
            "detect",
            num_boxes = output.num_boxes(),
            num_classes = output.num_classes()
        )
        .entered();

        if output.num_boxes() == 0 {
            return Ok(Vec::new());
        }

        let reduction = self.reduce(output.scores());
        let params = self.cfg.suppress_params();
        let selected = match self.cfg.suppression {
            SuppressionMode::ClassAgnostic => {
                non_max_suppression(output.boxes(), &reduction.max_scores, params)?
            }
            SuppressionMode::PerClass => non_max_suppression_per_class(
                output.boxes(),
                &reduction.max_scores,
                &reduction.classes,
                params,
            )?,
        };
        let detections = map_boxes(
            output.boxes(),
            &reduction.max_scores,
            &reduction.classes,
            &selected,
            geometry,
        )?;

        trace_event!("detections", kept = detections.len());
        Ok(detections)
    }

    fn reduce(&self, scores: ScoresView<'_>) -> Reduction {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return crate::reduce::rayon::reduce_max_scores_par(scores);
        }
        reduce_max_scores(scores)
    }
}
