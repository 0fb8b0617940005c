use detpost::{
    DetPostError, ImageGeometry, Pipeline, PipelineConfig, RawOutput, SuppressionMode,
};

fn geometry(width: u32, height: u32) -> ImageGeometry {
    ImageGeometry { width, height }
}

/// Two boxes, two classes, heavy overlap: the higher-scoring box wins and
/// the lower one is suppressed.
#[test]
fn pipeline_keeps_best_of_overlapping_pair() {
    let scores = vec![0.9, 0.1, 0.05, 0.95];
    let boxes = vec![0.0, 0.0, 0.5, 0.5, 0.05, 0.05, 0.55, 0.55];
    let output = RawOutput::new(scores, boxes, 2, 2).unwrap();

    let pipeline = Pipeline::new();
    let detections = pipeline.detect(&output, geometry(100, 100)).unwrap();

    assert_eq!(detections.len(), 1);
    let best = &detections[0];
    assert_eq!(best.class_index, 1);
    assert_eq!(best.score, 0.95);
    assert!((best.bbox.x - 5.0).abs() < 1e-3);
    assert!((best.bbox.y - 5.0).abs() < 1e-3);
    assert!((best.bbox.width - 50.0).abs() < 1e-3);
    assert!((best.bbox.height - 50.0).abs() < 1e-3);
}

#[test]
fn pipeline_maps_corners_into_pixel_space() {
    // (min_y, min_x, max_y, max_x) = (0.2, 0.1, 0.6, 0.5) on a 200x100
    // canvas must come out as x=20, y=20, width=80, height=40.
    let output = RawOutput::new(vec![0.9], vec![0.2, 0.1, 0.6, 0.5], 1, 1).unwrap();
    let detections = Pipeline::new().detect(&output, geometry(200, 100)).unwrap();

    assert_eq!(detections.len(), 1);
    let bbox = detections[0].bbox;
    assert!((bbox.x - 20.0).abs() < 1e-3);
    assert!((bbox.y - 20.0).abs() < 1e-3);
    assert!((bbox.width - 80.0).abs() < 1e-3);
    assert!((bbox.height - 40.0).abs() < 1e-3);
}

#[test]
fn pipeline_is_deterministic_across_calls() {
    let scores = vec![0.9, 0.6, 0.55, 0.7, 0.8, 0.51];
    let boxes = vec![
        0.0, 0.0, 0.3, 0.3, //
        0.4, 0.4, 0.7, 0.7, //
        0.1, 0.6, 0.4, 0.9,
    ];
    let output = RawOutput::new(scores, boxes, 3, 2).unwrap();
    let pipeline = Pipeline::new();

    let first = pipeline.detect(&output, geometry(640, 480)).unwrap();
    let second = pipeline.detect(&output, geometry(640, 480)).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn pipeline_returns_empty_for_zero_boxes() {
    let output = RawOutput::new(Vec::new(), Vec::new(), 0, 4).unwrap();
    let detections = Pipeline::new().detect(&output, geometry(100, 100)).unwrap();
    assert!(detections.is_empty());
}

#[test]
fn pipeline_returns_empty_below_score_threshold() {
    let output = RawOutput::new(vec![0.2, 0.3], vec![0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0], 2, 1)
        .unwrap();
    let detections = Pipeline::new().detect(&output, geometry(100, 100)).unwrap();
    assert!(detections.is_empty());
}

#[test]
fn pipeline_returns_empty_for_zero_classes() {
    // Zero classes reduce to the sentinel score, which the default score
    // threshold filters out.
    let output = RawOutput::new(Vec::new(), vec![0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0], 2, 0)
        .unwrap();
    let detections = Pipeline::new().detect(&output, geometry(100, 100)).unwrap();
    assert!(detections.is_empty());
}

#[test]
fn pipeline_caps_detections_at_max_outputs() {
    // Four disjoint boxes above threshold, capped to two.
    let scores = vec![0.9, 0.8, 0.7, 0.6];
    let boxes = vec![
        0.0, 0.0, 0.2, 0.2, //
        0.3, 0.3, 0.5, 0.5, //
        0.6, 0.6, 0.8, 0.8, //
        0.0, 0.8, 0.2, 1.0,
    ];
    let output = RawOutput::new(scores, boxes, 4, 1).unwrap();

    let pipeline = Pipeline::with_config(PipelineConfig {
        max_outputs: 2,
        ..PipelineConfig::default()
    })
    .unwrap();
    let detections = pipeline.detect(&output, geometry(100, 100)).unwrap();

    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].score, 0.9);
    assert_eq!(detections[1].score, 0.8);
}

#[test]
fn per_class_mode_keeps_overlapping_boxes_of_distinct_classes() {
    // Same overlapping pair as above, but the boxes arg-max to different
    // classes.
    let scores = vec![0.9, 0.1, 0.05, 0.95];
    let boxes = vec![0.0, 0.0, 0.5, 0.5, 0.05, 0.05, 0.55, 0.55];
    let output = RawOutput::new(scores, boxes, 2, 2).unwrap();

    let agnostic = Pipeline::new().detect(&output, geometry(100, 100)).unwrap();
    assert_eq!(agnostic.len(), 1);

    let per_class = Pipeline::with_config(PipelineConfig {
        suppression: SuppressionMode::PerClass,
        ..PipelineConfig::default()
    })
    .unwrap();
    let detections = per_class.detect(&output, geometry(100, 100)).unwrap();
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].class_index, 1);
    assert_eq!(detections[1].class_index, 0);
}

#[test]
fn pipeline_accepts_shaped_model_output() {
    let output = RawOutput::from_shaped(
        vec![0.9, 0.1, 0.05, 0.95],
        &[1, 2, 2],
        vec![0.0, 0.0, 0.5, 0.5, 0.05, 0.05, 0.55, 0.55],
        &[1, 2, 1, 4],
    )
    .unwrap();
    let detections = Pipeline::new().detect(&output, geometry(100, 100)).unwrap();
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].class_index, 1);
}

#[test]
fn config_rejects_out_of_range_iou_threshold() {
    let err = Pipeline::with_config(PipelineConfig {
        iou_threshold: 1.5,
        ..PipelineConfig::default()
    })
    .err()
    .unwrap();
    assert_eq!(err, DetPostError::InvalidIouThreshold { value: 1.5 });
}

#[test]
fn config_rejects_nan_thresholds() {
    let err = Pipeline::with_config(PipelineConfig {
        score_threshold: f32::NAN,
        ..PipelineConfig::default()
    })
    .err()
    .unwrap();
    assert_eq!(err, DetPostError::InvalidScoreThreshold);

    let err = Pipeline::with_config(PipelineConfig {
        iou_threshold: f32::NAN,
        ..PipelineConfig::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, DetPostError::InvalidIouThreshold { .. }));
}

#[test]
fn config_rejects_zero_max_outputs() {
    let err = Pipeline::with_config(PipelineConfig {
        max_outputs: 0,
        ..PipelineConfig::default()
    })
    .err()
    .unwrap();
    assert_eq!(err, DetPostError::InvalidMaxOutputs);
}

#[test]
fn negative_score_threshold_admits_every_box() {
    let output = RawOutput::new(vec![0.1, 0.05], vec![0.0, 0.0, 0.2, 0.2, 0.5, 0.5, 0.9, 0.9], 2, 1)
        .unwrap();
    let pipeline = Pipeline::with_config(PipelineConfig {
        score_threshold: -1.0,
        ..PipelineConfig::default()
    })
    .unwrap();
    let detections = pipeline.detect(&output, geometry(100, 100)).unwrap();
    assert_eq!(detections.len(), 2);
}
