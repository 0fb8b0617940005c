use criterion::{criterion_group, criterion_main, Criterion};
use detpost::lowlevel::{non_max_suppression, reduce_max_scores, SuppressParams};
use detpost::{BoxesView, ImageGeometry, Pipeline, RawOutput, ScoresView};
use std::hint::black_box;

// SSD-MobileNet-sized output: 1917 candidate boxes, 90 classes.
const NUM_BOXES: usize = 1917;
const NUM_CLASSES: usize = 90;

fn make_scores(num_boxes: usize, num_classes: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(num_boxes * num_classes);
    for i in 0..num_boxes {
        for j in 0..num_classes {
            let value = ((i * 13) ^ (j * 7) ^ (i * j)) % 1000;
            data.push(value as f32 / 1000.0);
        }
    }
    data
}

fn make_boxes(num_boxes: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(num_boxes * 4);
    for i in 0..num_boxes {
        let min_y = ((i * 37) % 800) as f32 / 1000.0;
        let min_x = ((i * 53) % 800) as f32 / 1000.0;
        let height = (((i * 11) % 150) + 50) as f32 / 1000.0;
        let width = (((i * 17) % 150) + 50) as f32 / 1000.0;
        data.extend_from_slice(&[min_y, min_x, min_y + height, min_x + width]);
    }
    data
}

fn bench_reduce(c: &mut Criterion) {
    let scores = make_scores(NUM_BOXES, NUM_CLASSES);
    let view = ScoresView::from_slice(&scores, NUM_BOXES, NUM_CLASSES).unwrap();

    c.bench_function("reduce_max_scores", |b| {
        b.iter(|| reduce_max_scores(black_box(view)))
    });
}

fn bench_suppress(c: &mut Criterion) {
    let scores = make_scores(NUM_BOXES, NUM_CLASSES);
    let boxes = make_boxes(NUM_BOXES);
    let score_view = ScoresView::from_slice(&scores, NUM_BOXES, NUM_CLASSES).unwrap();
    let box_view = BoxesView::from_slice(&boxes, NUM_BOXES).unwrap();
    let reduction = reduce_max_scores(score_view);

    c.bench_function("non_max_suppression", |b| {
        b.iter(|| {
            non_max_suppression(
                black_box(box_view),
                black_box(&reduction.max_scores),
                SuppressParams::default(),
            )
        })
    });
}

fn bench_detect(c: &mut Criterion) {
    let output = RawOutput::new(
        make_scores(NUM_BOXES, NUM_CLASSES),
        make_boxes(NUM_BOXES),
        NUM_BOXES,
        NUM_CLASSES,
    )
    .unwrap();
    let geometry = ImageGeometry {
        width: 640,
        height: 480,
    };
    let pipeline = Pipeline::new();

    c.bench_function("pipeline_detect", |b| {
        b.iter(|| pipeline.detect(black_box(&output), black_box(geometry)))
    });
}

criterion_group!(benches, bench_reduce, bench_suppress, bench_detect);
criterion_main!(benches);
