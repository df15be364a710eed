//! End-to-end pipeline scenarios: shape handling, determinism, decoding

mod common;

use std::sync::Arc;

use common::{ConstantModel, SumModel};
use percept::model::LabelTable;
use percept::pipeline::{
    ArgmaxDecoder, ImageAdapter, Pipeline, PreprocessRecipe, RawArrayAdapter, RawBatch,
    TensorSpec, TopLabelDecoder,
};
use percept::PerceptError;

fn batch_pipeline() -> Pipeline<RawArrayAdapter, ArgmaxDecoder> {
    Pipeline::new(
        Arc::new(SumModel { classes: 10 }),
        RawArrayAdapter::new(TensorSpec::default()),
        ArgmaxDecoder,
    )
}

// ============================================================================
// Batch scenarios
// ============================================================================

#[test]
fn test_single_sample_of_zeros_yields_one_prediction() {
    let raw = RawBatch::new(vec![28, 28], vec![0.0; 784]).unwrap();
    let predictions = batch_pipeline().run(&raw).unwrap();
    assert_eq!(predictions.len(), 1);
}

#[test]
fn test_batch_of_five_yields_five_aligned_predictions() {
    // Alternate dark and bright samples: after standardization dark items
    // have a negative pixel sum (class 0 under SumModel), bright items a
    // positive one (class 9).
    let mut data = Vec::with_capacity(5 * 784);
    for i in 0..5 {
        let value = if i % 2 == 0 { 0.0 } else { 255.0 };
        data.extend(std::iter::repeat(value).take(784));
    }
    let raw = RawBatch::new(vec![5, 28, 28], data).unwrap();

    let predictions = batch_pipeline().run(&raw).unwrap();
    assert_eq!(predictions, vec![0, 9, 0, 9, 0]);
}

#[test]
fn test_singleton_channel_batch_is_squeezed() {
    let raw = RawBatch::new(vec![3, 1, 28, 28], vec![0.0; 3 * 784]).unwrap();
    let predictions = batch_pipeline().run(&raw).unwrap();
    assert_eq!(predictions.len(), 3);
}

#[test]
fn test_flattened_input_is_reshaped() {
    let raw = RawBatch::new(vec![2 * 784], vec![0.0; 2 * 784]).unwrap();
    let predictions = batch_pipeline().run(&raw).unwrap();
    assert_eq!(predictions.len(), 2);
}

#[test]
fn test_rank_5_input_is_rejected_with_shape_error() {
    let raw = RawBatch::new(vec![1, 1, 1, 28, 28], vec![0.0; 784]).unwrap();
    let err = batch_pipeline().run(&raw).unwrap_err();
    assert!(matches!(err, PerceptError::Shape { .. }));
    assert!(err.to_string().contains("(N, 1, 28, 28)"));
}

#[test]
fn test_pipeline_is_deterministic() {
    let data: Vec<f32> = (0..784).map(|i| (i % 251) as f32).collect();
    let raw = RawBatch::new(vec![28, 28], data).unwrap();
    let pipeline = batch_pipeline();
    assert_eq!(pipeline.run(&raw).unwrap(), pipeline.run(&raw).unwrap());
}

#[test]
fn test_argmax_ties_break_to_lowest_class() {
    let pipeline = Pipeline::new(
        Arc::new(ConstantModel {
            row: vec![0.5, 0.5, 0.1],
        }),
        RawArrayAdapter::new(TensorSpec::default()),
        ArgmaxDecoder,
    );
    let raw = RawBatch::new(vec![28, 28], vec![0.0; 784]).unwrap();
    assert_eq!(pipeline.run(&raw).unwrap(), vec![0]);
}

// ============================================================================
// Single-image regression fixture
// ============================================================================

#[test]
fn test_single_image_path_matches_reference_tuple() {
    let labels = Arc::new(LabelTable::from_lines(["amber", "basalt", "cobalt"]));
    let pipeline = Pipeline::new(
        Arc::new(ConstantModel {
            row: vec![0.1, 2.0, 0.3],
        }),
        ImageAdapter::new(PreprocessRecipe::default()),
        TopLabelDecoder::new(labels),
    );

    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        64,
        64,
        image::Rgb([200, 30, 100]),
    ));

    let predictions = pipeline.run(&image).unwrap();
    assert_eq!(predictions.len(), 1);
    let top = &predictions[0];

    // softmax([0.1, 2.0, 0.3])[1] = 1 / (e^-1.9 + 1 + e^-1.7)
    assert_eq!(top.class_id, 1);
    assert_eq!(top.class_name, "basalt");
    assert!((top.score - 0.750_608_7).abs() < 1e-5);
}
