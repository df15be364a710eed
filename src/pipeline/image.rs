//! Encoded-image input normalization
//!
//! Reproduces the single-image classifier's documented preprocessing
//! recipe: convert to RGB, resize the shorter side, center-crop, scale to
//! [0, 1], normalize per channel, and lay the result out as (1, C, H, W).
//! The constants are fixed per model because the class labels are
//! calibrated against this exact recipe.

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::{Array4, ArrayD};

use super::InputAdapter;
use crate::error::Result;

/// Preprocessing recipe for the single-image classifier
#[derive(Debug, Clone, Copy)]
pub struct PreprocessRecipe {
    /// Target length of the shorter side before cropping
    pub resize_to: u32,
    /// Side length of the center crop
    pub crop: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for PreprocessRecipe {
    /// The ImageNet-calibrated recipe the classifier was trained with
    fn default() -> Self {
        Self {
            resize_to: 256,
            crop: 224,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Input adapter for decoded images
#[derive(Debug, Clone)]
pub struct ImageAdapter {
    recipe: PreprocessRecipe,
}

impl ImageAdapter {
    pub fn new(recipe: PreprocessRecipe) -> Self {
        Self { recipe }
    }
}

impl InputAdapter for ImageAdapter {
    type Raw = DynamicImage;

    fn adapt(&self, raw: &DynamicImage) -> Result<ArrayD<f32>> {
        let recipe = &self.recipe;
        let rgb = raw.to_rgb8();
        let (width, height) = rgb.dimensions();

        // Resize so the shorter side lands exactly on `resize_to`
        let scale = recipe.resize_to as f32 / width.min(height) as f32;
        let new_width = ((width as f32 * scale).round() as u32).max(recipe.resize_to);
        let new_height = ((height as f32 * scale).round() as u32).max(recipe.resize_to);
        let resized = image::imageops::resize(&rgb, new_width, new_height, FilterType::Triangle);

        let x0 = (new_width - recipe.crop) / 2;
        let y0 = (new_height - recipe.crop) / 2;
        let cropped =
            image::imageops::crop_imm(&resized, x0, y0, recipe.crop, recipe.crop).to_image();

        let side = recipe.crop as usize;
        let tensor = Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
            let value = cropped.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
            (value - recipe.mean[c]) / recipe.std[c]
        });

        Ok(tensor.into_dyn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_output_shape_is_canonical() {
        let adapter = ImageAdapter::new(PreprocessRecipe::default());
        let tensor = adapter.adapt(&gradient_image(640, 480)).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_small_images_are_upscaled_before_cropping() {
        let adapter = ImageAdapter::new(PreprocessRecipe::default());
        let tensor = adapter.adapt(&gradient_image(100, 80)).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocessing_is_deterministic() {
        let adapter = ImageAdapter::new(PreprocessRecipe::default());
        let image = gradient_image(320, 240);
        let first = adapter.adapt(&image).unwrap();
        let second = adapter.adapt(&image).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_channel_normalization_applied() {
        let adapter = ImageAdapter::new(PreprocessRecipe::default());
        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([0, 0, 0])));
        let tensor = adapter.adapt(&black).unwrap();
        let recipe = PreprocessRecipe::default();
        for c in 0..3 {
            let expected = (0.0 - recipe.mean[c]) / recipe.std[c];
            assert!((tensor[[0, c, 0, 0]] - expected).abs() < 1e-6);
        }
    }
}
