pub mod cpu;

use image::DynamicImage;
use ndarray::{Array4, ArrayView4};

pub use cpu::CpuPreProcessor;

/// Width and height every classifier expects.
pub const INPUT_SIZE: (u32, u32) = (224, 224);

/// Model input: `[1, height, width, 3]` with values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor(Array4<f32>);

impl ImageTensor {
    pub fn from_array(array: Array4<f32>) -> Self {
        Self(array)
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.0.view()
    }
}

/// Trait for image preprocessing implementations
pub trait Preprocess {
    /// Turn a decoded image of any size and pixel format into model input
    fn preprocess(&mut self, image: &DynamicImage) -> anyhow::Result<ImageTensor>;
}

/// Convert, resize and scale `image` into a 224x224 RGB tensor.
///
/// Fails only for images without pixels; decoding errors are the caller's.
pub fn normalize(image: &DynamicImage) -> anyhow::Result<ImageTensor> {
    CpuPreProcessor::default().preprocess(image)
}
