use crate::{INPUT_SIZE, ImageTensor, Preprocess};
use common::{span, span_debug};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

/// Stretches the whole image onto the model input, no cropping or padding.
pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
    resizer: Resizer,
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self {
            input_size,
            resizer: Resizer::new(),
        }
    }

    fn resize(&mut self, rgb: &RgbImage) -> anyhow::Result<Image<'static>> {
        let _s = span_debug!("resize");

        let (width, height) = rgb.dimensions();
        let src = ImageRef::new(width, height, rgb.as_raw(), PixelType::U8x3)?;

        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        // Bicubic (Catmull-Rom), same resampling as at training time
        self.resizer.resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
        )?;

        Ok(resized)
    }

    fn normalize(&self, image: &Image) -> anyhow::Result<ImageTensor> {
        let _s = span_debug!("normalize");

        let width = image.width() as usize;
        let height = image.height() as usize;

        // HWC byte order already matches NHWC with a batch of one
        let values: Vec<f32> = image.buffer().iter().map(|&v| v as f32 / 255.0).collect();

        let array = Array4::from_shape_vec((1, height, width, 3), values)?;
        Ok(ImageTensor::from_array(array))
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(INPUT_SIZE)
    }
}

impl Preprocess for CpuPreProcessor {
    fn preprocess(&mut self, image: &DynamicImage) -> anyhow::Result<ImageTensor> {
        let _s = span!("preprocess_image");

        if image.width() == 0 || image.height() == 0 {
            anyhow::bail!(
                "Image has no pixels ({}x{})",
                image.width(),
                image.height()
            );
        }

        tracing::trace!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Preprocessing image"
        );

        // Drops alpha and expands grayscale; no-op copy for RGB8 input
        let rgb = image.to_rgb8();
        let resized = self.resize(&rgb)?;
        self.normalize(&resized)
    }
}
