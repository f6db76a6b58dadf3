//! Image preprocessing for the breed classifier.
//!
//! Decodes any format the `image` crate can sniff, converts to RGB, resizes
//! to 224x224 with nearest-neighbour sampling (aspect ratio is not kept) and
//! scales channels to [0, 1]. The tensor layout is channels-last,
//! `[1, 224, 224, 3]`.

use image::DynamicImage;
use image::imageops::FilterType;

use crate::ClassifyError;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 224;

/// Flat `f32` tensor with its NHWC shape.
#[derive(Debug, Clone)]
pub struct ImageTensor {
    pub shape: [usize; 4],
    pub data: Vec<f32>,
}

/// Decode raw bytes and convert them to a model input tensor.
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor, ClassifyError> {
    let image = image::load_from_memory(bytes)?;
    Ok(to_input_tensor(&image))
}

/// Resize and normalise an already decoded image.
pub fn to_input_tensor(image: &DynamicImage) -> ImageTensor {
    let rgb = image
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
        .to_rgb8();

    let data: Vec<f32> = rgb.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();

    ImageTensor {
        shape: [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3],
        data,
    }
}
