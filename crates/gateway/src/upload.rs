use axum::{
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use image::{DynamicImage, ImageFormat};
use schema::{ClassLabel, LabelError};
use thiserror::Error;

const IMAGE_FIELD: &str = "image";
const EXPECTED_LABEL_FIELD: &str = "expected_label";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No image was uploaded")]
    MissingImage,

    #[error("Unsupported image type ({0}); upload a PNG or JPEG file")]
    UnsupportedFormat(String),

    #[error("Image could not be decoded: {0}")]
    Undecodable(#[source] image::ImageError),

    #[error("Upload is larger than the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Unknown expected label: {0}")]
    UnknownLabel(#[from] LabelError),

    #[error("Malformed upload: {0}")]
    Malformed(String),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::MissingImage
            | UploadError::Undecodable(_)
            | UploadError::UnknownLabel(_)
            | UploadError::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn from_multipart(err: MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge { limit }
        } else {
            UploadError::Malformed(err.body_text())
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Rejected upload");
        (self.status(), self.to_string()).into_response()
    }
}

/// Fields of the classification form.
#[derive(Debug)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub expected: Option<ClassLabel>,
}

impl Upload {
    /// Drain the multipart body. Unknown fields are ignored.
    pub async fn read(mut multipart: Multipart, limit: usize) -> Result<Self, UploadError> {
        let mut bytes = None;
        let mut expected = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::from_multipart(e, limit))?
        {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(IMAGE_FIELD) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| UploadError::from_multipart(e, limit))?;
                    bytes = Some(data.to_vec());
                }
                Some(EXPECTED_LABEL_FIELD) => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| UploadError::from_multipart(e, limit))?;
                    if !text.trim().is_empty() {
                        expected = Some(text.parse::<ClassLabel>()?);
                    }
                }
                _ => {}
            }
        }

        match bytes {
            Some(bytes) if !bytes.is_empty() => Ok(Self { bytes, expected }),
            _ => Err(UploadError::MissingImage),
        }
    }
}

/// Decode an uploaded PNG or JPEG, sniffing the format from its contents.
pub fn decode_image(bytes: &[u8]) -> Result<(ImageFormat, DynamicImage), UploadError> {
    let format = image::guess_format(bytes)
        .map_err(|_| UploadError::UnsupportedFormat("unknown".to_string()))?;

    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(UploadError::UnsupportedFormat(
            format.to_mime_type().to_string(),
        ));
    }

    let image =
        image::load_from_memory_with_format(bytes, format).map_err(UploadError::Undecodable)?;

    Ok((format, image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbaImage};
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decodes_png_and_jpeg() {
        let png = encode(DynamicImage::ImageRgba8(RgbaImage::new(4, 3)), ImageFormat::Png);
        let jpeg = encode(
            DynamicImage::ImageLuma8(GrayImage::new(5, 2)),
            ImageFormat::Jpeg,
        );

        let (format, image) = decode_image(&png).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!((image.width(), image.height()), (4, 3));

        let (format, image) = decode_image(&jpeg).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!((image.width(), image.height()), (5, 2));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let err = decode_image(b"definitely not an image").unwrap_err();

        assert!(matches!(err, UploadError::UnsupportedFormat(_)));
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_rejects_other_image_formats() {
        // GIF signature
        let err = decode_image(b"GIF89a\x01\x00\x01\x00").unwrap_err();

        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().contains("image/gif"));
    }

    #[test]
    fn test_truncated_png_is_bad_request() {
        let mut png = encode(DynamicImage::ImageRgb8(image::RgbImage::new(8, 8)), ImageFormat::Png);
        png.truncate(20);

        let err = decode_image(&png).unwrap_err();

        assert!(matches!(err, UploadError::Undecodable(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
