//! Still-frame capture and conversion of the captured data URL into a
//! multipart upload.

use crate::app_lib::transport::UploadPayload;
use base64ct::{Base64, Encoding};
use thiserror::Error;

pub const CAPTURE_MIME: &str = "image/jpeg";
pub const DEFAULT_FILENAME: &str = "image.jpg";
pub const UPLOAD_FIELD: &str = "image";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("video has no frame to capture")]
    NoFrame,
    #[error("malformed image data URL: {0}")]
    MalformedDataUrl(&'static str),
    #[error("failed to decode image data: {0}")]
    Decode(String),
    #[error("browser capture failed: {0}")]
    Browser(String),
}

/// A compressed frame as a `data:<mime>;base64,<payload>` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame(String);

impl CapturedFrame {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn data_url(&self) -> &str {
        &self.0
    }

    fn split(&self) -> Result<(&str, &str), CaptureError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or(CaptureError::MalformedDataUrl("missing data: prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(CaptureError::MalformedDataUrl("missing payload separator"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(CaptureError::MalformedDataUrl("payload is not base64"))?;
        Ok((mime, payload))
    }
}

/// Builds the `image` upload field from a captured frame.
pub fn image_to_form_data(
    frame: &CapturedFrame,
    filename: &str,
) -> Result<UploadPayload, CaptureError> {
    let (mime, payload) = frame.split()?;
    let bytes =
        Base64::decode_vec(payload.trim()).map_err(|err| CaptureError::Decode(err.to_string()))?;
    if bytes.is_empty() {
        return Err(CaptureError::NoFrame);
    }

    Ok(UploadPayload {
        field: UPLOAD_FIELD.to_string(),
        filename: if filename.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            filename.to_string()
        },
        mime: if mime.is_empty() {
            CAPTURE_MIME.to_string()
        } else {
            mime.to_string()
        },
        bytes,
    })
}

#[cfg(target_arch = "wasm32")]
pub use browser::capture_image_from_video;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{CAPTURE_MIME, CaptureError, CapturedFrame};
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

    fn browser_err(context: &'static str) -> impl Fn(JsValue) -> CaptureError {
        move |_| CaptureError::Browser(context.to_string())
    }

    /// Draws the current video frame at its native resolution, mirrored
    /// horizontally when `flip` is set, and encodes it as JPEG.
    pub fn capture_image_from_video(
        video: &HtmlVideoElement,
        flip: bool,
    ) -> Result<CapturedFrame, CaptureError> {
        let width = video.video_width();
        let height = video.video_height();
        if width == 0 || height == 0 {
            return Err(CaptureError::NoFrame);
        }

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| CaptureError::Browser("document unavailable".to_string()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(browser_err("failed to create canvas"))?
            .dyn_into()
            .map_err(|_| CaptureError::Browser("canvas element has wrong type".to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(browser_err("failed to get 2d context"))?
            .ok_or_else(|| CaptureError::Browser("2d context unavailable".to_string()))?
            .dyn_into()
            .map_err(|_| CaptureError::Browser("2d context has wrong type".to_string()))?;

        let (width, height) = (f64::from(width), f64::from(height));
        if flip {
            context
                .translate(width, 0.0)
                .map_err(browser_err("failed to mirror frame"))?;
            context
                .scale(-1.0, 1.0)
                .map_err(browser_err("failed to mirror frame"))?;
        }
        context
            .draw_image_with_html_video_element_and_dw_and_dh(video, 0.0, 0.0, width, height)
            .map_err(browser_err("failed to draw video frame"))?;

        canvas
            .to_data_url_with_type(CAPTURE_MIME)
            .map(CapturedFrame::new)
            .map_err(browser_err("failed to encode frame"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_like() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend((0..1500u32).map(|value| (value % 251) as u8));
        bytes.extend([0xFF, 0xD9]);
        bytes
    }

    #[test]
    fn upload_payload_preserves_image_bytes() {
        let original = jpeg_like();
        let frame = CapturedFrame::new(format!(
            "data:image/jpeg;base64,{}",
            Base64::encode_string(&original)
        ));

        let upload = image_to_form_data(&frame, "capture.jpg").unwrap();

        assert_eq!(upload.bytes.len(), original.len());
        assert_eq!(upload.bytes, original);
        assert_eq!(upload.field, "image");
        assert_eq!(upload.filename, "capture.jpg");
        assert_eq!(upload.mime, "image/jpeg");
    }

    #[test]
    fn empty_filename_uses_default() {
        let frame = CapturedFrame::new("data:image/png;base64,iVBORw0KGgo=");
        let upload = image_to_form_data(&frame, "").unwrap();
        assert_eq!(upload.filename, DEFAULT_FILENAME);
        assert_eq!(upload.mime, "image/png");
    }

    #[test]
    fn rejects_malformed_data_urls() {
        for url in [
            "image/jpeg;base64,AAAA",
            "data:image/jpeg;base64",
            "data:image/jpeg,AAAA",
        ] {
            assert!(matches!(
                image_to_form_data(&CapturedFrame::new(url), DEFAULT_FILENAME),
                Err(CaptureError::MalformedDataUrl(_))
            ));
        }
    }

    #[test]
    fn rejects_invalid_base64_and_empty_frames() {
        assert!(matches!(
            image_to_form_data(
                &CapturedFrame::new("data:image/jpeg;base64,@@@@"),
                DEFAULT_FILENAME
            ),
            Err(CaptureError::Decode(_))
        ));
        assert_eq!(
            image_to_form_data(&CapturedFrame::new("data:image/jpeg;base64,"), DEFAULT_FILENAME),
            Err(CaptureError::NoFrame)
        );
    }
}
