use crate::camera::guard::{CameraHandle, ResourceGuard};
use crate::error::camera::CameraError;

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use log::debug;
use zeroize::{Zeroize, Zeroizing};

const JPEG_MIME_TYPE: &str = "image/jpeg";

/// One encoded still image, alive for a single outbound request.
///
/// Bytes are wiped on drop. Neither `Clone` nor `Serialize`; `Debug` never
/// prints pixel data.
pub struct CapturedFrame {
    bytes: Zeroizing<Vec<u8>>,
    width: u32,
    height: u32,
}

impl CapturedFrame {
    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the frame into a `data:` URI. The encoded copy is wiped on drop too.
    pub fn into_data_uri(self) -> Zeroizing<String> {
        let prefix = format!("data:{};base64,", JPEG_MIME_TYPE);
        let encoded_len = base64::encoded_len(self.bytes.len(), true).unwrap_or_default();

        let mut uri = Zeroizing::new(String::with_capacity(prefix.len() + encoded_len));
        uri.push_str(&prefix);
        BASE64_STANDARD.encode_string(self.bytes.as_slice(), &mut *uri);
        uri
    }
}

impl fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CapturedFrame({}x{}, {} bytes [REDACTED])",
            self.width,
            self.height,
            self.bytes.len()
        )
    }
}

/// Grabs a single frame from the live stream and JPEG-encodes it in memory.
#[derive(Debug, Clone, Copy)]
pub struct CaptureService {
    jpeg_quality: u8,
}

impl CaptureService {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// # Errors
    ///
    /// [`CameraError::CaptureUnready`] if `handle` is not live or the stream
    /// has no dimensions yet, [`CameraError::Encode`] if JPEG encoding fails.
    pub fn capture_frame(
        &self,
        guard: &ResourceGuard,
        handle: &CameraHandle,
    ) -> Result<CapturedFrame, CameraError> {
        let stream = guard.stream_for(handle).ok_or_else(|| {
            CameraError::capture_unready(format!("{handle:?} does not own the live stream"))
        })?;

        match stream.video_dimensions() {
            Some((width, height)) if width > 0 && height > 0 => {}
            _ => {
                return Err(CameraError::capture_unready(
                    "Video stream has not reported its dimensions",
                ));
            }
        }

        let frame = stream.current_frame()?;
        let (width, height) = frame.dimensions();
        let encoded = self.encode_jpeg(&frame);

        let mut raw = frame.into_raw();
        raw.zeroize();

        let bytes = encoded?;
        debug!("Captured {}x{} frame ({} bytes)", width, height, bytes.len());

        Ok(CapturedFrame {
            bytes,
            width,
            height,
        })
    }

    fn encode_jpeg(&self, frame: &RgbImage) -> Result<Zeroizing<Vec<u8>>, CameraError> {
        let mut bytes = Zeroizing::new(Vec::new());
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut *bytes, self.jpeg_quality);
            encoder
                .encode_image(frame)
                .map_err(|e| CameraError::encode(e.to_string()))?;
        }
        Ok(bytes)
    }
}
