//! Frames, encoded stills and capture constraints

/// Which way the camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    /// Rear camera, pointing at the sample
    #[default]
    Environment,
    /// Front camera, pointing at the operator
    User,
}

impl Facing {
    /// Media-constraint name
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Environment => "environment",
            Facing::User => "user",
        }
    }

    /// Parse a facing mode (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "environment" | "rear" | "back" => Some(Facing::Environment),
            "user" | "front" => Some(Facing::User),
            _ => None,
        }
    }
}

/// What to ask the video source for when acquiring it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Preferred facing
    pub facing: Facing,
    /// Ideal frame width in pixels
    pub ideal_width: u32,
    /// Ideal frame height in pixels
    pub ideal_height: u32,
    /// JPEG quality factor for stills (1..=100)
    pub jpeg_quality: u8,
}

impl CaptureConstraints {
    /// Validate the constraints
    pub fn validate(&self) -> Result<(), String> {
        if self.ideal_width == 0 || self.ideal_height == 0 {
            return Err("ideal resolution must be non-zero".to_string());
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!(
                "jpeg_quality {} out of range [1, 100]",
                self.jpeg_quality
            ));
        }
        Ok(())
    }
}

impl Default for CaptureConstraints {
    /// Rear camera at 1920x1080, stills at quality 85
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            ideal_width: 1920,
            ideal_height: 1080,
            jpeg_quality: 85,
        }
    }
}

/// A raw RGB8 frame taken from a live video source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Packed RGB bytes, row-major, `width * height * 3` long
    pub rgb: Vec<u8>,
}

impl Frame {
    /// Create a frame, checking the buffer length against the dimensions
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 {
            return Err("frame dimensions must be non-zero".to_string());
        }
        if rgb.len() != expected {
            return Err(format!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                rgb.len(),
                expected,
                width,
                height
            ));
        }
        Ok(Self { width, height, rgb })
    }
}

/// A lossy-compressed still ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type of `bytes` (e.g. "image/jpeg")
    pub mime_type: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wrap JPEG bytes
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            bytes,
        }
    }

    /// Size of the encoded payload
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
