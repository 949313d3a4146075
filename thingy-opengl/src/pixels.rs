use std::path::Path;

/// Layout of a single pixel in a [`PixelBuffer`]. All formats use one byte per channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 channels, blue first. This is what [`PixelBuffer::load`] produces.
    Bgr8,
    Rgb8,
    Bgra8,
    Rgba8,
    Gray8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => 3,
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
    pub fn bytes_per_pixel(self) -> usize {
        self.channels()
    }
    /// The `(internal_format, source_format)` pair for `glTexImage2D`.
    pub fn gl_formats(self) -> (u32, u32) {
        match self {
            PixelFormat::Bgr8 => (glow::RGB, glow::BGR),
            PixelFormat::Rgb8 => (glow::RGB, glow::RGB),
            PixelFormat::Bgra8 => (glow::RGBA, glow::BGRA),
            PixelFormat::Rgba8 => (glow::RGBA, glow::RGBA),
            PixelFormat::Gray8 => (glow::RED, glow::RED),
        }
    }
    /// Depth and channel count, such as `8UC3`.
    pub fn label(self) -> &'static str {
        match self.channels() {
            1 => "8UC1",
            3 => "8UC3",
            _ => "8UC4",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub enum PixelError {
    Decode(image::ImageError),
    StrideTooSmall { stride: usize, row: usize },
    BufferTooSmall { len: usize, needed: usize },
}

impl std::error::Error for PixelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PixelError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for PixelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelError::Decode(e) => write!(f, "cannot decode image: {e}"),
            PixelError::StrideTooSmall { stride, row } => {
                write!(f, "row stride {stride} is shorter than a row of {row} bytes")
            }
            PixelError::BufferTooSmall { len, needed } => {
                write!(f, "pixel buffer has {len} bytes, {needed} needed")
            }
        }
    }
}

impl From<image::ImageError> for PixelError {
    fn from(e: image::ImageError) -> Self {
        PixelError::Decode(e)
    }
}

/// A decoded image in host memory.
///
/// Rows are `stride` bytes apart; only the first `width * bytes_per_pixel` bytes of each row
/// are pixels.
#[derive(Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<PixelBuffer, PixelError> {
        let row = width as usize * format.bytes_per_pixel();
        if stride < row {
            return Err(PixelError::StrideTooSmall { stride, row });
        }
        let needed = stride * height as usize;
        if data.len() < needed {
            return Err(PixelError::BufferTooSmall {
                len: data.len(),
                needed,
            });
        }
        Ok(PixelBuffer {
            width,
            height,
            stride,
            format,
            data,
        })
    }
    /// Like `from_raw` with rows tightly packed.
    pub fn packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<PixelBuffer, PixelError> {
        let stride = width as usize * format.bytes_per_pixel();
        Self::from_raw(width, height, stride, format, data)
    }
    /// Decodes the image file at `path` into a tightly packed `Bgr8` buffer.
    ///
    /// Alpha is discarded and grayscale is expanded to three channels.
    pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer, PixelError> {
        let img = image::open(path)?;
        Ok(Self::from_image(img))
    }
    pub fn from_image(img: image::DynamicImage) -> PixelBuffer {
        let mut rgb = img.into_rgb8();
        let (width, height) = rgb.dimensions();
        for px in rgb.pixels_mut() {
            px.0.swap(0, 2);
        }
        PixelBuffer {
            width,
            height,
            stride: width as usize * 3,
            format: PixelFormat::Bgr8,
            data: rgb.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    /// `[width, height]` in pixels.
    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }
    pub fn stride(&self) -> usize {
        self.stride
    }
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    /// Bytes of pixel data in a row, without padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
