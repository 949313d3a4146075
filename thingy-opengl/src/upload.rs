use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::glr::{self, GlApi, TexImage, Texture};
use crate::pixels::PixelBuffer;

/// The `GL_UNPACK_ALIGNMENT` for rows `stride` bytes apart.
///
/// Any stride that is not a multiple of 4 needs byte alignment, or every row after the first
/// would be read from the wrong offset.
pub fn unpack_alignment(stride: usize) -> i32 {
    if stride & 3 != 0 { 1 } else { 4 }
}

/// Pixel store parameters to read a [`PixelBuffer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnpackLayout {
    pub alignment: i32,
    /// `GL_UNPACK_ROW_LENGTH`, in pixels. 0 means "width".
    pub row_length: i32,
    /// False if GL cannot be told the real stride. The upload will be garbled.
    pub exact: bool,
}

impl UnpackLayout {
    pub fn for_buffer(buffer: &PixelBuffer) -> UnpackLayout {
        let stride = buffer.stride();
        let alignment = unpack_alignment(stride);
        let align = alignment as usize;
        let implied = buffer.row_bytes().div_ceil(align) * align;
        let bpp = buffer.format().bytes_per_pixel();

        // A single row is never skipped over, so its padding does not matter.
        if stride == implied || buffer.height() <= 1 {
            return UnpackLayout {
                alignment,
                row_length: 0,
                exact: true,
            };
        }
        // GL reads rows `align * ceil(row_length * bpp / align)` bytes apart.
        let row_length = stride / bpp;
        if (row_length * bpp).div_ceil(align) * align == stride {
            UnpackLayout {
                alignment,
                row_length: row_length as i32,
                exact: true,
            }
        } else {
            UnpackLayout {
                alignment,
                row_length: 0,
                exact: false,
            }
        }
    }
}

/// Keeps one GL texture filled with the contents of a [`PixelBuffer`].
///
/// The texture is created by the first upload and reused by the following ones.
pub struct TextureUploader<G: GlApi> {
    gl: Rc<G>,
    texture: Option<Texture<G>>,
}

impl<G: GlApi> TextureUploader<G> {
    pub fn new(gl: Rc<G>) -> Self {
        TextureUploader { gl, texture: None }
    }
    /// The current texture, `None` before the first successful upload.
    pub fn texture(&self) -> Option<G::Texture> {
        self.texture.as_ref().map(Texture::id)
    }

    /// Uploads `buffer` into the texture, creating it if needed.
    ///
    /// Returns the time spent binding and uploading. It leaves the texture bound to
    /// `GL_TEXTURE_2D`.
    pub fn try_upload_or_replace(&mut self, buffer: &PixelBuffer) -> glr::Result<Duration> {
        let begin = Instant::now();

        let id = match self.texture() {
            Some(id) => id,
            None => {
                let texture = Texture::generate(&self.gl)?;
                log::debug!("Texture create {:?}", texture.id());
                let id = texture.id();
                self.texture = Some(texture);
                id
            }
        };
        let gl = &*self.gl;
        gl.bind_texture_2d(Some(id));

        let layout = UnpackLayout::for_buffer(buffer);
        if !layout.exact {
            log::warn!(
                "Row stride {} cannot be expressed as a GL unpack layout for {:?}",
                buffer.stride(),
                buffer
            );
        }
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, layout.alignment);
        gl.pixel_store_i32(glow::UNPACK_ROW_LENGTH, layout.row_length);

        gl.tex_parameter_i32(glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

        let (internal_format, format) = buffer.format().gl_formats();
        // The last row may be shorter than `stride`, GL does not read past its pixels.
        let len = match buffer.height() {
            0 => 0,
            h => buffer.stride() * (h as usize - 1) + buffer.row_bytes(),
        };
        gl.tex_image_2d(&TexImage {
            internal_format,
            width: buffer.width() as i32,
            height: buffer.height() as i32,
            format,
            ty: glow::UNSIGNED_BYTE,
            pixels: &buffer.data()[..len],
        });
        if layout.row_length != 0 {
            gl.pixel_store_i32(glow::UNPACK_ROW_LENGTH, 0);
        }
        Ok(begin.elapsed())
    }

    /// Like [`TextureUploader::try_upload_or_replace`], but a failure is only logged.
    ///
    /// If the texture could not be created it returns a zero duration and will try again in the
    /// next call.
    pub fn upload_or_replace(&mut self, buffer: &PixelBuffer) -> Duration {
        match self.try_upload_or_replace(buffer) {
            Ok(elapsed) => elapsed,
            Err(e) => {
                log::warn!("Texture upload failed: {e}");
                Duration::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{GlCall, MockGl};
    use crate::pixels::PixelFormat;

    fn bgr(width: u32, height: u32, stride: usize) -> PixelBuffer {
        PixelBuffer::from_raw(
            width,
            height,
            stride,
            PixelFormat::Bgr8,
            vec![0x80; stride * height as usize],
        )
        .unwrap()
    }

    fn alignment_set(gl: &MockGl) -> Vec<i32> {
        gl.calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::PixelStore(glow::UNPACK_ALIGNMENT, v) => Some(v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn alignment_follows_stride() {
        for stride in 0..64 {
            let expected = if stride % 4 == 0 { 4 } else { 1 };
            assert_eq!(unpack_alignment(stride), expected, "stride {stride}");
        }
    }

    #[test]
    fn layout_of_padded_rows() {
        // 5 BGR pixels = 15 bytes, padded to 16: alignment alone describes it.
        let l = UnpackLayout::for_buffer(&bgr(5, 3, 16));
        assert_eq!(l, UnpackLayout { alignment: 4, row_length: 0, exact: true });

        // Tight odd rows.
        let l = UnpackLayout::for_buffer(&bgr(5, 3, 15));
        assert_eq!(l, UnpackLayout { alignment: 1, row_length: 0, exact: true });

        // Extra padding that is a whole number of pixels.
        let l = UnpackLayout::for_buffer(&bgr(5, 3, 24));
        assert_eq!(l, UnpackLayout { alignment: 4, row_length: 8, exact: true });
        // 18 bytes of pixels rounded up to the 4 byte alignment.
        let l = UnpackLayout::for_buffer(&bgr(5, 3, 20));
        assert_eq!(l, UnpackLayout { alignment: 4, row_length: 6, exact: true });
        let l = UnpackLayout::for_buffer(&bgr(5, 3, 21));
        assert_eq!(l, UnpackLayout { alignment: 1, row_length: 7, exact: true });

        // Not expressible.
        let l = UnpackLayout::for_buffer(&bgr(4, 3, 13));
        assert_eq!(l, UnpackLayout { alignment: 1, row_length: 0, exact: false });
        // ...unless there is a single row.
        assert!(UnpackLayout::for_buffer(&bgr(4, 1, 13)).exact);
    }

    #[test]
    fn small_image_single_upload() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        let buf = bgr(4, 4, 12);

        let elapsed = up.try_upload_or_replace(&buf).unwrap();
        assert!(elapsed >= Duration::ZERO);
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::CreateTexture(1),
                GlCall::BindTexture(Some(1)),
                GlCall::PixelStore(glow::UNPACK_ALIGNMENT, 4),
                GlCall::PixelStore(glow::UNPACK_ROW_LENGTH, 0),
                GlCall::TexParameter(glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32),
                GlCall::TexParameter(glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32),
                GlCall::TexParameter(glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32),
                GlCall::TexParameter(glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32),
                GlCall::TexImage {
                    internal_format: glow::RGB,
                    width: 4,
                    height: 4,
                    format: glow::BGR,
                    ty: glow::UNSIGNED_BYTE,
                    len: 48,
                },
            ]
        );
        assert_eq!(up.texture(), Some(1));
    }

    #[test]
    fn odd_stride_uses_byte_alignment() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        up.upload_or_replace(&bgr(3, 3, 9));
        assert_eq!(alignment_set(&gl), vec![1]);
    }

    #[test]
    fn texture_is_allocated_once() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        let buf = bgr(4, 4, 12);

        let frames = 5;
        let mut ids = Vec::new();
        for _ in 0..frames {
            up.upload_or_replace(&buf);
            ids.push(up.texture());
        }
        assert_eq!(gl.count(|c| matches!(c, GlCall::CreateTexture(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, GlCall::TexImage { .. })), frames);
        assert!(ids.iter().all(|id| *id == Some(1)));
    }

    #[test]
    fn consecutive_frames_reuse_handle() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        let buf = bgr(4, 4, 12);

        let t1 = up.try_upload_or_replace(&buf).unwrap();
        let h1 = up.texture();
        let t2 = up.try_upload_or_replace(&buf).unwrap();
        let h2 = up.texture();
        assert_eq!(h1, h2);
        assert!(t1 >= Duration::ZERO && t2 >= Duration::ZERO);
    }

    #[test]
    fn failed_allocation_is_retried() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        let buf = bgr(4, 4, 12);

        gl.fail_next_create();
        assert_eq!(up.upload_or_replace(&buf), Duration::ZERO);
        assert_eq!(up.texture(), None);
        assert!(gl.calls().is_empty());

        up.upload_or_replace(&buf);
        assert_eq!(up.texture(), Some(1));
        assert_eq!(gl.count(|c| matches!(c, GlCall::TexImage { .. })), 1);
    }

    #[test]
    fn row_length_is_restored() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        up.upload_or_replace(&bgr(5, 3, 24));
        let calls = gl.calls();
        assert_eq!(
            calls.last(),
            Some(&GlCall::PixelStore(glow::UNPACK_ROW_LENGTH, 0))
        );
        assert!(calls.contains(&GlCall::PixelStore(glow::UNPACK_ROW_LENGTH, 8)));
        // The final row is passed without its padding.
        assert!(calls.contains(&GlCall::TexImage {
            internal_format: glow::RGB,
            width: 5,
            height: 3,
            format: glow::BGR,
            ty: glow::UNSIGNED_BYTE,
            len: 24 * 2 + 15,
        }));
    }

    #[test]
    fn aligned_padding_uses_row_length() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        up.upload_or_replace(&bgr(5, 3, 20));
        let calls = gl.calls();
        assert!(calls.contains(&GlCall::PixelStore(glow::UNPACK_ALIGNMENT, 4)));
        assert!(calls.contains(&GlCall::PixelStore(glow::UNPACK_ROW_LENGTH, 6)));
        assert_eq!(
            calls.last(),
            Some(&GlCall::PixelStore(glow::UNPACK_ROW_LENGTH, 0))
        );
    }

    #[test]
    fn dropping_uploader_deletes_texture() {
        let gl = Rc::new(MockGl::default());
        let mut up = TextureUploader::new(gl.clone());
        up.upload_or_replace(&bgr(4, 4, 12));
        drop(up);
        assert_eq!(gl.calls().last(), Some(&GlCall::DeleteTexture(1)));
    }
}
