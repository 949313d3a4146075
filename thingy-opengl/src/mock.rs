/*!
* A [`GlApi`] that records the calls it receives.
*/

use std::cell::{Cell, RefCell};

use crate::glr::{GLError, GlApi, Result, Rgba, TexImage};

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateTexture(u32),
    DeleteTexture(u32),
    BindTexture(Option<u32>),
    PixelStore(u32, i32),
    TexParameter(u32, i32),
    TexImage {
        internal_format: u32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        len: usize,
    },
    Viewport(i32, i32, i32, i32),
    Clear(Rgba),
}

/// Texture names start at 1, like the ones returned by a real driver.
#[derive(Debug, Default)]
pub struct MockGl {
    calls: RefCell<Vec<GlCall>>,
    last_texture: Cell<u32>,
    fail_create: Cell<bool>,
}

impl MockGl {
    /// A copy of every call recorded so far, oldest first.
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }
    /// Makes the next `create_texture` fail with `GL_OUT_OF_MEMORY`.
    pub fn fail_next_create(&self) {
        self.fail_create.set(true);
    }
    pub fn count(&self, f: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| f(c)).count()
    }

    fn push(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl GlApi for MockGl {
    type Texture = u32;

    fn create_texture(&self) -> Result<u32> {
        if self.fail_create.take() {
            return Err(GLError(glow::OUT_OF_MEMORY));
        }
        let id = self.last_texture.get() + 1;
        self.last_texture.set(id);
        self.push(GlCall::CreateTexture(id));
        Ok(id)
    }
    fn delete_texture(&self, texture: u32) {
        self.push(GlCall::DeleteTexture(texture));
    }
    fn bind_texture_2d(&self, texture: Option<u32>) {
        self.push(GlCall::BindTexture(texture));
    }
    fn pixel_store_i32(&self, parameter: u32, value: i32) {
        self.push(GlCall::PixelStore(parameter, value));
    }
    fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        self.push(GlCall::TexParameter(parameter, value));
    }
    fn tex_image_2d(&self, image: &TexImage<'_>) {
        self.push(GlCall::TexImage {
            internal_format: image.internal_format,
            width: image.width,
            height: image.height,
            format: image.format,
            ty: image.ty,
            len: image.pixels.len(),
        });
    }
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.push(GlCall::Viewport(x, y, width, height));
    }
    fn clear_color_buffer(&self, color: Rgba) {
        self.push(GlCall::Clear(color));
    }
}
