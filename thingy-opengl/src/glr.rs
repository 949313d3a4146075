/*!
* Helper module to wrap the few `glow` OpenGL calls this program needs.
*/

use std::rc::Rc;

use glow::HasContext;

#[derive(Debug, Clone)]
pub struct GLError(pub u32);

impl std::error::Error for GLError {}
impl std::fmt::Display for GLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GL error {:x}", self.0)
    }
}

pub type Result<T> = std::result::Result<T, GLError>;

/// Arguments of a full `glTexImage2D` upload into mip level 0.
#[derive(Debug, Copy, Clone)]
pub struct TexImage<'a> {
    pub internal_format: u32,
    pub width: i32,
    pub height: i32,
    pub format: u32,
    pub ty: u32,
    pub pixels: &'a [u8],
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Rgba {
        Rgba { r, g, b, a }
    }
    /// The color with `r`, `g` and `b` multiplied by `a`.
    pub fn premultiplied(self) -> Rgba {
        Rgba::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }
}

/// The subset of OpenGL used by the texture uploader and the frame submitter.
///
/// It is implemented for [`glow::Context`]. Every call acts on the current context of the
/// calling thread, so implementors are not expected to be `Send`.
pub trait GlApi {
    type Texture: Copy + PartialEq + std::fmt::Debug;

    fn create_texture(&self) -> Result<Self::Texture>;
    fn delete_texture(&self, texture: Self::Texture);
    fn bind_texture_2d(&self, texture: Option<Self::Texture>);
    fn pixel_store_i32(&self, parameter: u32, value: i32);
    fn tex_parameter_i32(&self, parameter: u32, value: i32);
    fn tex_image_2d(&self, image: &TexImage<'_>);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// Clears `COLOR_BUFFER_BIT` to `color`.
    fn clear_color_buffer(&self, color: Rgba);
}

pub fn to_gl_err(gl: &glow::Context) -> GLError {
    unsafe { GLError(HasContext::get_error(gl)) }
}

// The `HasContext` methods share names with `GlApi`, so they are called fully qualified.
impl GlApi for glow::Context {
    type Texture = glow::Texture;

    fn create_texture(&self) -> Result<glow::Texture> {
        unsafe { HasContext::create_texture(self).map_err(|_| to_gl_err(self)) }
    }
    fn delete_texture(&self, texture: glow::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }
    fn bind_texture_2d(&self, texture: Option<glow::Texture>) {
        unsafe { HasContext::bind_texture(self, glow::TEXTURE_2D, texture) }
    }
    fn pixel_store_i32(&self, parameter: u32, value: i32) {
        unsafe { HasContext::pixel_store_i32(self, parameter, value) }
    }
    fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, glow::TEXTURE_2D, parameter, value) }
    }
    fn tex_image_2d(&self, image: &TexImage<'_>) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                glow::TEXTURE_2D,
                0,
                image.internal_format as i32,
                image.width,
                image.height,
                0,
                image.format,
                image.ty,
                glow::PixelUnpackData::Slice(Some(image.pixels)),
            );
        }
    }
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }
    fn clear_color_buffer(&self, color: Rgba) {
        unsafe {
            HasContext::clear_color(self, color.r, color.g, color.b, color.a);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT);
        }
    }
}

/// An owned GL texture object, deleted on drop.
pub struct Texture<G: GlApi> {
    gl: Rc<G>,
    id: G::Texture,
}

impl<G: GlApi> Drop for Texture<G> {
    fn drop(&mut self) {
        self.gl.delete_texture(self.id);
    }
}

impl<G: GlApi> Texture<G> {
    pub fn generate(gl: &Rc<G>) -> Result<Texture<G>> {
        let id = gl.create_texture()?;
        Ok(Texture { gl: gl.clone(), id })
    }
    pub fn id(&self) -> G::Texture {
        self.id
    }
}

impl<G: GlApi> std::fmt::Debug for Texture<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Texture").field(&self.id).finish()
    }
}
