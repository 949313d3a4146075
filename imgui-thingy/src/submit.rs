use easy_imgui::Color;
use thingy_opengl::{GlApi, Rgba};

/// Converts a GUI color for [`GlApi::clear_color_buffer`].
pub fn gl_color(c: Color) -> Rgba {
    Rgba::new(c.r, c.g, c.b, c.a)
}

/// The window side of a frame: where it is drawn and how it is shown.
pub trait Surface {
    /// Size of the drawable, in physical pixels. With display scaling this is not the window
    /// size.
    fn framebuffer_size(&self) -> (u32, u32);
    fn present(&self);
}

impl Surface for sdl3::video::Window {
    fn framebuffer_size(&self) -> (u32, u32) {
        self.size_in_pixels()
    }
    fn present(&self) {
        self.gl_swap_window();
    }
}

/// Draws a finished frame and presents it.
///
/// The viewport is reset to the full framebuffer every time, because the window may have been
/// resized or moved to a display with a different scale.
pub fn submit<G, S>(gl: &G, surface: &S, clear_color: Rgba, draw: impl FnOnce())
where
    G: GlApi + ?Sized,
    S: Surface + ?Sized,
{
    let (display_w, display_h) = surface.framebuffer_size();
    gl.viewport(0, 0, display_w as i32, display_h as i32);
    gl.clear_color_buffer(clear_color.premultiplied());
    draw();
    surface.present();
}
