use std::rc::Rc;
use std::time::Duration;

use easy_imgui::{self as imgui, TextureId};
use easy_imgui_sys::ImTextureID;
use thingy_opengl::{GlApi, PixelBuffer, TextureUploader, glow};

use crate::config::FrameContent;

/// Maps an OpenGL texture to an ImGui texture.
pub fn map_tex(ntex: glow::Texture) -> TextureId {
    unsafe { TextureId::from_id(ntex.0.get() as ImTextureID) }
}

/// Milliseconds with two decimals, such as `1.25`.
pub fn format_millis(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64() * 1000.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePanel {
    /// `None` if the texture could not be created this frame.
    pub texture: Option<TextureId>,
    /// Drawn size, in pixels.
    pub size: [f32; 2],
    pub type_line: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsPanel {
    pub conversion_line: String,
}

/// Everything drawn in a frame of [`FrameContent::Image`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    pub image: ImagePanel,
    pub stats: StatsPanel,
}

pub const IMAGE_WINDOW: &str = "imgui image";
pub const STATS_WINDOW: &str = "Debug stats";
pub const CONVERSION_NODE: &str = "Image Conversion";

/// Describes the frame for `buffer` once it has been uploaded to `texture`.
pub fn compose(buffer: &PixelBuffer, texture: Option<TextureId>, last_upload: Duration) -> ImageFrame {
    ImageFrame {
        image: ImagePanel {
            texture,
            size: [buffer.width() as f32, buffer.height() as f32],
            type_line: format!("Image Type: {}", buffer.format()),
        },
        stats: StatsPanel {
            conversion_line: format!("Decode->OpenGL: {}ms", format_millis(last_upload)),
        },
    }
}

/// Uploads `pixels` and describes the frame that shows the texture just filled.
///
/// `map` turns the uploader's texture into the id drawn by Dear ImGui.
pub fn frame<G: GlApi>(
    pixels: &PixelBuffer,
    uploader: &mut TextureUploader<G>,
    map: impl FnOnce(G::Texture) -> TextureId,
) -> ImageFrame {
    let elapsed = uploader.upload_or_replace(pixels);
    let texture = uploader.texture().map(map);
    compose(pixels, texture, elapsed)
}

impl ImageFrame {
    pub fn draw<A>(&self, ui: &imgui::Ui<A>) {
        ui.window_config(IMAGE_WINDOW).with(|| {
            if let Some(texture) = self.image.texture {
                let [w, h] = self.image.size;
                ui.image_config(imgui::TextureRef::Id(texture), imgui::Vector2::new(w, h))
                    .build();
            }
            ui.text(&self.image.type_line);
        });
        ui.window_config(STATS_WINDOW).with(|| {
            ui.tree_node_config(CONVERSION_NODE).with(|| {
                ui.text(&self.stats.conversion_line);
            });
        });
    }
}

enum View {
    Image {
        pixels: PixelBuffer,
        uploader: TextureUploader<glow::Context>,
        show_demo_window: bool,
    },
    Demo,
}

/// The `UiBuilder` of the program, it owns the image and its texture.
pub struct ThingyApp {
    view: View,
}

impl ThingyApp {
    /// Loads the image, if any. A load failure is logged and falls back to the demo window.
    pub fn new(content: &FrameContent, gl: &Rc<glow::Context>) -> ThingyApp {
        let view = match load_content(content) {
            Some((pixels, show_demo_window)) => View::Image {
                pixels,
                uploader: TextureUploader::new(gl.clone()),
                show_demo_window,
            },
            None => View::Demo,
        };
        ThingyApp { view }
    }
}

/// The image to show and whether to show the demo window next to it.
///
/// `None` means that only the demo window is shown.
fn load_content(content: &FrameContent) -> Option<(PixelBuffer, bool)> {
    match content {
        FrameContent::Demo => None,
        FrameContent::Image {
            path,
            show_demo_window,
        } => match PixelBuffer::load(path) {
            Ok(pixels) => {
                log::info!("Image load OK: {} {:?}", path.display(), pixels);
                Some((pixels, *show_demo_window))
            }
            Err(e) => {
                log::error!("Image load FAIL: {}: {e}", path.display());
                None
            }
        },
    }
}

impl imgui::UiBuilder for ThingyApp {
    fn do_ui(&mut self, ui: &imgui::Ui<Self>) {
        match &mut self.view {
            View::Demo => ui.show_demo_window(None),
            View::Image {
                pixels,
                uploader,
                show_demo_window,
            } => {
                if *show_demo_window {
                    ui.show_demo_window(Some(show_demo_window));
                }
                frame(pixels, uploader, map_tex).draw(ui);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use thingy_opengl::PixelFormat;
    use thingy_opengl::mock::{GlCall, MockGl};

    fn buffer(width: u32, height: u32) -> PixelBuffer {
        let data = vec![0; (width * height * 3) as usize];
        PixelBuffer::packed(width, height, PixelFormat::Bgr8, data).unwrap()
    }

    #[test]
    fn image_panel_has_native_size() {
        let tex = unsafe { TextureId::from_id(7) };
        let frame = compose(&buffer(640, 360), Some(tex), Duration::from_micros(1500));
        assert_eq!(frame.image.size, [640.0, 360.0]);
        assert_eq!(frame.image.texture, Some(tex));
        assert_eq!(frame.image.type_line, "Image Type: 8UC3");
    }

    #[test]
    fn stats_line_has_two_decimals() {
        let frame = compose(&buffer(4, 4), None, Duration::from_nanos(1_234_567));
        assert_eq!(frame.stats.conversion_line, "Decode->OpenGL: 1.23ms");
        assert_eq!(format_millis(Duration::ZERO), "0.00");
        assert_eq!(format_millis(Duration::from_millis(12)), "12.00");
    }

    #[test]
    fn texture_mapping_keeps_name() {
        let ntex = glow::NativeTexture(std::num::NonZeroU32::new(42).unwrap());
        assert_eq!(map_tex(ntex).id(), 42);
    }

    fn mock_tex(id: u32) -> TextureId {
        unsafe { TextureId::from_id(id as ImTextureID) }
    }

    #[test]
    fn frame_draws_the_uploaded_texture() {
        let gl = Rc::new(MockGl::default());
        let mut uploader = TextureUploader::new(gl.clone());
        let pixels = buffer(6, 2);

        let first = frame(&pixels, &mut uploader, mock_tex);
        assert_eq!(gl.count(|c| matches!(c, GlCall::TexImage { .. })), 1);
        let handle = uploader.texture().unwrap();
        assert_eq!(first.image.texture, Some(mock_tex(handle)));
        assert_eq!(first.image.size, [6.0, 2.0]);
        assert_eq!(first.image.type_line, "Image Type: 8UC3");

        let second = frame(&pixels, &mut uploader, mock_tex);
        assert_eq!(second.image.texture, first.image.texture);
        assert_eq!(gl.count(|c| matches!(c, GlCall::CreateTexture(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, GlCall::TexImage { .. })), 2);
    }

    #[test]
    fn frame_without_texture_after_failed_allocation() {
        let gl = Rc::new(MockGl::default());
        let mut uploader = TextureUploader::new(gl.clone());
        gl.fail_next_create();

        let f = frame(&buffer(4, 4), &mut uploader, mock_tex);
        assert_eq!(f.image.texture, None);
        assert_eq!(f.stats.conversion_line, "Decode->OpenGL: 0.00ms");
    }

    #[test]
    fn missing_image_falls_back_to_demo() {
        let content = FrameContent::Image {
            path: PathBuf::from("/nonexistent/thingy/coolBoye.png"),
            show_demo_window: false,
        };
        assert!(load_content(&content).is_none());
        assert!(load_content(&FrameContent::Demo).is_none());
    }
}
