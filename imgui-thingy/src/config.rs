use std::path::PathBuf;

use easy_imgui::Color;

/// What the main loop draws every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameContent {
    /// The image panel plus the debug stats panel.
    Image {
        path: PathBuf,
        /// Also show the Dear ImGui demo window.
        show_demo_window: bool,
    },
    /// Only the Dear ImGui demo window.
    Demo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_version: (u8, u8),
    pub glsl_version: &'static std::ffi::CStr,
    /// Background behind the GUI, not premultiplied.
    pub clear_color: Color,
    pub content: FrameContent,
}

pub const DEFAULT_IMAGE: &str = "../resources/coolBoye.png";

impl Default for Config {
    fn default() -> Config {
        Config {
            title: String::from("ImGui Thingy++"),
            width: 1280,
            height: 720,
            gl_version: (3, 0),
            glsl_version: c"#version 130",
            clear_color: Color::new(0.15, 0.15, 0.15, 1.0),
            content: FrameContent::Image {
                path: PathBuf::from(DEFAULT_IMAGE),
                show_demo_window: false,
            },
        }
    }
}

impl Config {
    /// The default configuration, changed by the `THINGY_*` environment variables.
    pub fn from_env() -> Config {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Config {
        let mut cfg = Config::default();

        let mut path = PathBuf::from(DEFAULT_IMAGE);
        if let Some(p) = var("THINGY_IMAGE") {
            path = PathBuf::from(p);
        }
        let show_demo_window = match var("THINGY_DEMO_WINDOW").as_deref() {
            None => false,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                log::warn!("Ignoring THINGY_DEMO_WINDOW={other}");
                false
            }
        };
        cfg.content = match var("THINGY_CONTENT").as_deref() {
            Some("demo") => FrameContent::Demo,
            None | Some("image") => FrameContent::Image {
                path,
                show_demo_window,
            },
            Some(other) => {
                log::warn!("Ignoring THINGY_CONTENT={other}");
                FrameContent::Image {
                    path,
                    show_demo_window,
                }
            }
        };
        cfg
    }
}
