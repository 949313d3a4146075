use std::fmt::Display;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use easy_imgui_sys::sdl3_sys;
use sdl3::event::{Event, WindowEvent};
use sdl3::video::SwapInterval;
use sdl3_sys::everything::*;
use thingy_opengl::{Rgba, glow};

use crate::compose::ThingyApp;
use crate::config::Config;
use crate::event_loop::FrameDriver;
use crate::submit::{gl_color, submit};

/// Logs the outcome of an initialization step.
fn init_step<T, E: Display>(what: &str, res: std::result::Result<T, E>) -> Result<T> {
    match res {
        Ok(v) => {
            log::info!("{what} OK");
            Ok(v)
        }
        Err(e) => {
            log::error!("{what} FAIL: {e}");
            Err(anyhow!("{what} failed: {e}"))
        }
    }
}

/// Initializes the platform backend and then the renderer backend.
///
/// If the renderer fails the platform backend is shut down again, so the context can be dropped.
fn init_backends(
    init_platform: impl FnOnce() -> bool,
    init_renderer: impl FnOnce() -> bool,
    shutdown_platform: impl FnOnce(),
) -> std::result::Result<(), &'static str> {
    if !init_platform() {
        return Err("platform backend init");
    }
    if !init_renderer() {
        shutdown_platform();
        return Err("renderer backend init");
    }
    Ok(())
}

/// Creates a Glow context from a `sdl3` video subsystem.
/// # Safety
/// Call this once after the window context is current.
unsafe fn glow_context(sdl_video: &sdl3::VideoSubsystem) -> glow::Context {
    unsafe {
        glow::Context::from_loader_function(|name| {
            use std::ffi::c_void;

            sdl_video
                .gl_get_proc_address(name)
                .map(|f| f as *const c_void)
                .unwrap_or(std::ptr::null())
        })
    }
}

/// Gets an event from the event queue returning the low-level version.
///
/// The Dear ImGui backend needs the raw `SDL_Event`.
fn sdl3_poll_event_ll(_pump: &mut sdl3::EventPump) -> Option<SDL_Event> {
    let mut raw = std::mem::MaybeUninit::uninit();
    unsafe {
        let has_pending = SDL_PollEvent(raw.as_mut_ptr());
        if has_pending {
            Some(raw.assume_init())
        } else {
            None
        }
    }
}

/// Everything the program holds for its whole life: the SDL window, its GL context, the Dear
/// ImGui context and the application.
///
/// Fields are dropped in order: the GUI context, the texture, the GL context, the window and SDL.
pub struct SdlPlatform {
    imgui: easy_imgui::Context,
    app: ThingyApp,
    gl: Rc<glow::Context>,
    sdl_gl: sdl3::video::GLContext,
    window: sdl3::video::Window,
    event_pump: sdl3::EventPump,
    _video: sdl3::VideoSubsystem,
    _sdl: sdl3::Sdl,
    clear_color: Rgba,
}

impl SdlPlatform {
    /// Creates the window, the GL context and the GUI, then loads the frame content.
    ///
    /// Every step is logged. The first failure aborts the initialization.
    pub fn init(cfg: &Config) -> Result<SdlPlatform> {
        let sdl = init_step("SDL init", sdl3::init())?;
        let video = init_step("SDL video init", sdl.video())?;

        {
            let gla = video.gl_attr();
            gla.set_context_version(cfg.gl_version.0, cfg.gl_version.1);
            gla.set_depth_size(0);
        }

        let window = video
            .window(&cfg.title, cfg.width, cfg.height)
            .opengl()
            .resizable()
            .high_pixel_density()
            .build();
        let window = init_step("SDL window create", window)?;
        let sdl_gl = init_step("GL context create", window.gl_create_context())?;
        init_step("GL make current", window.gl_make_current(&sdl_gl))?;
        // Enable v-sync to avoid consuming too much CPU
        if let Err(e) = video.gl_set_swap_interval(SwapInterval::VSync) {
            log::warn!("V-sync not available: {e}");
        }
        let event_pump = init_step("SDL event pump", sdl.event_pump())?;

        let gl = Rc::new(unsafe { glow_context(&video) });

        let mut imgui = unsafe { easy_imgui::ContextBuilder::new().build() };
        let backends = unsafe {
            let _current = imgui.set_current();
            init_backends(
                || {
                    easy_imgui_sys::ImGui_ImplSDL3_InitForOpenGL(window.raw(), sdl_gl.raw() as *mut _)
                },
                || easy_imgui_sys::ImGui_ImplOpenGL3_Init(cfg.glsl_version.as_ptr()),
                || easy_imgui_sys::ImGui_ImplSDL3_Shutdown(),
            )
        };
        init_step("ImGui init", backends)?;

        unsafe {
            let io = imgui.io_mut();
            let io = io.inner();
            io.ConfigDpiScaleFonts = true;

            let window_scale = window.display_scale();
            let style = imgui.style_mut();
            style.set_colors_dark();
            style.scale_all_sizes(window_scale);
            style.FontScaleDpi = window_scale;
        }

        let app = ThingyApp::new(&cfg.content, &gl);

        Ok(SdlPlatform {
            imgui,
            app,
            gl,
            sdl_gl,
            window,
            event_pump,
            _video: video,
            _sdl: sdl,
            clear_color: gl_color(cfg.clear_color),
        })
    }
}

impl FrameDriver for SdlPlatform {
    fn poll_events(&mut self) -> bool {
        let _imgui = unsafe { self.imgui.set_current() };
        let window_id = self.window.id();
        let mut close = false;
        while let Some(event) = sdl3_poll_event_ll(&mut self.event_pump) {
            unsafe {
                easy_imgui_sys::ImGui_ImplSDL3_ProcessEvent(&event);
            }
            match Event::from_ll(event) {
                Event::Quit { .. } => close = true,
                Event::Window {
                    win_event: WindowEvent::CloseRequested,
                    window_id: id,
                    ..
                } if id == window_id => close = true,
                _ => (),
            }
        }
        close
    }

    fn begin_frame(&mut self) {
        unsafe {
            let _imgui = self.imgui.set_current();
            easy_imgui_sys::ImGui_ImplOpenGL3_NewFrame();
            easy_imgui_sys::ImGui_ImplSDL3_NewFrame();
        }
    }

    fn compose(&mut self) {
        unsafe {
            let mut imgui = self.imgui.set_current();
            // Rendering is done by `submit`, the draw data lives until the next frame.
            imgui.do_frame(&mut self.app, |_| {}, |_| {});
        }
    }

    fn submit(&mut self) {
        let _imgui = unsafe { self.imgui.set_current() };
        submit(&*self.gl, &self.window, self.clear_color, || unsafe {
            easy_imgui_sys::ImGui_ImplOpenGL3_RenderDrawData(easy_imgui_sys::ImGui_GetDrawData());
        });
    }
}

impl Drop for SdlPlatform {
    fn drop(&mut self) {
        unsafe {
            let _imgui = self.imgui.set_current();
            easy_imgui_sys::ImGui_ImplOpenGL3_Shutdown();
            easy_imgui_sys::ImGui_ImplSDL3_Shutdown();
        }
        log::info!("ImGui shutdown OK");
    }
}
