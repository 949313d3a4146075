/*!
* Shows an image from disk inside a Dear ImGui window, uploading it to an OpenGL texture every
* frame and reporting how long the upload took.
*
* The window and its OpenGL context come from SDL3, the GUI is Dear ImGui through `easy-imgui`
* and its stock SDL3 and OpenGL3 backends.
*/

pub mod compose;
pub mod config;
pub mod event_loop;
pub mod logger;
pub mod sdl;
pub mod submit;

// Reexport the main dependencies to simplify dependencies.
pub use easy_imgui;
pub use sdl3;
pub use thingy_opengl;
