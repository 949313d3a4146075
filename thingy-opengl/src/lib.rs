/*!
* OpenGL helpers used by `imgui-thingy`: a small GL seam over [`glow`], the
* [`PixelBuffer`] image source and the [`TextureUploader`] that keeps a single
* texture in sync with it.
*
* # Features
*  * `mock`: enables [`mock::MockGl`], a `GlApi` that records every call
*    instead of talking to a driver.
*/

pub mod glr;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod pixels;
mod upload;

// Handy re-export of the core dependency
pub use glow;

pub use glr::{GLError, GlApi, Rgba, TexImage, Texture};
pub use pixels::*;
pub use upload::*;
