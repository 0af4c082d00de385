//! Renderer: immediate-mode GL setup and the per-frame draw of the disco teapot.
//! glow 0.16.x behind a narrow `Driver` seam.

pub mod driver;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::{Driver, GlowDriver, drain_errors};
pub use error::{RenderError, RenderResult};
pub use frame::{FrameUniforms, Renderer, TEXTURE_UNIT};
pub use gpu::GpuResources;
pub use shader::{ShaderSourceBuilder, ShaderStage};
