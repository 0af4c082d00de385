//! Per-frame render protocol.

use std::rc::Rc;

use asset::{Bounds, MeshData, TextureData};
use corelib::{AnimationState, Camera, Clock, Mat4};

use crate::{
    driver::{Driver, drain_errors},
    error::RenderResult,
    gpu::GpuResources,
};

/// Texture unit the sampler `texture0` reads from.
pub const TEXTURE_UNIT: u32 = 1;

/// Host-side values pushed to the program every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub min_y: f32,
    pub max_y: f32,
    pub time: f32,
    pub disco: f32,
}

impl FrameUniforms {
    pub fn compute(
        width: u32,
        height: u32,
        animation: &AnimationState,
        bounds: Bounds,
        time: f32,
    ) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let camera = Camera::orbit_default(aspect);
        Self {
            projection: camera.proj(),
            view: camera.view(),
            model: animation.model_matrix(),
            min_y: bounds.min_y,
            max_y: bounds.max_y,
            time,
            disco: animation.disco,
        }
    }
}

/// Loaded phase of the renderer. Dropping it or calling
/// [`Renderer::unload`] moves to the terminal unloaded phase.
pub struct Renderer<D: Driver, C: Clock> {
    resources: GpuResources<D>,
    bounds: Bounds,
    clock: C,
    frames: u64,
}

impl<D: Driver, C: Clock> Renderer<D, C> {
    pub fn load(gl: Rc<D>, mesh: &MeshData, texture: &TextureData, clock: C) -> RenderResult<Self> {
        let resources = GpuResources::load(gl, mesh, texture)?;
        Ok(Self {
            resources,
            bounds: mesh.bounds,
            clock,
            frames: 0,
        })
    }

    /// Draw one frame into the current framebuffer. The caller presents it
    /// (buffer swap) afterwards.
    ///
    /// GL errors raised along the way are logged and the frame carries on.
    pub fn render_frame(&mut self, width: u32, height: u32, animation: &AnimationState) -> FrameUniforms {
        let gl = &*self.resources.gl;

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        gl.enable(glow::DEPTH_TEST);
        gl.viewport(0, 0, clamp_i32(width), clamp_i32(height));
        drain_errors(gl, "frame setup");

        self.resources.bind(glow::TEXTURE0 + TEXTURE_UNIT);

        let frame = FrameUniforms::compute(
            width,
            height,
            animation,
            self.bounds,
            self.clock.elapsed_secs(),
        );
        let loc = &self.resources.uniforms;
        set_mat4(gl, loc.model.as_ref(), frame.model);
        set_mat4(gl, loc.view.as_ref(), frame.view);
        set_mat4(gl, loc.projection.as_ref(), frame.projection);
        set_f32(gl, loc.max_y.as_ref(), frame.max_y);
        set_f32(gl, loc.min_y.as_ref(), frame.min_y);
        set_f32(gl, loc.time.as_ref(), frame.time);
        set_f32(gl, loc.disco.as_ref(), frame.disco);
        if let Some(sampler) = loc.texture0.as_ref() {
            gl.uniform_i32(Some(sampler), TEXTURE_UNIT as i32);
        }
        drain_errors(gl, "uniform upload");

        gl.draw_triangles_u16(self.resources.index_count);
        drain_errors(gl, "draw");

        self.frames += 1;
        frame
    }

    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn unload(self) {
        log::info!("Renderer unloading after {} frames", self.frames);
        self.resources.unload();
    }
}

// Uniforms the compiler stripped resolve to `None` and are not uploaded.
fn set_mat4<D: Driver>(gl: &D, location: Option<&D::UniformLocation>, value: Mat4) {
    if location.is_some() {
        gl.uniform_matrix4(location, &value.to_cols_array());
    }
}

fn set_f32<D: Driver>(gl: &D, location: Option<&D::UniformLocation>, value: f32) {
    if location.is_some() {
        gl.uniform_f32(location, value);
    }
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
