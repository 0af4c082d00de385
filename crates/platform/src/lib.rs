//! Platform layer: windowing, GL context & event loop.
//!
//! Owns the winit window and the glutin context/surface, and drives the
//! renderer: load once when the window appears, one frame per redraw,
//! unload once when the window closes.

pub mod input;

use std::{num::NonZeroU32, rc::Rc, time::Instant};

use anyhow::{Context, Result, anyhow};
use asset::{MeshData, TextureData};
use corelib::{AnimationState, Knob, Stopwatch};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::GetGlDisplay,
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use renderer::{GlowDriver, Renderer};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

/// What to show and how it starts moving.
pub struct Scene {
    pub mesh: MeshData,
    pub texture: TextureData,
    pub animation: AnimationState,
    /// Scripted yaw speed, radians per second.
    pub spin: f32,
    /// Started once at process start; feeds `uTime`.
    pub clock: Stopwatch,
}

struct GlState {
    // Declared first so it drops before the context it was created from.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

struct App {
    scene: Scene,
    initial_size: PhysicalSize<u32>,
    // Must drop before `gl`: unloading needs the context current.
    renderer: Option<Renderer<GlowDriver, Stopwatch>>,
    gl: Option<GlState>,
    last_frame: Option<Instant>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(scene: Scene, width: u32, height: u32) -> Self {
        Self {
            scene,
            initial_size: PhysicalSize::new(width.max(1), height.max(1)),
            renderer: None,
            gl: None,
            last_frame: None,
            error: None,
        }
    }

    fn init_gl(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Disco teapot")
            .with_inner_size(self.initial_size);
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs.clone()))
            .build(event_loop, template, pick_config)
            .map_err(|e| anyhow!("Failed to create GL display: {e}"))?;
        let window = match window {
            Some(w) => w,
            None => glutin_winit::finalize_window(event_loop, attrs, &gl_config)
                .context("Failed to create window")?,
        };

        let raw_handle = window.window_handle().ok().map(|h| h.as_raw());
        let display = gl_config.display();
        let ctx_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(raw_handle);
        let not_current = unsafe { display.create_context(&gl_config, &ctx_attrs) }
            .context("Failed to create OpenGL 3.3 core context")?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("Failed to describe window surface")?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("Failed to create window surface")?;
        let context = not_current
            .make_current(&surface)
            .context("Failed to make GL context current")?;
        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            log::warn!("VSync unavailable: {e}");
        }

        let glow_ctx =
            unsafe { glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s)) };
        // SAFETY: the context was just made current on this thread and stays
        // current until `GlState` drops, after the renderer.
        let gl = Rc::new(unsafe { GlowDriver::new(glow_ctx) });

        let (renderer_name, version) = gl.renderer_info();
        log::info!("GL renderer: {renderer_name}, version: {version}");
        window.set_title(&format!("Renderer: {renderer_name} Version: {version}"));

        let renderer = Renderer::load(gl, &self.scene.mesh, &self.scene.texture, self.scene.clock)
            .context("Failed to load GPU resources")?;

        window.request_redraw();
        self.renderer = Some(renderer);
        self.gl = Some(GlState {
            surface,
            context,
            window,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(gl), Some(renderer)) = (&self.gl, &mut self.renderer) else {
            return;
        };

        let now = Instant::now();
        if let Some(prev) = self.last_frame {
            let dt = (now - prev).as_secs_f32();
            self.scene.animation.nudge(Knob::Yaw, self.scene.spin * dt);
        }
        self.last_frame = Some(now);

        let size = gl.window.inner_size();
        renderer.render_frame(size.width, size.height, &self.scene.animation);
        if let Err(e) = gl.surface.swap_buffers(&gl.context) {
            log::warn!("swap_buffers failed: {e}");
        }
        gl.window.request_redraw();
    }

    /// Release GPU resources while the context is still current. Runs once.
    fn shutdown(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.unload();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gl.is_some() {
            return;
        }
        if let Err(e) = self.init_gl(event_loop) {
            log::error!("{e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gl) = &self.gl {
                    gl.window.resize_surface(&gl.surface, &gl.context);
                    gl.window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(cmd) = input::command_for(event.physical_key) {
                    input::apply(cmd, &mut self.scene.animation);
                    log::debug!("{cmd:?} -> {:?}", self.scene.animation);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Prefer the config with the most MSAA samples.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| {
            if c.num_samples() > best.num_samples() {
                c
            } else {
                best
            }
        })
        .expect("glutin offers at least one config matching the template")
}

/// Open the window and run the render loop until it closes.
pub fn run(scene: Scene, width: u32, height: u32) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(scene, width, height);

    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("Event loop error: {e:?}"))?;

    app.shutdown();
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
