//! GPU-side lifetimes for the teapot: texture, shader program, buffers and
//! vertex array.
//!
//! Every GL object is held by a [`GlObject`] that deletes it on drop, so a
//! failure halfway through [`GpuResources::load`] releases whatever was
//! already created, and a loaded set is released exactly once.

use std::{fmt, rc::Rc};

use asset::{MeshData, TextureData, Vertex};

use crate::{
    driver::{Driver, drain_errors},
    error::{RenderError, RenderResult},
    shader::{self, NORMAL_ATTRIB, POSITION_ATTRIB, ShaderStage},
};

/// Owned GL object name, deleted on drop.
pub struct GlObject<D: Driver, H: Copy + fmt::Debug> {
    gl: Rc<D>,
    raw: H,
    label: &'static str,
    delete: fn(&D, H),
}

impl<D: Driver, H: Copy + fmt::Debug> GlObject<D, H> {
    fn create(
        gl: &Rc<D>,
        label: &'static str,
        create: impl FnOnce(&D) -> Result<H, String>,
        delete: fn(&D, H),
    ) -> RenderResult<Self> {
        let raw = create(&**gl).map_err(|message| RenderError::ObjectCreation {
            what: label,
            message,
        })?;
        drain_errors(&**gl, label);
        Ok(Self {
            gl: Rc::clone(gl),
            raw,
            label,
            delete,
        })
    }

    #[inline]
    pub fn raw(&self) -> H {
        self.raw
    }
}

impl<D: Driver, H: Copy + fmt::Debug> Drop for GlObject<D, H> {
    fn drop(&mut self) {
        log::debug!("Deleting {} {:?}", self.label, self.raw);
        (self.delete)(&*self.gl, self.raw);
        drain_errors(&*self.gl, self.label);
    }
}

impl<D: Driver, H: Copy + fmt::Debug> fmt::Debug for GlObject<D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.label, self.raw)
    }
}

/// Uniform locations resolved once after linking. `None` means the driver
/// optimised the uniform out; uploads to it are skipped.
pub struct UniformLocations<L> {
    pub model: Option<L>,
    pub view: Option<L>,
    pub projection: Option<L>,
    pub min_y: Option<L>,
    pub max_y: Option<L>,
    pub time: Option<L>,
    pub disco: Option<L>,
    pub texture0: Option<L>,
}

impl<L: fmt::Debug> UniformLocations<L> {
    fn resolve<D: Driver<UniformLocation = L>>(gl: &D, program: D::Program) -> Self {
        let get = |name: &str| {
            let loc = gl.uniform_location(program, name);
            if loc.is_none() {
                log::debug!("Uniform {name} is inactive in the linked program");
            }
            loc
        };
        Self {
            model: get("uModel"),
            view: get("uView"),
            projection: get("uProjection"),
            min_y: get("uMinY"),
            max_y: get("uMaxY"),
            time: get("uTime"),
            disco: get("uDisco"),
            texture0: get("texture0"),
        }
    }
}

/// Everything the frame loop binds. Created by [`GpuResources::load`],
/// released by [`GpuResources::unload`] or on drop.
pub struct GpuResources<D: Driver> {
    pub(crate) gl: Rc<D>,
    pub(crate) uniforms: UniformLocations<D::UniformLocation>,
    pub(crate) index_count: i32,
    // Field order is deletion order. The shaders are only held so they
    // are deleted after the program.
    texture: GlObject<D, D::Texture>,
    vertex_array: GlObject<D, D::VertexArray>,
    vertex_buffer: GlObject<D, D::Buffer>,
    index_buffer: GlObject<D, D::Buffer>,
    program: GlObject<D, D::Program>,
    _fragment_shader: GlObject<D, D::Shader>,
    _vertex_shader: GlObject<D, D::Shader>,
}

impl<D: Driver> GpuResources<D> {
    /// Upload `texture` and `mesh` and build the disco shader program.
    pub fn load(gl: Rc<D>, mesh: &MeshData, texture: &TextureData) -> RenderResult<Self> {
        let texture = upload_texture(&gl, texture)?;

        let vertex_shader = compile(&gl, ShaderStage::Vertex, &shader::disco_vertex_source())?;
        let fragment_shader =
            compile(&gl, ShaderStage::Fragment, &shader::disco_fragment_source())?;
        let program = link(&gl, &vertex_shader, &fragment_shader)?;
        let uniforms = UniformLocations::resolve(&*gl, program.raw());

        let index_count = i32::try_from(mesh.indices.len()).map_err(|_| RenderError::TooLarge {
            what: "index list",
            len: mesh.indices.len(),
        })?;

        let vertex_buffer = GlObject::create(&gl, "vertex buffer", D::create_buffer, D::delete_buffer)?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer.raw()));
        gl.buffer_data_static(glow::ARRAY_BUFFER, bytemuck::cast_slice(&mesh.vertices));
        drain_errors(&*gl, "vertex upload");

        let index_buffer = GlObject::create(&gl, "index buffer", D::create_buffer, D::delete_buffer)?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer.raw()));
        gl.buffer_data_static(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(&mesh.indices));
        drain_errors(&*gl, "index upload");

        let vertex_array = GlObject::create(
            &gl,
            "vertex array",
            D::create_vertex_array,
            D::delete_vertex_array,
        )?;
        gl.bind_vertex_array(Some(vertex_array.raw()));
        // The element binding is vertex-array state; record it in ours.
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer.raw()));
        let stride = Vertex::STRIDE as i32;
        gl.vertex_attrib_pointer_f32(POSITION_ATTRIB.0, 3, stride, 0);
        gl.vertex_attrib_pointer_f32(NORMAL_ATTRIB.0, 3, stride, Vertex::NORMAL_OFFSET as i32);
        gl.enable_vertex_attrib_array(POSITION_ATTRIB.0);
        gl.enable_vertex_attrib_array(NORMAL_ATTRIB.0);
        drain_errors(&*gl, "vertex array setup");

        log::info!(
            "GPU resources loaded: {} vertices ({} bytes), {} indices",
            mesh.vertices.len(),
            mesh.vertices.len() * Vertex::STRIDE,
            index_count
        );

        Ok(Self {
            gl,
            uniforms,
            index_count,
            texture,
            vertex_array,
            vertex_buffer,
            index_buffer,
            program,
            _fragment_shader: fragment_shader,
            _vertex_shader: vertex_shader,
        })
    }

    /// Unbind everything and delete every object. Consumes the set, so it
    /// cannot run twice or be followed by a draw.
    pub fn unload(self) {
        log::info!("Unloading GPU resources");
        drop(self);
    }

    /// Bind vertex buffer, index buffer, vertex array, the texture on
    /// `texture_unit`, and the program, in that order.
    pub(crate) fn bind(&self, texture_unit: u32) {
        let gl = &*self.gl;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer.raw()));
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.index_buffer.raw()));
        gl.bind_vertex_array(Some(self.vertex_array.raw()));
        gl.active_texture(texture_unit);
        gl.bind_texture_2d(Some(self.texture.raw()));
        gl.use_program(Some(self.program.raw()));
        drain_errors(gl, "bind");
    }
}

impl<D: Driver> Drop for GpuResources<D> {
    fn drop(&mut self) {
        // Unbind before the fields drop and delete the objects.
        let gl = &*self.gl;
        gl.bind_texture_2d(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);
        gl.use_program(None);
        drain_errors(gl, "unbind");
    }
}

fn upload_texture<D: Driver>(
    gl: &Rc<D>,
    image: &TextureData,
) -> RenderResult<GlObject<D, D::Texture>> {
    let too_large = || RenderError::TooLarge {
        what: "texture edge",
        len: image.width.max(image.height) as usize,
    };
    let width = i32::try_from(image.width).map_err(|_| too_large())?;
    let height = i32::try_from(image.height).map_err(|_| too_large())?;

    let texture = GlObject::create(gl, "texture", D::create_texture, D::delete_texture)?;
    gl.bind_texture_2d(Some(texture.raw()));
    gl.tex_image_2d_rgba8(width, height, &image.data);
    drain_errors(&**gl, "texture upload");
    gl.generate_mipmap_2d();
    drain_errors(&**gl, "mipmap generation");
    gl.bind_texture_2d(None);
    Ok(texture)
}

fn compile<D: Driver>(
    gl: &Rc<D>,
    stage: ShaderStage,
    source: &str,
) -> RenderResult<GlObject<D, D::Shader>> {
    let label = match stage {
        ShaderStage::Vertex => "vertex shader",
        ShaderStage::Fragment => "fragment shader",
    };
    let shader = GlObject::create(gl, label, |d: &D| d.create_shader(stage), D::delete_shader)?;
    gl.shader_source(shader.raw(), source);
    gl.compile_shader(shader.raw());
    drain_errors(&**gl, label);

    if !gl.shader_compile_status(shader.raw()) {
        let log = gl.shader_info_log(shader.raw());
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

fn link<D: Driver>(
    gl: &Rc<D>,
    vertex: &GlObject<D, D::Shader>,
    fragment: &GlObject<D, D::Shader>,
) -> RenderResult<GlObject<D, D::Program>> {
    let program = GlObject::create(gl, "program", D::create_program, D::delete_program)?;
    gl.attach_shader(program.raw(), vertex.raw());
    gl.attach_shader(program.raw(), fragment.raw());
    gl.bind_attrib_location(program.raw(), POSITION_ATTRIB.0, POSITION_ATTRIB.1);
    gl.bind_attrib_location(program.raw(), NORMAL_ATTRIB.0, NORMAL_ATTRIB.1);
    gl.link_program(program.raw());
    drain_errors(&**gl, "program link");

    if !gl.program_link_status(program.raw()) {
        let log = gl.program_info_log(program.raw());
        return Err(RenderError::ShaderLink { log });
    }
    log::info!("Shader program linked");
    Ok(program)
}
