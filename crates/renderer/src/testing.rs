//! Recording [`Driver`] for protocol tests without a GL context.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap, VecDeque},
};

use asset::{MeshData, binary::load_mesh_from_bytes};

use crate::{driver::Driver, shader::ShaderStage};

/// Regular tetrahedron, wound so every normal points outward.
pub(crate) fn tetrahedron() -> MeshData {
    let positions: [f32; 12] = [
        1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, -1.0, 1.0,
    ];
    let indices: [u16; 12] = [0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&48i32.to_le_bytes());
    positions.iter().for_each(|p| bytes.extend_from_slice(&p.to_le_bytes()));
    bytes.extend_from_slice(&24i32.to_le_bytes());
    indices.iter().for_each(|i| bytes.extend_from_slice(&i.to_le_bytes()));
    load_mesh_from_bytes(&bytes).expect("tetrahedron")
}

#[derive(Default)]
pub(crate) struct RecordingDriver {
    next_id: Cell<u32>,
    live: RefCell<BTreeMap<u32, &'static str>>,
    created: Cell<usize>,
    calls: RefCell<Vec<String>>,
    errors: RefCell<VecDeque<u32>>,
    uniforms: RefCell<HashMap<String, Vec<f32>>>,
    bound_buffers: RefCell<HashMap<u32, u32>>,
    uploads: RefCell<Vec<(String, usize)>>,
    shader_stages: RefCell<HashMap<u32, ShaderStage>>,
    pub fail_compile: Cell<Option<ShaderStage>>,
    pub fail_link: Cell<bool>,
    pub fail_create: Cell<Option<&'static str>>,
    pub missing_uniform: Cell<Option<&'static str>>,
}

fn target_name(target: u32) -> &'static str {
    match target {
        glow::ARRAY_BUFFER => "ARRAY_BUFFER",
        glow::ELEMENT_ARRAY_BUFFER => "ELEMENT_ARRAY_BUFFER",
        _ => "?",
    }
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn position(&self, call: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .position(|c| c == call)
            .unwrap_or_else(|| panic!("call {call:?} not recorded in {:#?}", self.calls()))
    }

    /// Number of objects created and not yet deleted.
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn created_objects(&self) -> usize {
        self.created.get()
    }

    pub fn uniform(&self, name: &str) -> Vec<f32> {
        self.uniforms
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("uniform {name} never set"))
    }

    /// `(target, byte length)` for every buffer upload.
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn create(&self, kind: &'static str) -> Result<u32, String> {
        if self.fail_create.get() == Some(kind) {
            return Err(format!("out of {kind} names"));
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id, kind);
        self.created.set(self.created.get() + 1);
        self.record(format!("create_{kind} -> {id}"));
        Ok(id)
    }

    fn delete(&self, kind: &'static str, id: u32) {
        match self.live.borrow_mut().remove(&id) {
            Some(k) if k == kind => {}
            other => panic!("delete_{kind}({id}) on {other:?}: double free or wrong kind"),
        }
        self.record(format!("delete_{kind}({id})"));
    }

    fn set_uniform(&self, location: Option<&String>, values: &[f32]) {
        if let Some(name) = location {
            self.uniforms
                .borrow_mut()
                .insert(name.clone(), values.to_vec());
        }
    }
}

impl Driver for RecordingDriver {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type Texture = u32;
    type UniformLocation = String;

    fn get_error(&self) -> u32 {
        self.errors
            .borrow_mut()
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }

    fn get_string(&self, name: u32) -> String {
        match name {
            glow::RENDERER => "Recording".to_owned(),
            glow::VERSION => "3.3 (test)".to_owned(),
            _ => String::new(),
        }
    }

    fn create_texture(&self) -> Result<u32, String> {
        self.create("texture")
    }

    fn active_texture(&self, unit: u32) {
        self.record(format!("active_texture({unit})"));
    }

    fn bind_texture_2d(&self, texture: Option<u32>) {
        self.record(format!("bind_texture_2d({texture:?})"));
    }

    fn tex_image_2d_rgba8(&self, width: i32, height: i32, pixels: &[u8]) {
        self.record(format!(
            "tex_image_2d_rgba8({width}x{height}, {} bytes)",
            pixels.len()
        ));
    }

    fn generate_mipmap_2d(&self) {
        self.record("generate_mipmap_2d".to_owned());
    }

    fn delete_texture(&self, texture: u32) {
        self.delete("texture", texture);
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.create("shader")?;
        self.shader_stages.borrow_mut().insert(id, stage);
        Ok(id)
    }

    fn shader_source(&self, shader: u32, _source: &str) {
        self.record(format!("shader_source({shader})"));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(format!("compile_shader({shader})"));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let stage = self.shader_stages.borrow().get(&shader).copied();
        stage.is_none() || stage != self.fail_compile.get()
    }

    fn shader_info_log(&self, shader: u32) -> String {
        format!("0:1: syntax error in shader {shader}")
    }

    fn delete_shader(&self, shader: u32) {
        self.delete("shader", shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        self.create("program")
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(format!("attach_shader({program}, {shader})"));
    }

    fn bind_attrib_location(&self, program: u32, index: u32, name: &str) {
        self.record(format!("bind_attrib_location({program}, {index}, {name})"));
    }

    fn link_program(&self, program: u32) {
        self.record(format!("link_program({program})"));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        !self.fail_link.get()
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: vertex output FragPos not read by fragment".to_owned()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(format!("use_program({program:?})"));
    }

    fn delete_program(&self, program: u32) {
        self.delete("program", program);
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        (self.missing_uniform.get() != Some(name)).then(|| name.to_owned())
    }

    fn uniform_matrix4(&self, location: Option<&String>, cols: &[f32; 16]) {
        self.record(format!("uniform_matrix4({location:?})"));
        self.set_uniform(location, cols);
    }

    fn uniform_f32(&self, location: Option<&String>, value: f32) {
        self.record(format!("uniform_f32({location:?})"));
        self.set_uniform(location, &[value]);
    }

    fn uniform_i32(&self, location: Option<&String>, value: i32) {
        self.record(format!("uniform_i32({location:?}, {value})"));
        self.set_uniform(location, &[value as f32]);
    }

    fn create_buffer(&self) -> Result<u32, String> {
        self.create("buffer")
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        let mut bound = self.bound_buffers.borrow_mut();
        match buffer {
            Some(b) => bound.insert(target, b),
            None => bound.remove(&target),
        };
        self.record(format!("bind_buffer({}, {buffer:?})", target_name(target)));
    }

    fn buffer_data_static(&self, target: u32, data: &[u8]) {
        assert!(
            self.bound_buffers.borrow().contains_key(&target),
            "upload to {} with nothing bound",
            target_name(target)
        );
        self.uploads
            .borrow_mut()
            .push((target_name(target).to_owned(), data.len()));
        self.record(format!("buffer_data_static({})", target_name(target)));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.delete("buffer", buffer);
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        self.create("vertex_array")
    }

    fn bind_vertex_array(&self, vao: Option<u32>) {
        self.record(format!("bind_vertex_array({vao:?})"));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.record(format!(
            "vertex_attrib_pointer_f32({index}, {size}, {stride}, {offset})"
        ));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("enable_vertex_attrib_array({index})"));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.delete("vertex_array", vao);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(format!("clear_color({r}, {g}, {b}, {a})"));
    }

    fn clear(&self, mask: u32) {
        self.record(format!("clear({mask})"));
    }

    fn enable(&self, capability: u32) {
        self.record(format!("enable({capability})"));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport({x}, {y}, {width}, {height})"));
    }

    fn draw_triangles_u16(&self, index_count: i32) {
        self.record(format!("draw_triangles_u16({index_count})"));
    }
}
