//! Test doubles for the GL seam and the window surface.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

use winit::keyboard::KeyCode;

use crate::render::api::GraphicsApi;
use crate::render::frame::{PresentSurface, SurfaceEvent};
use crate::render::shaders::ShaderStage;

const DEFAULT_INFO_LOG: &str = "0:4(6): error: syntax error, unexpected IDENTIFIER";
const RUNAWAY_LOOP_LIMIT: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindArrayBuffer(Option<u32>),
    DeleteBuffer(u32),
    UploadStatic(Vec<f32>),
    VertexAttrib { location: u32, components: i32, stride: i32 },
    EnableVertexAttrib(u32),
    ClearColor([f32; 4]),
    Clear,
    DrawTriangles { first: i32, count: i32 },
    Viewport(i32, i32, i32, i32),
    PolygonModeLines(bool),
    // Surface side, recorded when a ScriptedSurface is traced.
    KeyQuery,
    PollEvents,
    SwapBuffers,
}

#[derive(Default)]
struct Ids {
    shader: u32,
    program: u32,
    vertex_array: u32,
    buffer: u32,
}

/// Records every call in order and fakes the driver's compile/link results.
///
/// A source compiles when it contains `void main`; a program links when every
/// attached shader compiled.
pub struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    ids: RefCell<Ids>,
    sources: RefCell<HashMap<u32, String>>,
    attached: RefCell<HashMap<u32, Vec<u32>>>,
    live_shaders: Cell<usize>,
    info_log: RefCell<String>,
    fail_creation: Cell<bool>,
    reject_sources: Cell<bool>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            ids: RefCell::new(Ids::default()),
            sources: RefCell::new(HashMap::new()),
            attached: RefCell::new(HashMap::new()),
            live_shaders: Cell::new(0),
            info_log: RefCell::new(DEFAULT_INFO_LOG.to_string()),
            fail_creation: Cell::new(false),
            reject_sources: Cell::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Forgets recorded calls; object state is kept.
    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.get()
    }

    pub fn set_info_log(&self, log: &str) {
        *self.info_log.borrow_mut() = log.to_string();
    }

    pub fn fail_object_creation(&self) {
        self.fail_creation.set(true);
    }

    /// Makes every shader fail to compile, whatever its source.
    pub fn reject_all_sources(&self) {
        self.reject_sources.set(true);
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn compiled(&self, shader: u32) -> bool {
        !self.reject_sources.get()
            && self
                .sources
                .borrow()
                .get(&shader)
                .map_or(false, |source| source.contains("void main"))
    }

    fn next(&self, pick: impl FnOnce(&mut Ids) -> &mut u32) -> Result<u32, String> {
        if self.fail_creation.get() {
            return Err("out of memory".to_string());
        }
        let mut ids = self.ids.borrow_mut();
        let id = pick(&mut *ids);
        *id += 1;
        Ok(*id)
    }
}

impl GraphicsApi for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.next(|ids| &mut ids.shader)?;
        self.live_shaders.set(self.live_shaders.get() + 1);
        self.record(Call::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.sources.borrow_mut().insert(shader, source.to_string());
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.compiled(shader)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.compiled(shader) {
            String::new()
        } else {
            self.info_log.borrow().clone()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.live_shaders.set(self.live_shaders.get().saturating_sub(1));
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.next(|ids| &mut ids.program)?;
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.attached.borrow_mut().entry(program).or_default().push(shader);
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.attached
            .borrow()
            .get(&program)
            .map_or(false, |shaders| shaders.iter().all(|&s| self.compiled(s)))
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: linking with uncompiled/unspecialized shader".to_string()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.next(|ids| &mut ids.vertex_array)?;
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.next(|ids| &mut ids.buffer)?;
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn upload_static_f32(&self, data: &[f32]) {
        self.record(Call::UploadStatic(data.to_vec()));
    }

    fn vertex_attrib_f32(&self, location: u32, components: i32, stride: i32) {
        self.record(Call::VertexAttrib {
            location,
            components,
            stride,
        });
    }

    fn enable_vertex_attrib(&self, location: u32) {
        self.record(Call::EnableVertexAttrib(location));
    }

    fn clear_color(&self, color: [f32; 4]) {
        self.record(Call::ClearColor(color));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangles { first, count });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn polygon_mode_lines(&self, enabled: bool) {
        self.record(Call::PolygonModeLines(enabled));
    }
}

/// A window that replays a fixed script, one step per presented frame.
pub struct ScriptedSurface<'a> {
    trace: Option<&'a RecordingGl>,
    iteration: u64,
    exit_key_from: Option<u64>,
    events: Vec<(u64, SurfaceEvent)>,
    fail_swap_at: Option<u64>,
    swaps: u64,
}

impl<'a> ScriptedSurface<'a> {
    pub fn new() -> Self {
        Self {
            trace: None,
            iteration: 0,
            exit_key_from: None,
            events: Vec::new(),
            fail_swap_at: None,
            swaps: 0,
        }
    }

    /// Mirrors surface calls into `gl`'s call log so ordering can be checked.
    pub fn traced(mut self, gl: &'a RecordingGl) -> Self {
        self.trace = Some(gl);
        self
    }

    /// Escape reads as held from iteration `n` onwards.
    pub fn exit_key_from(mut self, n: u64) -> Self {
        self.exit_key_from = Some(n);
        self
    }

    pub fn event_at(mut self, iteration: u64, event: SurfaceEvent) -> Self {
        self.events.push((iteration, event));
        self
    }

    pub fn fail_swap_at(mut self, iteration: u64) -> Self {
        self.fail_swap_at = Some(iteration);
        self
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    fn trace(&self, call: Call) {
        if let Some(gl) = self.trace {
            gl.record(call);
        }
    }
}

impl PresentSurface for ScriptedSurface<'_> {
    type Error = io::Error;

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.trace(Call::KeyQuery);
        key == KeyCode::Escape && self.exit_key_from.map_or(false, |n| self.iteration >= n)
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.trace(Call::PollEvents);
        self.events
            .iter()
            .filter(|(at, _)| *at == self.iteration)
            .map(|(_, event)| *event)
            .collect()
    }

    fn swap_buffers(&mut self) -> Result<(), io::Error> {
        self.trace(Call::SwapBuffers);
        if self.fail_swap_at == Some(self.iteration) {
            return Err(io::Error::new(io::ErrorKind::Other, "surface lost"));
        }
        self.swaps += 1;
        self.iteration += 1;
        assert!(
            self.iteration < RUNAWAY_LOOP_LIMIT,
            "render loop never stopped"
        );
        Ok(())
    }
}
