use log::{debug, info};
use thiserror::Error;
use winit::keyboard::KeyCode;

use crate::config::{FrameConfig, ProgramBinding};
use crate::render::api::GraphicsApi;
use crate::render::mesh::VertexBuffer;
use crate::render::shaders::ShaderProgram;

/// Key that ends the loop when held down at the start of a frame.
pub const DEFAULT_EXIT_KEY: KeyCode = KeyCode::Escape;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Failed to present frame: {0}")]
    Present(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// What the frame driver needs from the window it draws into.
pub trait PresentSurface {
    type Error: std::error::Error;

    fn is_key_pressed(&self, key: KeyCode) -> bool;
    /// Drains pending window events without blocking.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
    fn swap_buffers(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    StopRequested,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub draw_calls: u64,
}

/// The single object drawn each frame.
pub struct Scene<'a, G: GraphicsApi> {
    pub program: &'a ShaderProgram<'a, G>,
    pub geometry: &'a VertexBuffer<'a, G>,
}

pub struct FrameDriver<'a, G: GraphicsApi> {
    gl: &'a G,
    clear_color: [f32; 4],
    binding: ProgramBinding,
    wireframe: bool,
    exit_key: KeyCode,
    scene: Option<Scene<'a, G>>,
    state: LoopState,
    stats: FrameStats,
}

impl<'a, G: GraphicsApi> FrameDriver<'a, G> {
    pub fn new(gl: &'a G, config: &FrameConfig) -> Self {
        Self {
            gl,
            clear_color: config.clear_color,
            binding: config.program_binding,
            wireframe: config.wireframe,
            exit_key: DEFAULT_EXIT_KEY,
            scene: None,
            state: LoopState::Running,
            stats: FrameStats::default(),
        }
    }

    pub fn with_scene(mut self, scene: Scene<'a, G>) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn with_exit_key(mut self, key: KeyCode) -> Self {
        self.exit_key = key;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Renders frames until a stop is requested. Blocks the calling thread;
    /// pacing comes from the surface's buffer swap.
    pub fn run<S: PresentSurface>(&mut self, surface: &mut S) -> Result<FrameStats, FrameError> {
        if self.wireframe {
            self.gl.polygon_mode_lines(true);
        }
        if let (ProgramBinding::Once, Some(scene)) = (self.binding, &self.scene) {
            scene.program.bind();
        }

        info!(
            "Entering render loop (scene: {}, binding: {:?})",
            self.scene.is_some(),
            self.binding
        );
        while self.state == LoopState::Running {
            self.frame(surface)?;
        }
        info!("Render loop finished after {} frames", self.stats.frames);

        Ok(self.stats)
    }

    /// One full iteration. A stop request raised here takes effect only
    /// after the frame has been presented.
    pub fn frame<S: PresentSurface>(&mut self, surface: &mut S) -> Result<(), FrameError> {
        if surface.is_key_pressed(self.exit_key) {
            self.request_stop("exit key pressed");
        }

        self.gl.clear_color(self.clear_color);
        self.gl.clear_color_buffer();

        if let Some(scene) = &self.scene {
            if self.binding == ProgramBinding::PerFrame {
                scene.program.bind();
            }
            scene.geometry.bind();
            self.gl.draw_triangles(0, scene.geometry.vertex_count());
            self.stats.draw_calls += 1;
        }

        for event in surface.poll_events() {
            match event {
                SurfaceEvent::Resized { width, height } => on_resize(self.gl, width, height),
                SurfaceEvent::CloseRequested => self.request_stop("window close requested"),
            }
        }

        surface
            .swap_buffers()
            .map_err(|e| FrameError::Present(e.to_string()))?;
        self.stats.frames += 1;
        Ok(())
    }

    fn request_stop(&mut self, reason: &str) {
        if self.state == LoopState::Running {
            debug!("Stop requested: {}", reason);
            self.state = LoopState::StopRequested;
        }
    }
}

/// Maps the viewport onto the whole surface after a resize.
pub fn on_resize<G: GraphicsApi>(gl: &G, width: u32, height: u32) {
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let height = i32::try_from(height).unwrap_or(i32::MAX);
    debug!("Viewport resized to {}x{}", width, height);
    gl.viewport(0, 0, width, height);
}
