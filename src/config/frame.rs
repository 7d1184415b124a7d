use serde::{Deserialize, Serialize};

/// When the shader program is made active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramBinding {
    /// Once before the first frame.
    Once,
    /// At the start of every draw.
    PerFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    pub clear_color: [f32; 4],
    pub draw_triangle: bool,
    pub program_binding: ProgramBinding,
    /// Rasterize polygons as outlines.
    pub wireframe: bool,
    /// Treat shader compile/link failures as fatal instead of drawing with a
    /// broken program.
    pub abort_on_shader_error: bool,
}
