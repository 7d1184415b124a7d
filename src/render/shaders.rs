// shaders.rs - Shader program builder

use std::fmt;
use thiserror::Error;

use crate::render::api::GraphicsApi;

/// Upper bound on how much of a driver info log is kept.
pub const INFO_LOG_LIMIT: usize = 512;

const EMPTY_LOG_PLACEHOLDER: &str = "driver reported failure without an info log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Could not create GL object: {0}")]
    ObjectCreation(String),
}

/// Predefined sources for the hello-triangle scene
pub mod triangle_shaders {
    /// Forwards the position attribute unchanged.
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

    /// Paints every fragment the same orange.
    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;
void main()
{
    FragColor = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
"#;
}

/// A linked program plus whatever the driver complained about while building it.
///
/// Compile and link failures do not stop construction: the program object is
/// still returned and the failures are kept in [`diagnostics`](Self::diagnostics).
/// Drawing with a program where [`is_linked`](Self::is_linked) is false is
/// allowed and renders nothing useful.
pub struct ShaderProgram<'gl, G: GraphicsApi> {
    gl: &'gl G,
    id: G::Program,
    linked: bool,
    diagnostics: Vec<ShaderError>,
}

impl<'gl, G: GraphicsApi> ShaderProgram<'gl, G> {
    pub fn build(
        gl: &'gl G,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let mut diagnostics = Vec::new();

        let vertex_shader = Self::compile_stage(
            gl,
            ShaderStage::Vertex,
            vertex_source,
            &mut diagnostics,
        )?;
        let fragment_shader = match Self::compile_stage(
            gl,
            ShaderStage::Fragment,
            fragment_source,
            &mut diagnostics,
        ) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex_shader);
                return Err(e);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                return Err(ShaderError::ObjectCreation(e));
            }
        };

        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);

        let linked = gl.program_link_status(program);
        if !linked {
            let log = bounded_log(gl.program_info_log(program));
            log::error!("shader::program linking failed\n{}", log);
            diagnostics.push(ShaderError::Linking(log));
        }

        // Shader objects are never needed once the link step has run.
        gl.delete_shader(vertex_shader);
        gl.delete_shader(fragment_shader);

        log::debug!(
            "Built shader program {:?} (linked: {}, diagnostics: {})",
            program,
            linked,
            diagnostics.len()
        );

        Ok(ShaderProgram {
            gl,
            id: program,
            linked,
            diagnostics,
        })
    }

    /// Builds the orange hello-triangle program.
    pub fn triangle(gl: &'gl G) -> Result<Self, ShaderError> {
        Self::build(gl, triangle_shaders::VERTEX_SRC, triangle_shaders::FRAGMENT_SRC)
    }

    fn compile_stage(
        gl: &G,
        stage: ShaderStage,
        source: &str,
        diagnostics: &mut Vec<ShaderError>,
    ) -> Result<G::Shader, ShaderError> {
        let shader = gl.create_shader(stage).map_err(ShaderError::ObjectCreation)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.shader_compile_status(shader) {
            let log = bounded_log(gl.shader_info_log(shader));
            log::error!("shader::{} compilation failed\n{}", stage, log);
            diagnostics.push(ShaderError::Compilation { stage, log });
        }

        Ok(shader)
    }

    pub fn id(&self) -> G::Program {
        self.id
    }

    /// True only when both stages compiled and the link step succeeded.
    pub fn is_linked(&self) -> bool {
        self.linked && self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// Turns the first recorded diagnostic into an error.
    pub fn into_checked(self) -> Result<Self, ShaderError> {
        match self.diagnostics.first() {
            Some(e) => Err(e.clone()),
            None => Ok(self),
        }
    }

    pub fn bind(&self) {
        self.gl.use_program(Some(self.id));
    }
}

impl<G: GraphicsApi> Drop for ShaderProgram<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

/// Trims a driver info log to [`INFO_LOG_LIMIT`] bytes without splitting a
/// character, and never returns an empty string.
pub fn bounded_log(log: String) -> String {
    let trimmed = log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return EMPTY_LOG_PLACEHOLDER.to_string();
    }
    if trimmed.len() <= INFO_LOG_LIMIT {
        return trimmed.to_string();
    }
    let mut end = INFO_LOG_LIMIT;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
