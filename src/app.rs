use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::{ExampleConfig, FrameConfig, Variant};
use crate::platform::ContextWindow;
use crate::render::{
    FrameDriver, FrameStats, GraphicsApi, PresentSurface, Scene, ShaderProgram, VertexBuffer,
};

/// Loads the configuration for `variant`, opens its window and renders until
/// the user closes it. All GL resources are released before the window is
/// torn down.
pub fn run(variant: Variant) -> Result<FrameStats> {
    info!("Starting {}", variant);
    let config = ExampleConfig::load(variant)?;

    let (mut window, gl) =
        ContextWindow::create(&config.window).context("Failed to create window")?;
    let result = render_example(&gl, &mut window, &config.frame);
    drop(gl);
    window.terminate();

    let stats = result?;
    info!(
        "{} finished: {} frames, {} draw calls",
        variant, stats.frames, stats.draw_calls
    );
    Ok(stats)
}

/// Builds the scene described by `config` (if any) and drives frames into
/// `surface` until a stop is requested.
pub fn render_example<G, S>(gl: &G, surface: &mut S, config: &FrameConfig) -> Result<FrameStats>
where
    G: GraphicsApi,
    S: PresentSurface,
{
    if !config.draw_triangle {
        return Ok(FrameDriver::new(gl, config).run(surface)?);
    }

    let program = ShaderProgram::triangle(gl).context("Failed to build shader program")?;
    let program = if config.abort_on_shader_error {
        program
            .into_checked()
            .context("Shader program is unusable")?
    } else {
        if !program.is_linked() {
            warn!(
                "Continuing with an unusable shader program ({} diagnostics)",
                program.diagnostics().len()
            );
        }
        program
    };
    let geometry = VertexBuffer::triangle(gl).context("Failed to upload triangle")?;

    let stats = FrameDriver::new(gl, config)
        .with_scene(Scene {
            program: &program,
            geometry: &geometry,
        })
        .run(surface)?;
    Ok(stats)
}
