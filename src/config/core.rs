use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::frame::{FrameConfig, ProgramBinding};
use super::window::WindowConfig;

/// The tutorial programs shipped by this crate. They share everything except
/// the preset returned here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    HelloWindow,
    HelloTriangle,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::HelloWindow => "hello-window",
            Variant::HelloTriangle => "hello-triangle",
        }
    }

    pub fn window_config(self) -> WindowConfig {
        match self {
            Variant::HelloWindow => {
                WindowConfig::titled("Work-Through: Learn OpenGL  |  Hello Window!")
            }
            Variant::HelloTriangle => {
                WindowConfig::titled("Work-Through: Learn OpenGL  |  Hello Triangle!")
            }
        }
    }

    pub fn frame_config(self) -> FrameConfig {
        match self {
            Variant::HelloWindow => FrameConfig {
                clear_color: [0.0, 0.145, 1.0, 1.0],
                draw_triangle: false,
                program_binding: ProgramBinding::PerFrame,
                wireframe: false,
                abort_on_shader_error: false,
            },
            Variant::HelloTriangle => FrameConfig {
                clear_color: [0.2, 0.3, 0.3, 1.0],
                draw_triangle: true,
                program_binding: ProgramBinding::PerFrame,
                wireframe: false,
                abort_on_shader_error: false,
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExampleConfig {
    pub window: WindowConfig,
    pub frame: FrameConfig,
}

impl ExampleConfig {
    pub fn preset(variant: Variant) -> Self {
        Self {
            window: variant.window_config(),
            frame: variant.frame_config(),
        }
    }

    /// Preset for `variant`, overridden by `<config dir>/<variant>.toml` if
    /// that file exists.
    pub fn load(variant: Variant) -> Result<Self> {
        let path = config_path(variant)?;
        Self::load_from(variant, &path)
    }

    pub fn load_from(variant: Variant, path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using {} preset", path.display(), variant);
            return Ok(Self::preset(variant));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(variant, &content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded config overrides from {}", path.display());
        Ok(config)
    }

    /// Applies the keys present in `content` on top of the preset.
    pub fn from_toml_str(variant: Variant, content: &str) -> Result<Self> {
        let overrides: toml::Table = toml::from_str(content)?;
        let mut merged = toml::Value::try_from(Self::preset(variant))?;
        merge(&mut merged, toml::Value::Table(overrides));
        Ok(merged.try_into()?)
    }
}

fn config_path(variant: Variant) -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "learnopengl", "gl-tutorials")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs
        .config_dir()
        .join(format!("{}.toml", variant.name())))
}

fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
