pub mod app;
pub mod config;
pub mod platform;
pub mod render;

// Re-export commonly used types
pub use config::{ExampleConfig, FrameConfig, ProgramBinding, Variant, WindowConfig};
pub use platform::{BootstrapError, ContextWindow};
pub use render::{FrameDriver, FrameStats, GraphicsApi, ShaderProgram, VertexBuffer};
