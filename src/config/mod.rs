pub mod core;
pub mod frame;
pub mod window;

pub use core::{ExampleConfig, Variant};
pub use frame::{FrameConfig, ProgramBinding};
pub use window::WindowConfig;
