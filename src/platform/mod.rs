pub mod window;

pub use window::{BootstrapError, ContextWindow};
