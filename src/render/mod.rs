pub mod api;
pub mod frame;
pub mod mesh;
pub mod shaders;

#[cfg(test)]
pub(crate) mod testing;

pub use api::GraphicsApi;
pub use frame::{
    on_resize, FrameDriver, FrameError, FrameStats, LoopState, PresentSurface, Scene,
    SurfaceEvent,
};
pub use mesh::{MeshError, VertexBuffer};
pub use shaders::{ShaderError, ShaderProgram, ShaderStage};
