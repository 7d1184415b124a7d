use glam::Vec3;
use thiserror::Error;

use crate::render::api::GraphicsApi;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Could not create GL object: {0}")]
    ObjectCreation(String),
    #[error("{0} vertices do not fit in a single draw call")]
    TooManyVertices(usize),
}

/// Left, right, top.
pub const TRIANGLE_VERTICES: [Vec3; 3] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
];

const POSITION_LOCATION: u32 = 0;
const POSITION_COMPONENTS: i32 = 3;

/// Immutable position-only geometry living in a vertex array + buffer pair.
pub struct VertexBuffer<'gl, G: GraphicsApi> {
    gl: &'gl G,
    vao: G::VertexArray,
    vbo: G::Buffer,
    vertex_count: i32,
}

impl<'gl, G: GraphicsApi> VertexBuffer<'gl, G> {
    pub fn from_positions(gl: &'gl G, positions: &[Vec3]) -> Result<Self, MeshError> {
        let vertex_count = draw_count(positions.len())?;
        let vao = gl.create_vertex_array().map_err(MeshError::ObjectCreation)?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(MeshError::ObjectCreation(e));
            }
        };

        // The vertex array records the attribute layout, so bind it first.
        gl.bind_vertex_array(Some(vao));
        gl.bind_array_buffer(Some(vbo));
        gl.upload_static_f32(bytemuck::cast_slice(positions));
        gl.vertex_attrib_f32(
            POSITION_LOCATION,
            POSITION_COMPONENTS,
            POSITION_COMPONENTS * std::mem::size_of::<f32>() as i32,
        );
        gl.enable_vertex_attrib(POSITION_LOCATION);

        gl.bind_array_buffer(None);
        gl.bind_vertex_array(None);

        Ok(Self {
            gl,
            vao,
            vbo,
            vertex_count,
        })
    }

    pub fn triangle(gl: &'gl G) -> Result<Self, MeshError> {
        Self::from_positions(gl, &TRIANGLE_VERTICES)
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.vao));
    }
}

/// Vertex count as GL takes it for `glDrawArrays`.
fn draw_count(len: usize) -> Result<i32, MeshError> {
    i32::try_from(len).map_err(|_| MeshError::TooManyVertices(len))
}

impl<G: GraphicsApi> Drop for VertexBuffer<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vao);
        self.gl.delete_buffer(self.vbo);
    }
}
