use std::ffi::c_void;
use std::mem::size_of;

use gl::types::{GLsizei, GLuint};
use log::debug;
use thiserror::Error;

/// What an attribute feeds in the vertex stage. Slot order follows
/// declaration order and must line up with the shader's
/// `layout(location = N)` bindings; nothing enforces that contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    Position,
    Color,
    TexCoord,
}

#[derive(Debug, Clone, Copy)]
pub struct VertexAttribute {
    pub semantic: Semantic,
    pub components: usize,
}

impl VertexAttribute {
    pub fn new(semantic: Semantic, components: usize) -> Self {
        Self {
            semantic,
            components,
        }
    }
}

/// Byte stride and per-attribute byte offsets, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    pub stride: usize,
    pub offsets: Vec<usize>,
}

pub(crate) fn layout_of(attributes: &[VertexAttribute]) -> Layout {
    let mut offsets = Vec::with_capacity(attributes.len());
    let mut offset = 0;

    for attr in attributes {
        offsets.push(offset);
        offset += attr.components * size_of::<f32>();
    }

    Layout {
        stride: offset,
        offsets,
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("vertex data length {len} is not a multiple of the declared {floats} floats per vertex")]
    InvalidDataLength { len: usize, floats: usize },
    #[error("index {index} out of range for {rows} vertices")]
    IndexOutOfRange { index: u32, rows: usize },
}

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    vertices: &'a [f32],
    indices: &'a [u32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(vertices: &'a [f32], indices: &'a [u32]) -> Self {
        Self {
            attributes: Vec::new(),
            vertices,
            indices,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Uploads vertex and index data as static (upload-once, draw-many)
    /// buffers captured by one VAO, and declares the attribute layout.
    ///
    /// Indices must reference valid vertex rows, and their winding order
    /// must be counter-clockwise for front faces to survive back-face
    /// culling if something downstream enables it.
    pub fn build(self) -> Result<Geometry, GeometryError> {
        let floats: usize = self.attributes.iter().map(|a| a.components).sum();

        if floats == 0 || self.vertices.len() % floats != 0 {
            return Err(GeometryError::InvalidDataLength {
                len: self.vertices.len(),
                floats,
            });
        }

        let rows = self.vertices.len() / floats;
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= rows) {
            return Err(GeometryError::IndexOutOfRange { index, rows });
        }

        let layout = layout_of(&self.attributes);

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);
            gl::GenBuffers(1, (&mut ebo) as *mut u32);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.vertices.len() * size_of::<f32>()) as isize,
                self.vertices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (self.indices.len() * size_of::<u32>()) as isize,
                self.indices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.components as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    layout.stride as GLsizei,
                    layout.offsets[i] as *const c_void,
                );
                gl::EnableVertexAttribArray(i as u32);
            }

            // The element buffer binding is captured by the VAO; only the
            // array buffer may be unbound before the VAO is.
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        debug!(
            "built geometry: {rows} vertices, {} indices, {} attributes",
            self.indices.len(),
            self.attributes.len()
        );

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            index_count: self.indices.len(),
            attribute_count: self.attributes.len(),
        })
    }
}

#[derive(Debug)]
pub struct Geometry {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: usize,
    attribute_count: usize,
}

impl Geometry {
    pub(crate) fn vao(&self) -> GLuint {
        self.vao
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn attribute_count(&self) -> usize {
        self.attribute_count
    }

    /// Attribute enable state is global GPU state. A differently-shaped
    /// geometry bound since last frame may have left slots disabled, so the
    /// draw step re-enables exactly the slots it needs.
    pub fn enable_attribute(&self, slot: usize) {
        debug_assert!(slot < self.attribute_count);
        unsafe { gl::EnableVertexAttribArray(slot as u32) }
    }

    pub fn disable_attribute(&self, slot: usize) {
        debug_assert!(slot < self.attribute_count);
        unsafe { gl::DisableVertexAttribArray(slot as u32) }
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteBuffers(1, (&self.ebo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_attributes() -> [VertexAttribute; 3] {
        [
            VertexAttribute::new(Semantic::Position, 3),
            VertexAttribute::new(Semantic::Color, 4),
            VertexAttribute::new(Semantic::TexCoord, 2),
        ]
    }

    #[test]
    fn layout_stride_and_offsets() {
        let layout = layout_of(&quad_attributes());

        assert_eq!(layout.stride, 36);
        assert_eq!(layout.offsets, vec![0, 12, 28]);
    }

    #[test]
    fn layout_of_single_attribute() {
        let layout = layout_of(&[VertexAttribute::new(Semantic::Position, 2)]);

        assert_eq!(layout.stride, 8);
        assert_eq!(layout.offsets, vec![0]);
    }

    #[test]
    fn ragged_vertex_data_is_rejected() {
        // 7 floats cannot be rows of position(3) + color(4) + uv(2).
        let vertices = [0.0; 7];
        let err = GeometryBuilder::new(&vertices, &[])
            .with_attribute(VertexAttribute::new(Semantic::Position, 3))
            .with_attribute(VertexAttribute::new(Semantic::Color, 4))
            .with_attribute(VertexAttribute::new(Semantic::TexCoord, 2))
            .build()
            .unwrap_err();

        assert!(matches!(err, GeometryError::InvalidDataLength { len: 7, floats: 9 }));
    }

    #[test]
    fn missing_attributes_are_rejected() {
        let vertices = [0.0; 9];
        let err = GeometryBuilder::new(&vertices, &[]).build().unwrap_err();

        assert!(matches!(err, GeometryError::InvalidDataLength { floats: 0, .. }));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        // Two rows of position(2); index 2 points past the last row.
        let vertices = [0.0, 0.0, 1.0, 0.0];
        let indices = [0, 1, 2];
        let err = GeometryBuilder::new(&vertices, &indices)
            .with_attribute(VertexAttribute::new(Semantic::Position, 2))
            .build()
            .unwrap_err();

        match err {
            GeometryError::IndexOutOfRange { index, rows } => {
                assert_eq!(index, 2);
                assert_eq!(rows, 2);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }
}
