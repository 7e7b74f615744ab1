use gl::types::GLuint;

use crate::geometry::Geometry;
use crate::program::Program;
use crate::texture::Texture2D;

/// Which GL objects are currently bound.
///
/// Pure bookkeeping: the skip-or-issue decisions live here, separate from GL
/// issuance, so the redundant-bind contract stays testable without a live
/// context. `acquire_*` returns true when the caller must issue the GL bind,
/// `release_*` when it must issue the unbind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct BindState {
    program: Option<GLuint>,
    vertex_array: Option<GLuint>,
    texture: Option<(u32, GLuint)>,
}

impl BindState {
    pub fn acquire_program(&mut self, id: GLuint) -> bool {
        if self.program == Some(id) {
            return false;
        }
        self.program = Some(id);
        true
    }

    pub fn release_program(&mut self) -> bool {
        self.program.take().is_some()
    }

    pub fn acquire_vertex_array(&mut self, id: GLuint) -> bool {
        if self.vertex_array == Some(id) {
            return false;
        }
        self.vertex_array = Some(id);
        true
    }

    pub fn release_vertex_array(&mut self) -> bool {
        self.vertex_array.take().is_some()
    }

    pub fn acquire_texture(&mut self, unit: u32, id: GLuint) -> bool {
        if self.texture == Some((unit, id)) {
            return false;
        }
        self.texture = Some((unit, id));
        true
    }

    /// Returns the unit whose binding must be cleared.
    pub fn release_texture(&mut self) -> Option<u32> {
        self.texture.take().map(|(unit, _)| unit)
    }
}

/// Explicit owner of the GL bind state.
///
/// Every binding operation goes through here. A bind request for an
/// already-current resource issues no GL call, so callers may bind freely
/// without worrying about redundant state changes; unbinding restores the GL
/// null object and clears the tracked state.
#[derive(Debug, Default)]
pub struct RenderContext {
    state: BindState,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_program(&mut self, program: &Program) {
        if self.state.acquire_program(program.id()) {
            unsafe { gl::UseProgram(program.id()) }
        }
    }

    pub fn detach_program(&mut self) {
        if self.state.release_program() {
            unsafe { gl::UseProgram(0) }
        }
    }

    pub fn bind_texture(&mut self, unit: u32, texture: &Texture2D) {
        if self.state.acquire_texture(unit, texture.id()) {
            unsafe {
                gl::ActiveTexture(gl::TEXTURE0 + unit);
                gl::BindTexture(gl::TEXTURE_2D, texture.id());
            }
        }
    }

    pub fn unbind_texture(&mut self) {
        if let Some(unit) = self.state.release_texture() {
            unsafe {
                gl::ActiveTexture(gl::TEXTURE0 + unit);
                gl::BindTexture(gl::TEXTURE_2D, 0);
            }
        }
    }

    pub fn bind_vertex_array(&mut self, geometry: &Geometry) {
        if self.state.acquire_vertex_array(geometry.vao()) {
            unsafe { gl::BindVertexArray(geometry.vao()) }
        }
    }

    pub fn unbind_vertex_array(&mut self) {
        if self.state.release_vertex_array() {
            unsafe { gl::BindVertexArray(0) }
        }
    }

    /// One indexed triangles draw over the geometry's full index range.
    pub(crate) fn draw_elements(&mut self, geometry: &Geometry) {
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                geometry.index_count() as i32,
                gl::UNSIGNED_INT,
                std::ptr::null(),
            );
        }
    }

    pub fn viewport(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}
