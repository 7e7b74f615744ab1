use std::ffi::{c_char, CString};
use std::path::{Path, PathBuf};

use cgmath::{Matrix3, Matrix4, Vector2, Vector3, Vector4};
use gl::types::{GLint, GLuint};
use log::debug;
use thiserror::Error;

use crate::renderer::RenderContext;
use crate::shader_source::{StageKind, StageSources};

pub struct ProgramBuilder {
    path: PathBuf,
    vertex: CString,
    fragment: CString,
}

impl ProgramBuilder {
    pub fn new(path: &Path, sources: &StageSources) -> Self {
        Self {
            path: path.to_owned(),
            vertex: CString::new(sources.vertex.as_str()).unwrap(),
            fragment: CString::new(sources.fragment.as_str()).unwrap(),
        }
    }

    /// Compiles both stages and links them. Fail-fast: a vertex stage error
    /// is returned before the fragment stage is compiled at all.
    pub fn build(self) -> Result<Program, ProgramError> {
        unsafe {
            let vert = self.compile_stage(StageKind::Vertex, &self.vertex)?;
            let frag = self.compile_stage(StageKind::Fragment, &self.fragment)?;

            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);
            if success != 1 {
                return Err(ProgramError::Link {
                    path: self.path.clone(),
                    log: program_info_log(program),
                });
            }

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            debug!("linked shader program from {}", self.path.display());

            Ok(Program { id: program })
        }
    }

    unsafe fn compile_stage(&self, stage: StageKind, src: &CString) -> Result<GLuint, ProgramError> {
        let id = gl::CreateShader(stage.gl_kind());

        gl::ShaderSource(
            id,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );
        gl::CompileShader(id);

        let mut success = 0;
        gl::GetShaderiv(id, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        if success != 1 {
            return Err(ProgramError::StageCompile {
                path: self.path.clone(),
                stage,
                log: shader_info_log(id),
            });
        }

        Ok(id)
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("{}: {} shader compilation failed:\n{}", .path.display(), .stage, .log)]
    StageCompile {
        path: PathBuf,
        stage: StageKind,
        log: String,
    },
    #[error("{}: program linking failed:\n{}", .path.display(), .log)]
    Link { path: PathBuf, log: String },
}

unsafe fn shader_info_log(id: GLuint) -> String {
    let mut len = 0;
    gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut i32);

    let mut buf = vec![0_u8; len.max(0) as usize];
    gl::GetShaderInfoLog(id, len, std::ptr::null_mut(), buf.as_mut_ptr() as *mut c_char);

    trim_log(buf)
}

unsafe fn program_info_log(id: GLuint) -> String {
    let mut len = 0;
    gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut i32);

    let mut buf = vec![0_u8; len.max(0) as usize];
    gl::GetProgramInfoLog(id, len, std::ptr::null_mut(), buf.as_mut_ptr() as *mut c_char);

    trim_log(buf)
}

fn trim_log(mut buf: Vec<u8>) -> String {
    while buf.last() == Some(&0) {
        buf.pop();
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// A single per-draw uniform upload request.
#[derive(Debug, Clone, Copy)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Mat3(Matrix3<f32>),
    Mat4(Matrix4<f32>),
    TextureUnit(u32),
}

/// A linked two-stage GPU program.
///
/// Binding goes through [`RenderContext::use_program`], which skips the GL
/// call when the program is already current. Every uniform setter routes
/// through it first, so uploads always target a bound program. A name the
/// linker discarded (or that never existed) resolves to no location and the
/// upload is a silent no-op; GPUs treat unused uniforms the same way.
pub struct Program {
    id: GLuint,
}

impl Program {
    pub(crate) fn id(&self) -> GLuint {
        self.id
    }

    fn location(&self, name: &str) -> Option<GLint> {
        let name = CString::new(name).unwrap();
        let loc = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };

        (loc != -1).then_some(loc)
    }

    pub fn set_f32(&self, ctx: &mut RenderContext, name: &str, value: f32) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            unsafe { gl::Uniform1f(loc, value) }
        }
    }

    pub fn set_i32(&self, ctx: &mut RenderContext, name: &str, value: i32) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            unsafe { gl::Uniform1i(loc, value) }
        }
    }

    /// Samplers take the *unit index*, not the texture handle.
    pub fn set_texture_unit(&self, ctx: &mut RenderContext, name: &str, unit: u32) {
        self.set_i32(ctx, name, unit as i32);
    }

    pub fn set_vec2(&self, ctx: &mut RenderContext, name: &str, value: Vector2<f32>) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            unsafe { gl::Uniform2f(loc, value.x, value.y) }
        }
    }

    pub fn set_vec3(&self, ctx: &mut RenderContext, name: &str, value: Vector3<f32>) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            unsafe { gl::Uniform3f(loc, value.x, value.y, value.z) }
        }
    }

    pub fn set_vec4(&self, ctx: &mut RenderContext, name: &str, value: Vector4<f32>) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            unsafe { gl::Uniform4f(loc, value.x, value.y, value.z, value.w) }
        }
    }

    pub fn set_mat3(&self, ctx: &mut RenderContext, name: &str, value: &Matrix3<f32>) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            let cells: &[f32; 9] = value.as_ref();
            unsafe { gl::UniformMatrix3fv(loc, 1, gl::FALSE, cells.as_ptr()) }
        }
    }

    pub fn set_mat4(&self, ctx: &mut RenderContext, name: &str, value: &Matrix4<f32>) {
        ctx.use_program(self);
        if let Some(loc) = self.location(name) {
            let cells: &[f32; 16] = value.as_ref();
            unsafe { gl::UniformMatrix4fv(loc, 1, gl::FALSE, cells.as_ptr()) }
        }
    }

    pub fn set(&self, ctx: &mut RenderContext, name: &str, value: UniformValue) {
        match value {
            UniformValue::Float(v) => self.set_f32(ctx, name, v),
            UniformValue::Int(v) => self.set_i32(ctx, name, v),
            UniformValue::Vec2(v) => self.set_vec2(ctx, name, v),
            UniformValue::Vec3(v) => self.set_vec3(ctx, name, v),
            UniformValue::Vec4(v) => self.set_vec4(ctx, name, v),
            UniformValue::Mat3(v) => self.set_mat3(ctx, name, &v),
            UniformValue::Mat4(v) => self.set_mat4(ctx, name, &v),
            UniformValue::TextureUnit(v) => self.set_texture_unit(ctx, name, v),
        }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}
