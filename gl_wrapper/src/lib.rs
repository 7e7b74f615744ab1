//! Thin OpenGL wrapper for the fresco scene prototype: annotated shader
//! parsing and compilation, texture upload, indexed geometry, and the
//! per-frame render pass. All GL calls must happen on the thread owning the
//! context; nothing in here is thread-safe.

pub mod geometry;
pub mod pass;
pub mod program;
pub mod renderer;
pub mod shader_source;
pub mod texture;
