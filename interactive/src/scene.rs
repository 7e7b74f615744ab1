use std::path::PathBuf;

use cgmath::Vector2;
use log::info;
use thiserror::Error;

use gl_wrapper::geometry::{Geometry, GeometryBuilder, GeometryError, Semantic, VertexAttribute};
use gl_wrapper::pass::{PassError, RenderPass};
use gl_wrapper::program::{Program, ProgramBuilder, ProgramError, UniformValue};
use gl_wrapper::renderer::RenderContext;
use gl_wrapper::shader_source::{SourceError, StageSources};
use gl_wrapper::texture::{Texture2D, TextureError};

use crate::camera::Camera;
use crate::scene_loader::SceneDescription;

/// Texture unit the scene's sampler lives on.
const TEXTURE_UNIT: u32 = 0;

/// One textured quad, 100 world units a side.
/// Per vertex: position(3), color(4), uv(2).
#[rustfmt::skip]
const VERTICES: [f32; 36] = [
    // position            // color                  // uv
    100.0,   0.0, 0.0,     1.0, 0.0, 0.0, 1.0,       1.0, 1.0, // bottom right
      0.0, 100.0, 0.0,     0.0, 1.0, 0.0, 1.0,       0.0, 0.0, // top left
    100.0, 100.0, 0.0,     0.0, 0.0, 1.0, 1.0,       1.0, 0.0, // top right
      0.0,   0.0, 0.0,     1.0, 1.0, 0.0, 1.0,       0.0, 1.0, // bottom left
];

/// Two triangles, both counter-clockwise.
const INDICES: [u32; 6] = [
    2, 1, 0, // top right triangle
    0, 1, 3, // bottom left triangle
];

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read shader file '{}': {}", .path.display(), .source)]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub struct LevelScene {
    program: Program,
    texture: Texture2D,
    geometry: Geometry,
    camera: Camera,
    clear_color: [f32; 3],
    elapsed: f32,
}

impl LevelScene {
    /// Builds every GPU resource the scene needs. Requires a current GL
    /// context; any failure is fatal for scene construction.
    pub fn init(description: &SceneDescription) -> Result<Self, SceneError> {
        let shader_path = &description.shader;
        let text = std::fs::read_to_string(shader_path).map_err(|source| SceneError::ShaderRead {
            path: shader_path.clone(),
            source,
        })?;

        let sources = StageSources::parse(shader_path, &text)?;
        let program = ProgramBuilder::new(shader_path, &sources).build()?;
        info!("compiled shader program from {}", shader_path.display());

        let texture = Texture2D::load(&description.texture)?;
        info!(
            "loaded {}x{} texture from {}",
            texture.width(),
            texture.height(),
            description.texture.display()
        );

        let geometry = GeometryBuilder::new(&VERTICES, &INDICES)
            .with_attribute(VertexAttribute::new(Semantic::Position, 3))
            .with_attribute(VertexAttribute::new(Semantic::Color, 4))
            .with_attribute(VertexAttribute::new(Semantic::TexCoord, 2))
            .build()?;

        Ok(Self {
            program,
            texture,
            geometry,
            camera: Camera::new(Vector2::new(description.camera[0], description.camera[1])),
            clear_color: description.clear_color,
            elapsed: 0.0,
        })
    }

    pub fn update(&mut self, ctx: &mut RenderContext, dt: f32) -> Result<(), PassError> {
        self.elapsed += dt;

        let [r, g, b] = self.clear_color;
        ctx.clear(r, g, b);

        let pass = RenderPass {
            program: &self.program,
            texture: &self.texture,
            texture_unit: TEXTURE_UNIT,
            sampler_name: "TEX_SAMPLE",
            geometry: &self.geometry,
        };

        pass.draw(
            ctx,
            &[
                ("uProjection", UniformValue::Mat4(self.camera.projection_matrix())),
                ("uView", UniformValue::Mat4(self.camera.view_matrix())),
                ("uTime", UniformValue::Float(self.elapsed)),
            ],
        )
    }
}
