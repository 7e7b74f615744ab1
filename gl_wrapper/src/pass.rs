use thiserror::Error;

use crate::geometry::Geometry;
use crate::program::{Program, UniformValue};
use crate::renderer::RenderContext;
use crate::texture::Texture2D;

#[derive(Debug, Error)]
pub enum PassError {
    #[error("geometry has no indices to draw")]
    EmptyGeometry,
}

/// One frame's draw over a program/texture/geometry triple.
///
/// Binds in a fixed order: program, sampler uniform + texture unit,
/// per-frame uniforms, vertex array + attribute slots, then one indexed
/// draw. Everything acquired is released symmetrically when the pass
/// scope ends, error paths included, so no bind state leaks into whatever
/// renders next.
pub struct RenderPass<'a> {
    pub program: &'a Program,
    pub texture: &'a Texture2D,
    pub texture_unit: u32,
    pub sampler_name: &'a str,
    pub geometry: &'a Geometry,
}

impl RenderPass<'_> {
    pub fn draw(
        &self,
        ctx: &mut RenderContext,
        uniforms: &[(&str, UniformValue)],
    ) -> Result<(), PassError> {
        let mut scope = PassScope::new(ctx);

        scope.bind_program(self.program);
        scope.bind_texture(self.sampler_name, self.texture_unit, self.texture);

        // Order among these is unconstrained; each targets its own slot.
        for &(name, value) in uniforms {
            scope.upload(name, value);
        }

        scope.bind_geometry(self.geometry);

        if self.geometry.index_count() == 0 {
            return Err(PassError::EmptyGeometry);
        }

        scope.draw_indexed(self.geometry);

        Ok(())
    }
}

/// Scoped acquisition of a frame's bind state. Releases in reverse
/// acquisition order on drop, so an early return cannot leak bindings.
struct PassScope<'c, 'r> {
    ctx: &'c mut RenderContext,
    program: Option<&'r Program>,
    texture_bound: bool,
    geometry: Option<&'r Geometry>,
}

impl<'c, 'r> PassScope<'c, 'r> {
    fn new(ctx: &'c mut RenderContext) -> Self {
        Self {
            ctx,
            program: None,
            texture_bound: false,
            geometry: None,
        }
    }

    fn bind_program(&mut self, program: &'r Program) {
        self.ctx.use_program(program);
        self.program = Some(program);
    }

    /// Points the sampler uniform at the unit, then binds the texture there.
    fn bind_texture(&mut self, sampler: &str, unit: u32, texture: &'r Texture2D) {
        if let Some(program) = self.program {
            program.set_texture_unit(self.ctx, sampler, unit);
        }
        self.ctx.bind_texture(unit, texture);
        self.texture_bound = true;
    }

    fn upload(&mut self, name: &str, value: UniformValue) {
        if let Some(program) = self.program {
            program.set(self.ctx, name, value);
        }
    }

    fn bind_geometry(&mut self, geometry: &'r Geometry) {
        self.ctx.bind_vertex_array(geometry);

        for slot in 0..geometry.attribute_count() {
            geometry.enable_attribute(slot);
        }

        self.geometry = Some(geometry);
    }

    fn draw_indexed(&mut self, geometry: &Geometry) {
        self.ctx.draw_elements(geometry);
    }
}

impl Drop for PassScope<'_, '_> {
    fn drop(&mut self) {
        if let Some(geometry) = self.geometry {
            for slot in (0..geometry.attribute_count()).rev() {
                geometry.disable_attribute(slot);
            }
            self.ctx.unbind_vertex_array();
        }

        if self.texture_bound {
            self.ctx.unbind_texture();
        }

        if self.program.is_some() {
            self.ctx.detach_program();
        }
    }
}
