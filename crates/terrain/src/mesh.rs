//! Per-frame terrain mesh.
//!
//! Each grid cell becomes its own 4-vertex triangle strip. The whole texture
//! region is stretched over every cell, so neighbouring cells repeat the image
//! instead of sharing one large mapping.

use glam::{Vec2, Vec3};

use crate::gl::{Graphics, Primitive, Rgba};
use crate::height_field::HeightField;
use crate::texture::TextureRegion;

/// One terrain vertex: the height doubles as depth and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub alpha: f32,
}

/// Strips for `(rows - 1) * (cols - 1)` cells, four vertices each.
#[derive(Debug, Clone, Default)]
pub struct TerrainMesh {
    vertices: Vec<MeshVertex>,
}

impl TerrainMesh {
    pub fn build<R>(field: &HeightField<R>, region: &TextureRegion) -> Self {
        let mut mesh = Self::default();
        mesh.build_into(field, region);
        mesh
    }

    /// Rebuild in place, keeping the vertex allocation.
    pub fn build_into<R>(&mut self, field: &HeightField<R>, region: &TextureRegion) {
        let rows = field.rows();
        let cols = field.cols();
        let offs = field.scroll_fraction();
        let x_step = 1.0 / (cols - 1) as f32;
        // One row hangs past the far edge, so the field can slide a full row.
        let y_step = 1.0 / rows.saturating_sub(2).max(1) as f32;

        let corners = [
            Vec2::new(region.left, region.top),
            Vec2::new(region.left, region.bottom),
            Vec2::new(region.right, region.top),
            Vec2::new(region.right, region.bottom),
        ];

        self.vertices.clear();
        self.vertices.reserve((rows - 1) * (cols - 1) * 4);
        for r in 0..rows - 1 {
            for c in 0..cols - 1 {
                let cell = [(r, c), (r + 1, c), (r, c + 1), (r + 1, c + 1)];
                for ((vr, vc), uv) in cell.into_iter().zip(corners) {
                    let h = field.sample(vr, vc);
                    let x = -0.5 + vc as f32 * x_step;
                    let y = -0.5 + (vr as f32 - offs) * y_step;
                    self.vertices.push(MeshVertex {
                        position: Vec3::new(x, y, h),
                        uv,
                        alpha: h,
                    });
                }
            }
        }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Strips of four vertices, one per cell.
    pub fn cells(&self) -> impl Iterator<Item = &[MeshVertex]> {
        self.vertices.chunks_exact(4)
    }

    pub fn cell_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Two per cell.
    pub fn triangle_count(&self) -> usize {
        self.cell_count() * 2
    }

    /// Submit every cell as a white, height-tinted triangle strip.
    pub fn submit<G: Graphics + ?Sized>(&self, gfx: &mut G) {
        for cell in self.cells() {
            gfx.begin(Primitive::TriangleStrip);
            for v in cell {
                gfx.color(Rgba::new(1.0, 1.0, 1.0, v.alpha));
                gfx.tex_coord(v.uv.x, v.uv.y);
                gfx.vertex(v.position.x, v.position.y, v.position.z);
            }
            gfx.end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipcar_core::rng::{ConstantSource, SimpleRng};

    fn unit_region() -> TextureRegion {
        TextureRegion {
            texture: 0,
            left: 0.0,
            top: 0.0,
            right: 1.0,
            bottom: 1.0,
        }
    }

    #[test]
    fn default_field_builds_36_cells() {
        let field = HeightField::seeded(3);
        let mesh = TerrainMesh::build(&field, &unit_region());
        assert_eq!(mesh.cell_count(), 36);
        assert_eq!(mesh.triangle_count(), 72);
        assert_eq!(mesh.vertices().len(), 144);
    }

    #[test]
    fn first_cell_spans_one_grid_step() {
        let field = HeightField::new(7, 7, ConstantSource::new(0.25));
        let mesh = TerrainMesh::build(&field, &unit_region());
        let cell = mesh.cells().next().unwrap();
        let step_x = 1.0 / 6.0;
        let step_y = 1.0 / 5.0;
        assert_eq!(cell[0].position, Vec3::new(-0.5, -0.5, 0.25));
        assert!((cell[1].position.y - (-0.5 + step_y)).abs() < 1e-6);
        assert!((cell[2].position.x - (-0.5 + step_x)).abs() < 1e-6);
        assert_eq!(cell[3].uv, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn last_column_reaches_the_right_edge() {
        let field = HeightField::seeded(9);
        let mesh = TerrainMesh::build(&field, &unit_region());
        let max_x = mesh
            .vertices()
            .iter()
            .map(|v| v.position.x)
            .fold(f32::MIN, f32::max);
        assert!((max_x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scroll_fraction_slides_rows_down() {
        let mut field = HeightField::with_cadence(4, 3, 4, SimpleRng::new(2));
        let before = TerrainMesh::build(&field, &unit_region());
        field.advance();
        field.advance();
        let after = TerrainMesh::build(&field, &unit_region());
        let dy = before.vertices()[0].position.y - after.vertices()[0].position.y;
        // Half a cadence moves half a row; rows are 1/(4-2) apart.
        assert!((dy - 0.25).abs() < 1e-6, "dy = {dy}");
    }

    #[test]
    fn uvs_come_from_the_region_corners() {
        let region = TextureRegion {
            texture: 2,
            left: 0.25,
            top: 0.5,
            right: 0.75,
            bottom: 1.0,
        };
        let field = HeightField::seeded(1);
        let mesh = TerrainMesh::build(&field, &region);
        for cell in mesh.cells() {
            let uvs: Vec<_> = cell.iter().map(|v| (v.uv.x, v.uv.y)).collect();
            assert_eq!(uvs, vec![(0.25, 0.5), (0.25, 1.0), (0.75, 0.5), (0.75, 1.0)]);
        }
    }

    #[test]
    fn rebuild_reuses_the_buffer() {
        let field = HeightField::seeded(1);
        let mut mesh = TerrainMesh::default();
        mesh.build_into(&field, &unit_region());
        mesh.build_into(&field, &unit_region());
        assert_eq!(mesh.cell_count(), 36);
    }
}
