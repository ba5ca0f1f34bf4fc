//! The scrolling terrain layer.

use tracing::{debug, warn};

use crate::gl::{Capability, ClearMask, DepthFunc, Graphics, MatrixMode, RawGraphicsHost};
use crate::height_field::HeightField;
use crate::mesh::TerrainMesh;
use crate::texture::{ImageHandle, TextureRegion};
use crate::types::ZOrder;

/// Clear colour behind the terrain: a deep sky blue.
pub const SKY: [f32; 4] = [0.0, 0.2, 0.5, 1.0];

/// Render `field` textured with `region` into a raw graphics scope at `z`.
///
/// With no region nothing is drawn; the scope is still entered and left, so
/// the host's state comes back untouched either way. Returns the number of
/// triangles submitted.
pub fn render<H, R>(
    host: &mut H,
    field: &HeightField<R>,
    region: Option<TextureRegion>,
    z: ZOrder,
) -> usize
where
    H: RawGraphicsHost + ?Sized,
{
    let mut mesh = TerrainMesh::default();
    render_with(host, field, region, z, &mut mesh)
}

fn render_with<H, R>(
    host: &mut H,
    field: &HeightField<R>,
    region: Option<TextureRegion>,
    z: ZOrder,
    mesh: &mut TerrainMesh,
) -> usize
where
    H: RawGraphicsHost + ?Sized,
{
    let mut gfx = host.raw_graphics(z);

    gfx.clear_color(SKY[0], SKY[1], SKY[2], SKY[3]);
    gfx.clear_depth(0.0);
    gfx.clear(ClearMask::COLOR | ClearMask::DEPTH);

    let Some(region) = region else {
        return 0;
    };

    // Cleared to 0, so every fragment passes until a nearer one lands.
    gfx.depth_func(DepthFunc::GEqual);
    gfx.enable(Capability::DepthTest);
    gfx.enable(Capability::Blend);

    gfx.matrix_mode(MatrixMode::Projection);
    gfx.load_identity();
    gfx.frustum(-0.10, 0.10, -0.075, 0.075, 1.0, 100.0);
    gfx.matrix_mode(MatrixMode::ModelView);
    gfx.load_identity();
    gfx.translate(0.0, 0.0, -4.0);

    gfx.enable(Capability::Texture2d);
    gfx.bind_texture(region.texture);

    mesh.build_into(field, &region);
    mesh.submit(&mut *gfx);
    mesh.triangle_count()
}

/// A height field plus the image it is textured with.
#[derive(Debug, Clone)]
pub struct Background<R = zipcar_core::rng::SimpleRng> {
    field: HeightField<R>,
    image: ImageHandle,
    mesh: TerrainMesh,
    region_missing: bool,
}

impl<R> Background<R> {
    pub fn new(field: HeightField<R>, image: ImageHandle) -> Self {
        Self {
            field,
            image,
            mesh: TerrainMesh::default(),
            region_missing: false,
        }
    }

    pub fn field(&self) -> &HeightField<R> {
        &self.field
    }

    pub fn image(&self) -> ImageHandle {
        self.image
    }

    /// Draw at `z`, looking the texture region up afresh.
    pub fn draw<H: RawGraphicsHost + ?Sized>(&mut self, host: &mut H, z: ZOrder) -> usize {
        let region = host.texture_region(self.image);
        match (region.is_some(), self.region_missing) {
            (false, false) => {
                warn!(
                    image = ?self.image,
                    layer = z.as_str(),
                    "terrain texture has no region; skipping terrain"
                );
                self.region_missing = true;
            }
            (true, true) => {
                debug!(
                    image = ?self.image,
                    layer = z.as_str(),
                    "terrain texture region is back"
                );
                self.region_missing = false;
            }
            _ => {}
        }
        render_with(host, &self.field, region, z, &mut self.mesh)
    }
}

impl<R: zipcar_core::rng::RandomSource> Background<R> {
    /// Advance the terrain by one frame.
    pub fn scroll(&mut self) {
        self.field.advance();
    }
}
