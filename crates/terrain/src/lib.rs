//! Terrain module - the scrolling, textured height-field background
//!
//! Everything here draws through the [`gl::Graphics`] trait, an immediate-mode
//! surface with fixed-function state. Any backend works: the terminal
//! rasterizer in `zipcar-term`, or [`recording::RecordingGraphics`] in tests.
//!
//! # Module Structure
//!
//! - [`height_field`]: The scrolling grid of height samples
//! - [`mesh`]: Per-frame triangle strips built from the field
//! - [`background`]: Graphics state setup and submission inside a raw scope
//! - [`gl`]: Commands, state, primitive assembly and the scope guard
//! - [`texture`]: Images, backing textures and the atlas
//! - [`recording`]: A backend that records commands and triangles
//!
//! # Example
//!
//! ```
//! use zipcar_terrain::{render, HeightField, Image, RecordingGraphics, RawGraphicsHost};
//! use zipcar_terrain::types::ZOrder;
//!
//! let mut gfx = RecordingGraphics::new();
//! let image = gfx.atlas_mut().insert(&Image::procedural_earth(32, 32, 7));
//! let region = gfx.texture_region(image);
//!
//! let field = HeightField::seeded(7);
//! let triangles = render(&mut gfx, &field, region, ZOrder::Background);
//! assert_eq!(triangles, 72);
//! ```

pub mod background;
pub mod gl;
pub mod height_field;
pub mod mesh;
pub mod recording;
pub mod texture;

pub use zipcar_types as types;

pub use background::{render, Background};
pub use gl::{
    Capability, ClearMask, DepthFunc, GlCommand, GlState, Graphics, MatrixMode, Primitive,
    RawGraphicsHost, RawGraphicsScope, Rgba, Triangle, Vertex,
};
pub use height_field::HeightField;
pub use mesh::{MeshVertex, TerrainMesh};
pub use recording::RecordingGraphics;
pub use texture::{Image, ImageHandle, TextureAtlas, TextureError, TextureId, TextureRegion};
