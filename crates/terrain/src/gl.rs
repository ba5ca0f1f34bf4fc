//! Immediate-mode graphics API.
//!
//! A deliberately small fixed-function surface: state toggles, two matrix
//! stacks of depth one, a bound texture and `begin`/`vertex`/`end` submission.
//! Every call is a [`GlCommand`]; backends implement [`Graphics::submit`] and
//! get the familiar call-style helpers for free.
//!
//! Raw graphics always run inside a [`RawGraphicsScope`], which snapshots the
//! full [`GlState`] on entry and puts it back when dropped, on every exit path.

use std::ops::{BitOr, Deref, DerefMut};

use arrayvec::ArrayVec;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::texture::{ImageHandle, TextureId, TextureRegion};
use crate::types::ZOrder;

/// Straight (non-premultiplied) RGBA colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    Blend,
    Texture2d,
}

/// Depth comparison, applied as `incoming <op> stored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthFunc {
    Never,
    #[default]
    Less,
    Equal,
    LEqual,
    Greater,
    NotEqual,
    GEqual,
    Always,
}

impl DepthFunc {
    pub fn passes(self, incoming: f32, stored: f32) -> bool {
        match self {
            DepthFunc::Never => false,
            DepthFunc::Less => incoming < stored,
            DepthFunc::Equal => incoming == stored,
            DepthFunc::LEqual => incoming <= stored,
            DepthFunc::Greater => incoming > stored,
            DepthFunc::NotEqual => incoming != stored,
            DepthFunc::GEqual => incoming >= stored,
            DepthFunc::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMode {
    Projection,
    #[default]
    ModelView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

/// Which buffers a clear touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR: ClearMask = ClearMask {
        color: true,
        depth: false,
    };
    pub const DEPTH: ClearMask = ClearMask {
        color: false,
        depth: true,
    };
}

impl BitOr for ClearMask {
    type Output = ClearMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ClearMask {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

/// One immediate-mode call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlCommand {
    ClearColor(Rgba),
    ClearDepth(f32),
    Clear(ClearMask),
    DepthFunc(DepthFunc),
    Enable(Capability),
    Disable(Capability),
    MatrixMode(MatrixMode),
    LoadIdentity,
    /// Multiply the current matrix by a perspective frustum.
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Translate(Vec3),
    BindTexture(TextureId),
    Begin(Primitive),
    Color(Rgba),
    TexCoord(Vec2),
    Vertex(Vec3),
    End,
}

/// Everything a raw graphics scope saves and restores.
#[derive(Debug, Clone, PartialEq)]
pub struct GlState {
    pub clear_color: Rgba,
    pub clear_depth: f32,
    pub depth_func: DepthFunc,
    pub depth_test: bool,
    pub blend: bool,
    pub texture_2d: bool,
    pub matrix_mode: MatrixMode,
    pub projection: Mat4,
    pub modelview: Mat4,
    pub bound_texture: Option<TextureId>,
    pub current_color: Rgba,
    pub current_tex_coord: Vec2,
}

impl Default for GlState {
    fn default() -> Self {
        Self {
            clear_color: Rgba::TRANSPARENT,
            clear_depth: 1.0,
            depth_func: DepthFunc::Less,
            depth_test: false,
            blend: false,
            texture_2d: false,
            matrix_mode: MatrixMode::ModelView,
            projection: Mat4::IDENTITY,
            modelview: Mat4::IDENTITY,
            bound_texture: None,
            current_color: Rgba::WHITE,
            current_tex_coord: Vec2::ZERO,
        }
    }
}

impl GlState {
    /// Apply a state-changing command. Returns `false` for commands that are
    /// not pure state (clears and primitive submission), which backends handle.
    pub fn apply(&mut self, cmd: &GlCommand) -> bool {
        match *cmd {
            GlCommand::ClearColor(c) => self.clear_color = c,
            GlCommand::ClearDepth(d) => self.clear_depth = d.clamp(0.0, 1.0),
            GlCommand::DepthFunc(f) => self.depth_func = f,
            GlCommand::Enable(cap) => self.set_capability(cap, true),
            GlCommand::Disable(cap) => self.set_capability(cap, false),
            GlCommand::MatrixMode(m) => self.matrix_mode = m,
            GlCommand::LoadIdentity => *self.current_matrix_mut() = Mat4::IDENTITY,
            GlCommand::Frustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => {
                let m = frustum(left, right, bottom, top, near, far);
                let cur = self.current_matrix_mut();
                *cur = *cur * m;
            }
            GlCommand::Translate(t) => {
                let cur = self.current_matrix_mut();
                *cur = *cur * Mat4::from_translation(t);
            }
            GlCommand::BindTexture(id) => self.bound_texture = Some(id),
            GlCommand::Color(c) => self.current_color = c,
            GlCommand::TexCoord(uv) => self.current_tex_coord = uv,
            GlCommand::Clear(_) | GlCommand::Begin(_) | GlCommand::Vertex(_) | GlCommand::End => {
                return false
            }
        }
        true
    }

    pub fn is_enabled(&self, cap: Capability) -> bool {
        match cap {
            Capability::DepthTest => self.depth_test,
            Capability::Blend => self.blend,
            Capability::Texture2d => self.texture_2d,
        }
    }

    fn set_capability(&mut self, cap: Capability, on: bool) {
        match cap {
            Capability::DepthTest => self.depth_test = on,
            Capability::Blend => self.blend = on,
            Capability::Texture2d => self.texture_2d = on,
        }
    }

    fn current_matrix_mut(&mut self) -> &mut Mat4 {
        match self.matrix_mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.modelview,
        }
    }

    /// Combined object-to-clip transform.
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.modelview
    }

    /// Vertex at `position` carrying the current colour and texture coordinate.
    pub fn vertex(&self, position: Vec3) -> Vertex {
        Vertex {
            position,
            color: self.current_color,
            uv: self.current_tex_coord,
        }
    }
}

/// Column-major perspective frustum, as the fixed-function pipeline builds it.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = right - left;
    let tb = top - bottom;
    let fnr = far - near;
    Mat4::from_cols(
        Vec4::new(2.0 * near / rl, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / tb, 0.0, 0.0),
        Vec4::new((right + left) / rl, (top + bottom) / tb, -(far + near) / fnr, -1.0),
        Vec4::new(0.0, 0.0, -2.0 * far * near / fnr, 0.0),
    )
}

/// A submitted vertex with its attributes resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Rgba,
    pub uv: Vec2,
}

pub type Triangle = [Vertex; 3];

/// Turns a `begin`/`vertex`/`end` stream into triangles.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveAssembler {
    mode: Option<Primitive>,
    pending: ArrayVec<Vertex, 3>,
    /// Triangles emitted by the current strip, for winding parity.
    strip_index: usize,
}

impl PrimitiveAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    /// Start a primitive. An unterminated one is discarded.
    pub fn begin(&mut self, mode: Primitive) {
        self.mode = Some(mode);
        self.pending.clear();
        self.strip_index = 0;
    }

    /// Feed one vertex; returns a triangle when one completes.
    ///
    /// Vertices outside `begin`/`end` are ignored.
    pub fn push(&mut self, v: Vertex) -> Option<Triangle> {
        match self.mode? {
            Primitive::Triangles => {
                self.pending.push(v);
                if self.pending.is_full() {
                    let tri = [self.pending[0], self.pending[1], self.pending[2]];
                    self.pending.clear();
                    Some(tri)
                } else {
                    None
                }
            }
            Primitive::TriangleStrip => {
                if self.pending.len() < 2 {
                    self.pending.push(v);
                    return None;
                }
                let (a, b) = (self.pending[0], self.pending[1]);
                // Odd triangles swap their first two vertices to keep a consistent winding.
                let tri = if self.strip_index % 2 == 0 {
                    [a, b, v]
                } else {
                    [b, a, v]
                };
                self.strip_index += 1;
                self.pending[0] = b;
                self.pending[1] = v;
                Some(tri)
            }
        }
    }

    pub fn end(&mut self) {
        self.mode = None;
        self.pending.clear();
        self.strip_index = 0;
    }
}

/// An immediate-mode graphics backend.
pub trait Graphics {
    /// Execute one command.
    fn submit(&mut self, cmd: GlCommand);

    fn state(&self) -> &GlState;

    /// Replace the whole state, abandoning any open primitive.
    fn restore_state(&mut self, state: GlState);

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.submit(GlCommand::ClearColor(Rgba::new(r, g, b, a)));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.submit(GlCommand::ClearDepth(depth));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.submit(GlCommand::Clear(mask));
    }

    fn depth_func(&mut self, func: DepthFunc) {
        self.submit(GlCommand::DepthFunc(func));
    }

    fn enable(&mut self, cap: Capability) {
        self.submit(GlCommand::Enable(cap));
    }

    fn disable(&mut self, cap: Capability) {
        self.submit(GlCommand::Disable(cap));
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.submit(GlCommand::MatrixMode(mode));
    }

    fn load_identity(&mut self) {
        self.submit(GlCommand::LoadIdentity);
    }

    fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.submit(GlCommand::Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        });
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.submit(GlCommand::Translate(Vec3::new(x, y, z)));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.submit(GlCommand::BindTexture(texture));
    }

    fn begin(&mut self, primitive: Primitive) {
        self.submit(GlCommand::Begin(primitive));
    }

    fn color(&mut self, color: Rgba) {
        self.submit(GlCommand::Color(color));
    }

    fn tex_coord(&mut self, u: f32, v: f32) {
        self.submit(GlCommand::TexCoord(Vec2::new(u, v)));
    }

    fn vertex(&mut self, x: f32, y: f32, z: f32) {
        self.submit(GlCommand::Vertex(Vec3::new(x, y, z)));
    }

    fn end(&mut self) {
        self.submit(GlCommand::End);
    }
}

/// Saves the graphics state on entry and restores it on drop.
///
/// Dereferences to the backend, so raw calls go straight through.
pub struct RawGraphicsScope<'a, G: Graphics + ?Sized> {
    gfx: &'a mut G,
    saved: Option<GlState>,
}

impl<'a, G: Graphics + ?Sized> RawGraphicsScope<'a, G> {
    pub fn enter(gfx: &'a mut G) -> Self {
        let saved = gfx.state().clone();
        Self {
            gfx,
            saved: Some(saved),
        }
    }
}

impl<G: Graphics + ?Sized> Deref for RawGraphicsScope<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.gfx
    }
}

impl<G: Graphics + ?Sized> DerefMut for RawGraphicsScope<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.gfx
    }
}

impl<G: Graphics + ?Sized> Drop for RawGraphicsScope<'_, G> {
    fn drop(&mut self) {
        if let Some(state) = self.saved.take() {
            self.gfx.restore_state(state);
        }
    }
}

/// A 2D renderer that can hand out raw graphics access at a draw layer.
pub trait RawGraphicsHost {
    type Backend: Graphics + ?Sized;

    /// Enter a raw graphics scope whose output composites at layer `z`.
    fn raw_graphics(&mut self, z: ZOrder) -> RawGraphicsScope<'_, Self::Backend>;

    /// Where `image` lives in the backing textures, if it fits in one.
    fn texture_region(&self, image: ImageHandle) -> Option<TextureRegion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32) -> Vertex {
        Vertex {
            position: Vec3::new(x, 0.0, 0.0),
            color: Rgba::WHITE,
            uv: Vec2::ZERO,
        }
    }

    #[test]
    fn strip_of_four_yields_two_triangles() {
        let mut pa = PrimitiveAssembler::new();
        pa.begin(Primitive::TriangleStrip);
        let tris: Vec<_> = (0..4).filter_map(|i| pa.push(v(i as f32))).collect();
        pa.end();
        assert_eq!(tris.len(), 2);
        let xs = |t: &Triangle| (*t).map(|v| v.position.x);
        assert_eq!(xs(&tris[0]), [0.0, 1.0, 2.0]);
        assert_eq!(xs(&tris[1]), [2.0, 1.0, 3.0]);
    }

    #[test]
    fn triangles_mode_groups_by_three() {
        let mut pa = PrimitiveAssembler::new();
        pa.begin(Primitive::Triangles);
        let n = (0..7).filter_map(|i| pa.push(v(i as f32))).count();
        assert_eq!(n, 2);
    }

    #[test]
    fn vertices_outside_begin_are_ignored() {
        let mut pa = PrimitiveAssembler::new();
        assert!(pa.push(v(0.0)).is_none());
        assert!(!pa.is_open());
    }

    #[test]
    fn depth_func_comparisons() {
        assert!(DepthFunc::GEqual.passes(0.5, 0.5));
        assert!(DepthFunc::GEqual.passes(0.6, 0.5));
        assert!(!DepthFunc::GEqual.passes(0.4, 0.5));
        assert!(!DepthFunc::Less.passes(0.5, 0.5));
        assert!(DepthFunc::Always.passes(0.0, 1.0));
    }

    #[test]
    fn state_applies_matrix_ops_to_current_mode() {
        let mut st = GlState::default();
        st.apply(&GlCommand::MatrixMode(MatrixMode::Projection));
        st.apply(&GlCommand::Translate(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(st.modelview, Mat4::IDENTITY);
        assert_eq!(st.projection.w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
        st.apply(&GlCommand::LoadIdentity);
        assert_eq!(st.projection, Mat4::IDENTITY);
    }

    #[test]
    fn frustum_maps_near_plane_corners_to_ndc_corners() {
        let m = frustum(-0.1, 0.1, -0.075, 0.075, 1.0, 100.0);
        let clip = m * Vec4::new(0.1, 0.075, -1.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!((ndc.x - 1.0).abs() < 1e-5);
        assert!((ndc.y - 1.0).abs() < 1e-5);
        assert!((ndc.z + 1.0).abs() < 1e-5);

        let far = m * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn clear_mask_combines() {
        let both = ClearMask::COLOR | ClearMask::DEPTH;
        assert!(both.color && both.depth);
    }
}
