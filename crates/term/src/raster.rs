//! Software rasterizer behind the [`Graphics`] trait.
//!
//! Colour is kept as straight RGBA in `[0, 1]` and depth in `[0, 1]` after the
//! viewport transform. Triangles with any vertex at or behind the eye (clip
//! `w <= 0`) are dropped whole; everything else is scan-converted over its
//! screen bounding box with perspective-correct attributes.

use glam::{Vec2, Vec3, Vec4};
use zipcar_terrain::gl::{
    Capability, GlCommand, GlState, Graphics, PrimitiveAssembler, Triangle, Vertex,
};
use zipcar_terrain::texture::TextureAtlas;

/// Triangles closer than this in clip `w` are culled.
const NEAR_W: f32 = 1e-5;

#[derive(Debug)]
pub struct Rasterizer {
    width: u32,
    height: u32,
    color: Vec<Vec4>,
    depth: Vec<f32>,
    state: GlState,
    assembler: PrimitiveAssembler,
    atlas: TextureAtlas,
    triangles: usize,
    culled: usize,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32, atlas: TextureAtlas) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![Vec4::ZERO; len],
            depth: vec![1.0; len],
            state: GlState::default(),
            assembler: PrimitiveAssembler::new(),
            atlas,
            triangles: 0,
            culled: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = width as usize * height as usize;
        self.color.clear();
        self.color.resize(len, Vec4::ZERO);
        self.depth.clear();
        self.depth.resize(len, 1.0);
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut TextureAtlas {
        &mut self.atlas
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Row-major colour buffer, top row first.
    pub fn pixels(&self) -> &[Vec4] {
        &self.color
    }

    /// Triangles rasterized and culled since the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> (usize, usize) {
        (self.triangles, self.culled)
    }

    pub fn reset_stats(&mut self) {
        self.triangles = 0;
        self.culled = 0;
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    fn clear_buffers(&mut self, color: bool, depth: bool) {
        if color {
            self.color.fill(self.state.clear_color.to_vec4());
        }
        if depth {
            self.depth.fill(self.state.clear_depth);
        }
    }

    fn draw_triangle(&mut self, tri: &Triangle) {
        let mvp = self.state.mvp();
        let clip = (*tri).map(|v| mvp * v.position.extend(1.0));
        if clip.iter().any(|c| c.w <= NEAR_W) {
            self.culled += 1;
            return;
        }
        self.triangles += 1;

        let (w, h) = (self.width as f32, self.height as f32);
        // Screen x, screen y (down), window depth, 1/w.
        let screen = clip.map(|c| {
            let ndc = c.truncate() / c.w;
            Vec4::new(
                (ndc.x + 1.0) * 0.5 * w,
                (1.0 - ndc.y) * 0.5 * h,
                (ndc.z + 1.0) * 0.5,
                1.0 / c.w,
            )
        });

        let area = edge(screen[0], screen[1], screen[2].truncate().truncate());
        if area.abs() < f32::EPSILON {
            return;
        }

        let min_x = screen.iter().map(|s| s.x).fold(f32::MAX, f32::min).floor().max(0.0) as u32;
        let max_x = screen.iter().map(|s| s.x).fold(f32::MIN, f32::max).ceil().min(w) as u32;
        let min_y = screen.iter().map(|s| s.y).fold(f32::MAX, f32::min).floor().max(0.0) as u32;
        let max_y = screen.iter().map(|s| s.y).fold(f32::MIN, f32::max).ceil().min(h) as u32;

        // Edge i is opposite vertex i, oriented so the interior is positive.
        let sign = area.signum();
        let owns_ties = [(1, 2), (2, 0), (0, 1)].map(|(a, b)| {
            let d = (screen[b] - screen[a]).truncate().truncate() * sign;
            is_top_left(d)
        });

        for py in min_y..max_y {
            for px in min_x..max_x {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let b = Vec3::new(
                    edge(screen[1], screen[2], p),
                    edge(screen[2], screen[0], p),
                    edge(screen[0], screen[1], p),
                ) / area;
                let covered = (0..3).all(|i| b[i] > 0.0 || (b[i] == 0.0 && owns_ties[i]));
                if !covered {
                    continue;
                }
                self.shade(px, py, b, &screen, tri);
            }
        }
    }

    fn shade(&mut self, px: u32, py: u32, b: Vec3, screen: &[Vec4; 3], tri: &Triangle) {
        let Some(i) = self.index(px, py) else {
            return;
        };
        let z = b.x * screen[0].z + b.y * screen[1].z + b.z * screen[2].z;
        if self.state.depth_test {
            if !self.state.depth_func.passes(z, self.depth[i]) {
                return;
            }
            self.depth[i] = z;
        }

        // Perspective-correct weights.
        let pw = Vec3::new(b.x * screen[0].w, b.y * screen[1].w, b.z * screen[2].w);
        let pw = pw / pw.element_sum();
        let lerp4 =
            |f: fn(&Vertex) -> Vec4| pw.x * f(&tri[0]) + pw.y * f(&tri[1]) + pw.z * f(&tri[2]);

        let mut src = lerp4(|v| v.color.to_vec4());
        if self.state.is_enabled(Capability::Texture2d) {
            if let Some(id) = self.state.bound_texture {
                let uv = lerp4(|v| v.uv.extend(0.0).extend(0.0));
                let t = self.atlas.sample(id, uv.x, uv.y);
                src *= Vec4::new(t[0] as f32, t[1] as f32, t[2] as f32, t[3] as f32) / 255.0;
            }
        }

        let dst = &mut self.color[i];
        *dst = if self.state.blend {
            let a = src.w;
            let rgb = src.truncate() * a + dst.truncate() * (1.0 - a);
            rgb.extend(a + dst.w * (1.0 - a))
        } else {
            src
        };
    }
}

/// Top-left fill rule: a pixel centre exactly on an edge belongs to the
/// triangle only when that edge is a top or left edge. Shared edges are then
/// drawn once. `d` is the edge direction with the interior on its positive
/// side, in y-down screen space.
fn is_top_left(d: Vec2) -> bool {
    d.y < 0.0 || (d.y == 0.0 && d.x > 0.0)
}

/// Twice the signed area of `(a, b, p)`.
fn edge(a: Vec4, b: Vec4, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl Graphics for Rasterizer {
    fn submit(&mut self, cmd: GlCommand) {
        if self.state.apply(&cmd) {
            return;
        }
        match cmd {
            GlCommand::Clear(mask) => self.clear_buffers(mask.color, mask.depth),
            GlCommand::Begin(p) => self.assembler.begin(p),
            GlCommand::Vertex(pos) => {
                if let Some(tri) = self.assembler.push(self.state.vertex(pos)) {
                    self.draw_triangle(&tri);
                }
            }
            GlCommand::End => self.assembler.end(),
            _ => {}
        }
    }

    fn state(&self) -> &GlState {
        &self.state
    }

    fn restore_state(&mut self, state: GlState) {
        self.assembler.end();
        self.state = state;
    }
}
