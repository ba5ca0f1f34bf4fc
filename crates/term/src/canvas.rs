//! Z-ordered 2D canvas with one raw graphics layer.
//!
//! Draw calls are queued with a [`ZOrder`] and composited at [`Canvas::present`]
//! in ascending z; ties keep submission order. The raw graphics layer is the
//! rasterizer's colour buffer, placed at whatever z the last
//! [`Canvas::raw_graphics`] call asked for.
//!
//! Pixel coordinates are half-cells: a `w x h` cell canvas is `w x 2h` pixels.

use zipcar_terrain::gl::{RawGraphicsHost, RawGraphicsScope};
use zipcar_terrain::texture::{ImageHandle, TextureAtlas, TextureRegion};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::raster::Rasterizer;
use crate::types::ZOrder;

/// How a pixel op combines with what is already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Replace,
    Add,
}

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    RawLayer,
    Rect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Rgb,
        blend: Blend,
    },
    /// Four arms rotated by `angle` degrees.
    Spark {
        cx: f32,
        cy: f32,
        radius: f32,
        angle: f32,
        color: Rgb,
    },
    Text {
        col: u16,
        row: u16,
        text: String,
        style: CellStyle,
    },
}

pub struct Canvas {
    cols: u16,
    rows: u16,
    rasterizer: Rasterizer,
    ops: Vec<(ZOrder, DrawOp)>,
    raw_layer: Option<ZOrder>,
    pixels: Vec<Rgb>,
    /// Text glyph per cell, cleared by any later pixel op touching the cell.
    glyphs: Vec<Option<(char, CellStyle)>>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, atlas: TextureAtlas) -> Self {
        let rasterizer = Rasterizer::new(cols as u32, rows as u32 * 2, atlas);
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            rasterizer,
            ops: Vec::new(),
            raw_layer: None,
            pixels: Vec::new(),
            glyphs: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.cols == cols && self.rows == rows {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.rasterizer.resize(cols as u32, rows as u32 * 2);
        self.pixels = vec![Rgb::BLACK; cols as usize * rows as usize * 2];
        self.glyphs = vec![None; cols as usize * rows as usize];
    }

    /// Size in cells.
    pub fn cell_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.cols as u32, self.rows as u32 * 2)
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn atlas_mut(&mut self) -> &mut TextureAtlas {
        self.rasterizer.atlas_mut()
    }

    /// Drop everything queued since the last present.
    pub fn begin_frame(&mut self) {
        self.ops.clear();
        self.raw_layer = None;
        self.rasterizer.reset_stats();
    }

    pub fn fill_rect(&mut self, z: ZOrder, x: i32, y: i32, w: u32, h: u32, color: Rgb) {
        self.ops.push((
            z,
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                color,
                blend: Blend::Replace,
            },
        ));
    }

    pub fn add_rect(&mut self, z: ZOrder, x: i32, y: i32, w: u32, h: u32, color: Rgb) {
        self.ops.push((
            z,
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                color,
                blend: Blend::Add,
            },
        ));
    }

    /// Additively drawn four-armed spark, used for stars.
    pub fn spark(&mut self, z: ZOrder, cx: f32, cy: f32, radius: f32, angle: f32, color: Rgb) {
        self.ops.push((
            z,
            DrawOp::Spark {
                cx,
                cy,
                radius,
                angle,
                color,
            },
        ));
    }

    pub fn text(&mut self, z: ZOrder, col: u16, row: u16, text: impl Into<String>, style: CellStyle) {
        self.ops.push((
            z,
            DrawOp::Text {
                col,
                row,
                text: text.into(),
                style,
            },
        ));
    }

    /// Composite every queued op into `fb` and start a new frame.
    pub fn present(&mut self, fb: &mut FrameBuffer) {
        if let Some(z) = self.raw_layer {
            self.ops.insert(0, (z, DrawOp::RawLayer));
        }
        // Stable: equal layers keep submission order.
        self.ops.sort_by_key(|(z, _)| *z);

        self.pixels.fill(Rgb::BLACK);
        self.glyphs.fill(None);
        let ops = std::mem::take(&mut self.ops);
        for (_, op) in &ops {
            self.composite(op);
        }
        self.ops = ops;

        fb.resize(self.cols, self.rows);
        let w = self.cols as usize;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.pixels[row as usize * 2 * w + col as usize];
                let bottom = self.pixels[(row as usize * 2 + 1) * w + col as usize];
                let cell = match self.glyphs[row as usize * w + col as usize] {
                    Some((ch, style)) => Cell {
                        ch,
                        style: CellStyle { bg: top, ..style },
                    },
                    None => Cell::pixels(top, bottom),
                };
                fb.set(col, row, cell);
            }
        }
        self.begin_frame();
    }

    fn composite(&mut self, op: &DrawOp) {
        match op {
            DrawOp::RawLayer => {
                for (dst, src) in self.pixels.iter_mut().zip(self.rasterizer.pixels()) {
                    *dst = Rgb::from_unit(*src);
                }
                self.glyphs.fill(None);
            }
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                color,
                blend,
            } => {
                for py in *y..*y + *h as i32 {
                    for px in *x..*x + *w as i32 {
                        self.plot(px, py, *color, *blend);
                    }
                }
            }
            DrawOp::Spark {
                cx,
                cy,
                radius,
                angle,
                color,
            } => {
                self.plot(cx.round() as i32, cy.round() as i32, *color, Blend::Add);
                let steps = radius.ceil().max(0.0) as i32;
                for arm in 0..4 {
                    let theta = (angle + arm as f32 * 90.0).to_radians();
                    let (s, c) = theta.sin_cos();
                    for i in 1..=steps {
                        let t = i as f32;
                        let fade = 1.0 - t / (steps as f32 + 1.0);
                        let px = (cx + c * t).round() as i32;
                        let py = (cy + s * t).round() as i32;
                        self.plot(px, py, color.scale(fade), Blend::Add);
                    }
                }
            }
            DrawOp::Text {
                col,
                row,
                text,
                style,
            } => {
                if *row >= self.rows {
                    return;
                }
                let w = self.cols as usize;
                for (c, ch) in (*col..self.cols).zip(text.chars()) {
                    self.glyphs[*row as usize * w + c as usize] = Some((ch, *style));
                }
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Rgb, blend: Blend) {
        let (pw, ph) = self.pixel_size();
        if x < 0 || y < 0 || x as u32 >= pw || y as u32 >= ph {
            return;
        }
        let i = y as usize * pw as usize + x as usize;
        self.pixels[i] = match blend {
            Blend::Replace => color,
            Blend::Add => self.pixels[i].add(color),
        };
        self.glyphs[(y as usize / 2) * self.cols as usize + x as usize] = None;
    }
}

impl RawGraphicsHost for Canvas {
    type Backend = Rasterizer;

    fn raw_graphics(&mut self, z: ZOrder) -> RawGraphicsScope<'_, Rasterizer> {
        self.raw_layer = Some(z);
        RawGraphicsScope::enter(&mut self.rasterizer)
    }

    fn texture_region(&self, image: ImageHandle) -> Option<TextureRegion> {
        self.rasterizer.atlas().tex_info(image)
    }
}
