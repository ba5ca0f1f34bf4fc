//! Images, backing textures and the atlas that places one into the other.
//!
//! Small images share square backing pages (shelf packed). Tileable images get
//! a texture of their own so wrap addressing repeats the whole image. Images
//! larger than the maximum texture size are split into tiles and have no single
//! [`TextureRegion`], so [`TextureAtlas::tex_info`] returns `None` for them.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use zipcar_core::rng::{RandomSource, SimpleRng};

use crate::types::MAX_TEXTURE_SIZE;

/// Name of a backing texture.
pub type TextureId = u32;

pub type Rgba8 = [u8; 4];

/// Handle to an image inserted into a [`TextureAtlas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(u32);

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image has zero width or height")]
    Empty,
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Where an image lives inside a backing texture, in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    pub texture: TextureId,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// An RGBA8 image in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    tileable: bool,
}

impl Image {
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<Rgba8>,
        tileable: bool,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            tileable,
        })
    }

    pub fn from_fn(
        width: u32,
        height: u32,
        tileable: bool,
        mut f: impl FnMut(u32, u32) -> Rgba8,
    ) -> Result<Self, TextureError> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::from_pixels(width, height, pixels, tileable)
    }

    /// Load any format the `image` crate understands.
    pub fn load(path: impl AsRef<Path>, tileable: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        debug!(path = %path.display(), width, height, tileable, "loaded image");
        Self::from_pixels(width, height, pixels, tileable)
    }

    /// Load an image meant to repeat seamlessly (wrap, not clamp).
    pub fn load_tileable(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        Self::load(path, true)
    }

    /// A seamless land-and-sea texture built from wrapped value noise.
    pub fn procedural_earth(width: u32, height: u32, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let coarse = NoiseLattice::new(4, &mut rng);
        let fine = NoiseLattice::new(16, &mut rng);
        let width = width.max(1);
        let height = height.max(1);
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                let u = x as f32 / width as f32;
                let v = y as f32 / height as f32;
                let h = 0.75 * coarse.sample(u, v) + 0.25 * fine.sample(u, v);
                earth_palette(h)
            })
            .collect();
        Self {
            width,
            height,
            pixels,
            tileable: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_tileable(&self) -> bool {
        self.tileable
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[(y * self.width + x) as usize]
    }

    fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<Rgba8> {
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for row in y..y + h {
            let start = (row * self.width + x) as usize;
            out.extend_from_slice(&self.pixels[start..start + w as usize]);
        }
        out
    }
}

/// Periodic grid of random values, bilinearly interpolated with smoothstep.
struct NoiseLattice {
    size: usize,
    values: Vec<f32>,
}

impl NoiseLattice {
    fn new(size: usize, rng: &mut impl RandomSource) -> Self {
        let values = (0..size * size).map(|_| rng.next_unit()).collect();
        Self { size, values }
    }

    fn at(&self, x: usize, y: usize) -> f32 {
        self.values[(y % self.size) * self.size + (x % self.size)]
    }

    fn sample(&self, u: f32, v: f32) -> f32 {
        let fx = u * self.size as f32;
        let fy = v * self.size as f32;
        let (x0, y0) = (fx.floor() as usize, fy.floor() as usize);
        let smooth = |t: f32| t * t * (3.0 - 2.0 * t);
        let tx = smooth(fx.fract());
        let ty = smooth(fy.fract());
        let top = lerp(self.at(x0, y0), self.at(x0 + 1, y0), tx);
        let bottom = lerp(self.at(x0, y0 + 1), self.at(x0 + 1, y0 + 1), tx);
        lerp(top, bottom, ty)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn earth_palette(h: f32) -> Rgba8 {
    let shade = |base: [f32; 3], k: f32| -> Rgba8 {
        [
            (base[0] * k).min(255.0) as u8,
            (base[1] * k).min(255.0) as u8,
            (base[2] * k).min(255.0) as u8,
            255,
        ]
    };
    match h {
        h if h < 0.42 => shade([20.0, 60.0, 140.0], 0.7 + h),
        h if h < 0.48 => shade([194.0, 178.0, 128.0], 1.0),
        h if h < 0.68 => shade([40.0, 130.0, 50.0], 0.6 + h),
        h if h < 0.80 => shade([110.0, 90.0, 60.0], 0.5 + h),
        _ => shade([230.0, 230.0, 235.0], 1.0),
    }
}

/// Pixel storage for one texture name.
#[derive(Debug, Clone)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    wrap: bool,
}

impl Texture {
    fn blank(id: TextureId, width: u32, height: u32, wrap: bool) -> Self {
        Self {
            id,
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; width as usize * height as usize],
            wrap,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    fn blit(&mut self, x: u32, y: u32, w: u32, src: &[Rgba8]) {
        for (row, line) in src.chunks_exact(w as usize).enumerate() {
            let start = ((y + row as u32) * self.width + x) as usize;
            self.pixels[start..start + w as usize].copy_from_slice(line);
        }
    }

    /// Nearest-neighbour lookup at normalized `(u, v)`.
    pub fn sample(&self, u: f32, v: f32) -> Rgba8 {
        let x = self.texel(u, self.width);
        let y = self.texel(v, self.height);
        self.pixels[y * self.width as usize + x]
    }

    fn texel(&self, t: f32, size: u32) -> usize {
        let t = if self.wrap {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        };
        ((t * size as f32) as usize).min(size as usize - 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

#[derive(Debug, Clone)]
struct Page {
    texture: usize,
    shelves: Vec<Shelf>,
    next_y: u32,
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Region(TextureRegion),
    Split { tiles: usize },
}

/// Places images into backing textures.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    max_size: u32,
    textures: Vec<Texture>,
    pages: Vec<Page>,
    placements: Vec<Placement>,
}

impl TextureAtlas {
    pub fn new(max_size: u32) -> Self {
        Self {
            max_size: max_size.max(1),
            textures: Vec::new(),
            pages: Vec::new(),
            placements: Vec::new(),
        }
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id as usize)
    }

    pub fn insert(&mut self, image: &Image) -> ImageHandle {
        let handle = ImageHandle(self.placements.len() as u32);
        let placement = if image.width > self.max_size || image.height > self.max_size {
            self.insert_split(image)
        } else if image.tileable {
            self.insert_dedicated(image)
        } else {
            self.insert_packed(image)
        };
        match placement {
            Placement::Region(r) => debug!(
                handle = handle.0,
                texture = r.texture,
                width = image.width,
                height = image.height,
                "placed image"
            ),
            Placement::Split { tiles } => debug!(
                handle = handle.0,
                tiles,
                max_size = self.max_size,
                "image exceeds max texture size, split into tiles"
            ),
        }
        self.placements.push(placement);
        handle
    }

    /// Backing texture and UV rect for `image`, or `None` if it was split.
    pub fn tex_info(&self, image: ImageHandle) -> Option<TextureRegion> {
        match self.placements.get(image.0 as usize)? {
            Placement::Region(r) => Some(*r),
            Placement::Split { .. } => None,
        }
    }

    /// Sample the texture `id` at `(u, v)`; unknown names read as transparent.
    pub fn sample(&self, id: TextureId, u: f32, v: f32) -> Rgba8 {
        self.texture(id).map_or([0, 0, 0, 0], |t| t.sample(u, v))
    }

    fn new_texture(&mut self, width: u32, height: u32, wrap: bool) -> usize {
        let index = self.textures.len();
        self.textures
            .push(Texture::blank(index as TextureId, width, height, wrap));
        index
    }

    fn insert_dedicated(&mut self, image: &Image) -> Placement {
        let index = self.new_texture(image.width, image.height, image.tileable);
        self.textures[index].pixels.copy_from_slice(&image.pixels);
        Placement::Region(TextureRegion {
            texture: index as TextureId,
            left: 0.0,
            top: 0.0,
            right: 1.0,
            bottom: 1.0,
        })
    }

    fn insert_split(&mut self, image: &Image) -> Placement {
        let mut tiles = 0;
        let mut y = 0;
        while y < image.height {
            let h = self.max_size.min(image.height - y);
            let mut x = 0;
            while x < image.width {
                let w = self.max_size.min(image.width - x);
                let index = self.new_texture(w, h, false);
                let pixels = image.crop(x, y, w, h);
                self.textures[index].blit(0, 0, w, &pixels);
                tiles += 1;
                x += w;
            }
            y += h;
        }
        Placement::Split { tiles }
    }

    fn insert_packed(&mut self, image: &Image) -> Placement {
        let (w, h) = (image.width, image.height);
        let max = self.max_size;
        let spot = self
            .pages
            .iter_mut()
            .find_map(|page| page.allocate(w, h, max).map(|xy| (page.texture, xy)));
        let (texture, (x, y)) = match spot {
            Some(found) => found,
            None => {
                let texture = self.new_texture(max, max, false);
                let mut page = Page {
                    texture,
                    shelves: Vec::new(),
                    next_y: 0,
                };
                // Fits by construction: w and h are at most max_size.
                let xy = page.allocate(w, h, max).unwrap_or((0, 0));
                self.pages.push(page);
                (texture, xy)
            }
        };
        self.textures[texture].blit(x, y, w, &image.pixels);
        let size = max as f32;
        Placement::Region(TextureRegion {
            texture: texture as TextureId,
            left: x as f32 / size,
            top: y as f32 / size,
            right: (x + w) as f32 / size,
            bottom: (y + h) as f32 / size,
        })
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self::new(MAX_TEXTURE_SIZE)
    }
}

impl Page {
    fn allocate(&mut self, w: u32, h: u32, size: u32) -> Option<(u32, u32)> {
        for shelf in &mut self.shelves {
            if h <= shelf.height && shelf.cursor_x + w <= size {
                let x = shelf.cursor_x;
                shelf.cursor_x += w;
                return Some((x, shelf.y));
            }
        }
        if self.next_y + h > size || w > size {
            return None;
        }
        let y = self.next_y;
        self.shelves.push(Shelf {
            y,
            height: h,
            cursor_x: w,
        });
        self.next_y += h;
        Some((0, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: Rgba8, tileable: bool) -> Image {
        Image::from_fn(w, h, tileable, |_, _| px).unwrap()
    }

    #[test]
    fn from_pixels_validates_length() {
        let err = Image::from_pixels(2, 2, vec![[0; 4]; 3], false).unwrap_err();
        assert!(matches!(
            err,
            TextureError::SizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
        assert!(matches!(
            Image::from_pixels(0, 2, vec![], false),
            Err(TextureError::Empty)
        ));
    }

    #[test]
    fn tileable_image_gets_full_texture_region() {
        let mut atlas = TextureAtlas::new(64);
        let h = atlas.insert(&solid(16, 16, [1, 2, 3, 255], true));
        let r = atlas.tex_info(h).unwrap();
        assert_eq!((r.left, r.top, r.right, r.bottom), (0.0, 0.0, 1.0, 1.0));
        assert!(atlas.texture(r.texture).unwrap().wraps());
    }

    #[test]
    fn small_images_share_a_page() {
        let mut atlas = TextureAtlas::new(64);
        let a = atlas.insert(&solid(16, 16, [255, 0, 0, 255], false));
        let b = atlas.insert(&solid(16, 16, [0, 255, 0, 255], false));
        let ra = atlas.tex_info(a).unwrap();
        let rb = atlas.tex_info(b).unwrap();
        assert_eq!(ra.texture, rb.texture);
        assert_eq!(atlas.texture_count(), 1);
        assert_eq!((rb.left, rb.top, rb.right, rb.bottom), (0.25, 0.0, 0.5, 0.25));
        assert_eq!(atlas.sample(rb.texture, 0.3, 0.1), [0, 255, 0, 255]);
        assert_eq!(atlas.sample(ra.texture, 0.1, 0.1), [255, 0, 0, 255]);
    }

    #[test]
    fn full_page_opens_a_new_one() {
        let mut atlas = TextureAtlas::new(32);
        for _ in 0..4 {
            atlas.insert(&solid(16, 16, [9, 9, 9, 255], false));
        }
        assert_eq!(atlas.texture_count(), 1);
        let fifth = atlas.insert(&solid(16, 16, [9, 9, 9, 255], false));
        assert_eq!(atlas.tex_info(fifth).unwrap().texture, 1);
    }

    #[test]
    fn oversized_image_is_split_and_has_no_region() {
        let mut atlas = TextureAtlas::new(32);
        let h = atlas.insert(&solid(70, 40, [1, 1, 1, 255], true));
        assert!(atlas.tex_info(h).is_none());
        // 3 columns x 2 rows of tiles.
        assert_eq!(atlas.texture_count(), 6);
    }

    #[test]
    fn wrap_sampling_repeats_and_clamp_sampling_saturates() {
        let img = Image::from_fn(2, 1, true, |x, _| [x as u8, 0, 0, 255]).unwrap();
        let mut atlas = TextureAtlas::new(8);
        let wrapped = atlas.insert(&img);
        let r = atlas.tex_info(wrapped).unwrap();
        let tex = atlas.texture(r.texture).unwrap();
        assert_eq!(tex.sample(1.25, 0.0)[0], 0);
        assert_eq!(tex.sample(-0.25, 0.0)[0], 1);

        let packed = Image::from_fn(2, 1, false, |x, _| [x as u8 + 1, 0, 0, 255]).unwrap();
        let clamped = atlas.insert(&packed);
        let r = atlas.tex_info(clamped).unwrap();
        let tex = atlas.texture(r.texture).unwrap();
        assert!(!tex.wraps());
        assert_eq!((r.left, r.right, r.bottom), (0.0, 0.25, 0.125));
        assert_eq!(tex.sample(0.5 / 8.0, 0.0)[0], 1);
        assert_eq!(tex.sample(1.5 / 8.0, 0.0)[0], 2);
        assert_eq!(tex.sample(-1.0, 0.0)[0], 1, "clamped to the first texel");
    }

    #[test]
    fn unknown_handles_have_no_region() {
        let atlas = TextureAtlas::new(8);
        assert!(atlas.tex_info(ImageHandle(3)).is_none());
    }

    #[test]
    fn noise_lattice_wraps_at_the_edges() {
        let mut rng = SimpleRng::new(11);
        let lattice = NoiseLattice::new(8, &mut rng);
        for i in 0..16 {
            let v = i as f32 / 16.0;
            let seam = (lattice.sample(0.0, v) - lattice.sample(0.9999, v)).abs();
            assert!(seam < 0.01, "seam at v={v}: {seam}");
        }
    }

    #[test]
    fn procedural_earth_is_opaque_and_tileable() {
        let img = Image::procedural_earth(64, 32, 11);
        assert!(img.is_tileable());
        assert_eq!(img.pixels().len(), 64 * 32);
        assert!(img.pixels().iter().all(|p| p[3] == 255));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Image::load_tileable("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
        assert!(err.to_string().contains("not/here.png"));
    }
}
