//! A [`Graphics`] backend that only remembers what it was told.
//!
//! Used as the sink in tests and benches: every command is kept in order,
//! primitives are assembled into triangles, and state is tracked exactly as a
//! real backend would track it.

use crate::gl::{
    ClearMask, GlCommand, GlState, Graphics, PrimitiveAssembler, RawGraphicsHost,
    RawGraphicsScope, Triangle,
};
use crate::texture::{ImageHandle, TextureAtlas, TextureRegion};
use crate::types::ZOrder;

#[derive(Debug, Default)]
pub struct RecordingGraphics {
    state: GlState,
    commands: Vec<GlCommand>,
    assembler: PrimitiveAssembler,
    triangles: Vec<Triangle>,
    clears: Vec<(ClearMask, GlState)>,
    atlas: TextureAtlas,
    last_z: Option<ZOrder>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atlas(atlas: TextureAtlas) -> Self {
        Self {
            atlas,
            ..Self::default()
        }
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut TextureAtlas {
        &mut self.atlas
    }

    pub fn commands(&self) -> &[GlCommand] {
        &self.commands
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&GlCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Every triangle emitted so far, with vertex attributes resolved.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Each clear together with the state it was issued under.
    pub fn clears(&self) -> &[(ClearMask, GlState)] {
        &self.clears
    }

    /// Layer of the most recent raw graphics scope.
    pub fn last_z(&self) -> Option<ZOrder> {
        self.last_z
    }

    /// Forget everything recorded, keeping state and atlas.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.triangles.clear();
        self.clears.clear();
        self.last_z = None;
    }
}

impl Graphics for RecordingGraphics {
    fn submit(&mut self, cmd: GlCommand) {
        self.commands.push(cmd);
        if self.state.apply(&cmd) {
            return;
        }
        match cmd {
            GlCommand::Clear(mask) => self.clears.push((mask, self.state.clone())),
            GlCommand::Begin(p) => self.assembler.begin(p),
            GlCommand::Vertex(pos) => {
                if let Some(tri) = self.assembler.push(self.state.vertex(pos)) {
                    self.triangles.push(tri);
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

impl RawGraphicsHost for RecordingGraphics {
    type Backend = Self;

    fn raw_graphics(&mut self, z: ZOrder) -> RawGraphicsScope<'_, Self> {
        self.last_z = Some(z);
        RawGraphicsScope::enter(self)
    }

    fn texture_region(&self, image: ImageHandle) -> Option<TextureRegion> {
        self.atlas.tex_info(image)
    }
}
