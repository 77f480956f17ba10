use crate::clock::Phase;
use crate::draw::{DrawList, Paint, palette};
use crate::error::{MaskError, Result};
use crate::landmarks::{Anchor, Anchors};
use crate::metrics::FaceMetrics;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub mod batman;
pub mod dancing_teddy;
pub mod iron_man;
pub mod jewel_necklace;
pub mod shakthi_man;
pub mod silhouette;
pub mod spider_man;

/// A mask renderer: pure in its inputs, one call per face per frame.
pub type RenderFn = fn(&Anchors, &FaceMetrics, Phase) -> DrawList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskKind {
    #[default]
    IronMan,
    Batman,
    SpiderMan,
    ShakthiMan,
    JewelNecklace,
    DancingTeddy,
}

impl MaskKind {
    pub const ALL: [MaskKind; 6] = [
        MaskKind::IronMan,
        MaskKind::Batman,
        MaskKind::SpiderMan,
        MaskKind::ShakthiMan,
        MaskKind::JewelNecklace,
        MaskKind::DancingTeddy,
    ];

    pub const FACE_MASKS: [MaskKind; 4] = [
        MaskKind::IronMan,
        MaskKind::Batman,
        MaskKind::SpiderMan,
        MaskKind::ShakthiMan,
    ];

    pub const ACCESSORIES: [MaskKind; 2] = [MaskKind::JewelNecklace, MaskKind::DancingTeddy];

    pub const fn name(&self) -> &'static str {
        match self {
            MaskKind::IronMan => "ironMan",
            MaskKind::Batman => "batman",
            MaskKind::SpiderMan => "spiderMan",
            MaskKind::ShakthiMan => "shakthiMan",
            MaskKind::JewelNecklace => "jewelNecklace",
            MaskKind::DancingTeddy => "dancingTeddy",
        }
    }

    /// The built-in renderer for this kind.
    pub fn renderer(&self) -> RenderFn {
        match self {
            MaskKind::IronMan => iron_man::render,
            MaskKind::Batman => batman::render,
            MaskKind::SpiderMan => spider_man::render,
            MaskKind::ShakthiMan => shakthi_man::render,
            MaskKind::JewelNecklace => jewel_necklace::render,
            MaskKind::DancingTeddy => dancing_teddy::render,
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MaskKind {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| MaskError::UnknownMask(s.to_string()))
    }
}

/// Lookup from mask kind to renderer.
///
/// The default registry carries the four face masks only. Accessories are
/// opt-in via [`Registry::with_accessories`].
#[derive(Clone)]
pub struct Registry {
    renderers: HashMap<MaskKind, RenderFn>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in MaskKind::FACE_MASKS {
            registry.register(kind, kind.renderer());
        }
        registry
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut kinds: Vec<_> = self.renderers.keys().map(|k| k.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("Registry").field("kinds", &kinds).finish()
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn with_accessories() -> Self {
        let mut registry = Self::default();
        for kind in MaskKind::ACCESSORIES {
            registry.register(kind, kind.renderer());
        }
        registry
    }

    /// Register or replace the renderer for `kind`.
    pub fn register(&mut self, kind: MaskKind, renderer: RenderFn) -> &mut Self {
        self.renderers.insert(kind, renderer);
        self
    }

    pub fn get(&self, kind: MaskKind) -> Option<RenderFn> {
        self.renderers.get(&kind).copied()
    }

    pub fn contains(&self, kind: MaskKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    pub fn render(
        &self,
        kind: MaskKind,
        anchors: &Anchors,
        metrics: &FaceMetrics,
        phase: Phase,
    ) -> Result<DrawList> {
        let renderer = self
            .get(kind)
            .ok_or(MaskError::UnregisteredMask(kind.name()))?;
        Ok(renderer(anchors, metrics, phase))
    }
}

/// Log a shape group that could not be drawn for lack of anchors or metrics.
pub(crate) fn drawn(mask: MaskKind, part: &str, result: Option<()>) {
    if result.is_none() {
        trace!("{mask}: skipped {part}");
    }
}

/// Eye cutout half-extents shared by every face mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeSize {
    pub width: f32,
    pub height: f32,
}

impl EyeSize {
    pub fn from_metrics(metrics: &FaceMetrics) -> Option<Self> {
        let face_width = metrics.width?;
        Some(Self {
            width: face_width * 0.15,
            height: face_width * 0.08,
        })
    }
}

pub(crate) const EYES: [Anchor; 2] = [Anchor::LeftEye, Anchor::RightEye];

/// White elliptical eye cutout at `eye`.
pub(crate) fn elliptical_eye(
    anchors: &Anchors,
    metrics: &FaceMetrics,
    eye: Anchor,
    out: &mut DrawList,
) -> Option<()> {
    let size = EyeSize::from_metrics(metrics)?;
    let center = anchors.get(eye)?;
    out.ellipse(center, size.width, size.height, Paint::Fill(palette::WHITE));
    Some(())
}

/// Center shared by the forehead emblems: temple midpoint horizontally, halfway
/// between forehead and nose vertically.
pub(crate) fn emblem_center(anchors: &Anchors) -> Option<crate::shapes::Point> {
    let x = anchors.temple_center_x()?;
    let forehead = anchors.get(Anchor::Forehead)?;
    let nose = anchors.get(Anchor::Nose)?;
    Some(crate::shapes::Point::new(x, (forehead.y + nose.y) / 2.))
}
