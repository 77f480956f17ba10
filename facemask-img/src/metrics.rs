use crate::landmarks::{Anchor, Anchors};
use crate::shapes::Point;
use tracing::debug;

/// Temple-to-temple distance multiplier giving the mask width.
pub const WIDTH_SCALE: f32 = 1.5;
/// Nose-to-chin distance multiplier giving the mask height.
pub const HEIGHT_SCALE: f32 = 2.2;

/// Below this many pixels a metric is considered degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-3;

pub fn compute_width(left_temple: Point, right_temple: Point) -> f32 {
    left_temple.distance(&right_temple) * WIDTH_SCALE
}

pub fn compute_height(nose: Point, chin: Point) -> f32 {
    nose.distance(&chin) * HEIGHT_SCALE
}

/// Face size in surface pixels, measured fresh per face per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl FaceMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn measure(anchors: &Anchors) -> Self {
        let width = anchors
            .get(Anchor::LeftTemple)
            .zip(anchors.get(Anchor::RightTemple))
            .map(|(l, r)| compute_width(l, r));
        let height = anchors
            .get(Anchor::Nose)
            .zip(anchors.get(Anchor::Chin))
            .map(|(n, c)| compute_height(n, c));

        let metrics = Self { width, height };
        if metrics.is_degenerate() {
            debug!("Degenerate face metrics: {metrics:?}");
        }
        metrics
    }

    /// Raw temple-to-temple distance, before scaling.
    pub fn temple_span(&self) -> Option<f32> {
        self.width.map(|w| w / WIDTH_SCALE)
    }

    pub fn is_degenerate(&self) -> bool {
        [self.width, self.height]
            .into_iter()
            .flatten()
            .any(|m| m < DEGENERATE_EPSILON)
    }
}
