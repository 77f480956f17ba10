use super::silhouette::{self, SilhouetteStyle};
use super::{EYES, EyeSize, MaskKind, drawn};
use crate::clock::{PULSE_RATE, Phase};
use crate::draw::{DrawList, Paint, Stroke, palette, with_opacity};
use crate::landmarks::{Anchor, Anchors};
use crate::metrics::FaceMetrics;
use crate::shapes::{Point, Polygon};

const STYLE: SilhouetteStyle = SilhouetteStyle {
    fill: palette::RED,
    outline: Some(Stroke {
        color: palette::GOLD,
        width: 3.,
    }),
};

const TRIM: Stroke = Stroke {
    color: palette::GOLD,
    width: 2.,
};

/// Reactor radius as a share of face width.
pub const REACTOR_RATIO: f32 = 0.2;

/// Scale factor of the reactor pulse, in [0.8, 1.0].
pub fn pulse_factor(phase: Phase) -> f32 {
    phase.oscillate(PULSE_RATE) * 0.1 + 0.9
}

pub fn render(anchors: &Anchors, metrics: &FaceMetrics, phase: Phase) -> DrawList {
    let mut out = DrawList::new();
    let mask = MaskKind::IronMan;

    drawn(mask, "silhouette", silhouette::draw(anchors, &STYLE, &mut out));
    for eye in EYES {
        drawn(mask, eye.name(), eye_hole(anchors, metrics, eye, &mut out));
    }
    drawn(mask, "reactor", reactor(anchors, metrics, phase, &mut out));
    for eye in EYES {
        drawn(mask, "eye trim", eye_trim(anchors, metrics, eye, &mut out));
    }

    out
}

fn eye_hole(
    anchors: &Anchors,
    metrics: &FaceMetrics,
    eye: Anchor,
    out: &mut DrawList,
) -> Option<()> {
    let (_, polygon) = cutout(anchors, metrics, eye)?;
    out.polygon(polygon, Paint::Fill(palette::WHITE));
    Some(())
}

fn eye_trim(
    anchors: &Anchors,
    metrics: &FaceMetrics,
    eye: Anchor,
    out: &mut DrawList,
) -> Option<()> {
    let (center, polygon) = cutout(anchors, metrics, eye)?;
    out.polygon(polygon.scaled_about(center, 1.2), Paint::Stroke(TRIM));
    Some(())
}

/// Angular eye opening: wide across the brow, narrowing toward the cheek.
fn cutout(anchors: &Anchors, metrics: &FaceMetrics, eye: Anchor) -> Option<(Point, Polygon)> {
    let size = EyeSize::from_metrics(metrics)?;
    let center = anchors.get(eye)?;
    let (w, h) = (size.width, size.height);

    Some((
        center,
        Polygon::around(center, &[(-w, -h), (w, -h), (w * 0.5, h), (-w * 0.5, h)]),
    ))
}

fn reactor(
    anchors: &Anchors,
    metrics: &FaceMetrics,
    phase: Phase,
    out: &mut DrawList,
) -> Option<()> {
    let size = metrics.width? * REACTOR_RATIO;
    let x = anchors.temple_center_x()?;
    let mouth = anchors.get(Anchor::LeftMouth)?;
    let chin = anchors.get(Anchor::Chin)?;
    let center = Point::new(x, (mouth.y + chin.y) / 2.);

    out.circle(center, size, Paint::Fill(palette::GOLD))
        .circle(center, size * 0.8, Paint::Fill(palette::RED))
        .circle(center, size * 0.4, Paint::Fill(palette::CYAN))
        .circle(
            center,
            size * 0.4 * pulse_factor(phase),
            Paint::Fill(with_opacity(palette::CYAN, 0.5)),
        );
    Some(())
}
