use super::silhouette::{self, SilhouetteStyle};
use super::{EYES, MaskKind, drawn, elliptical_eye, emblem_center};
use crate::clock::{PULSE_RATE, Phase};
use crate::draw::{DrawList, Paint, palette, with_opacity};
use crate::landmarks::Anchors;
use crate::metrics::FaceMetrics;
use crate::shapes::Polygon;

const STYLE: SilhouetteStyle = SilhouetteStyle {
    fill: palette::BLUE,
    outline: None,
};

/// Glow radius in pixels, between 5 and 15.
pub fn glow_radius(phase: Phase) -> f32 {
    phase.oscillate(PULSE_RATE) * 5. + 10.
}

pub fn render(anchors: &Anchors, metrics: &FaceMetrics, phase: Phase) -> DrawList {
    let mut out = DrawList::new();
    let mask = MaskKind::ShakthiMan;

    drawn(mask, "silhouette", silhouette::draw(anchors, &STYLE, &mut out));
    for eye in EYES {
        drawn(mask, eye.name(), elliptical_eye(anchors, metrics, eye, &mut out));
    }
    drawn(mask, "bolt", bolt(anchors, metrics, &mut out));
    drawn(
        mask,
        "glow",
        emblem_center(anchors).map(|center| {
            out.circle(
                center,
                glow_radius(phase),
                Paint::Fill(with_opacity(palette::YELLOW, 0.3)),
            );
        }),
    );

    out
}

fn bolt(anchors: &Anchors, metrics: &FaceMetrics, out: &mut DrawList) -> Option<()> {
    let s = metrics.width? * 0.3;
    let center = emblem_center(anchors)?;

    let polygon = Polygon::around(
        center,
        &[
            (0., -s / 2.),
            (s / 4., 0.),
            (-s / 4., s / 4.),
            (s / 4., s / 2.),
            (0., s / 4.),
            (s / 4., 0.),
        ],
    );
    out.polygon(polygon, Paint::Fill(palette::YELLOW));
    Some(())
}
