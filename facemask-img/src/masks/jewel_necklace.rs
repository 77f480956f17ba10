use super::{MaskKind, drawn};
use crate::clock::{PULSE_RATE, Phase};
use crate::draw::{DrawList, Paint, Stroke, palette};
use crate::landmarks::{Anchor, Anchors};
use crate::metrics::FaceMetrics;
use crate::shapes::Point;
use image::Rgba;
use std::f32::consts::{FRAC_PI_2, PI};

const CHAIN: Stroke = Stroke {
    color: palette::GOLD,
    width: 3.,
};

const JEWELS: [Rgba<u8>; 5] = [
    palette::RED,
    palette::BLUE,
    palette::GREEN,
    palette::MAGENTA,
    palette::CYAN,
];

/// Chain sag and jewel layout hanging below the chin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Chain {
    start: Point,
    width: f32,
    sag: f32,
}

impl Chain {
    fn measure(anchors: &Anchors, metrics: &FaceMetrics) -> Option<Self> {
        let width = metrics.temple_span()? * 1.2;
        let left = anchors.get(Anchor::LeftTemple)?;
        let chin = anchors.get(Anchor::Chin)?;
        let sag = chin.distance(&left) * 0.3;
        let x = anchors.temple_center_x()? - width / 2.;

        Some(Self {
            start: Point::new(x, chin.y),
            width,
            sag,
        })
    }

    fn jewel(&self, i: usize) -> Point {
        let t = i as f32 / (JEWELS.len() - 1) as f32;
        self.start
            .offset(self.width * t, self.sag * (t * PI).sin())
    }
}

pub fn render(anchors: &Anchors, metrics: &FaceMetrics, phase: Phase) -> DrawList {
    let mut out = DrawList::new();
    drawn(
        MaskKind::JewelNecklace,
        "chain",
        Chain::measure(anchors, metrics).map(|chain| draw_chain(&chain, phase, &mut out)),
    );
    out
}

fn draw_chain(chain: &Chain, phase: Phase, out: &mut DrawList) {
    out.quad_curve(
        chain.start,
        chain.start.offset(chain.width / 2., chain.sag),
        chain.start.offset(chain.width, 0.),
        CHAIN,
    );

    let radius = chain.width * 0.08;
    for (i, color) in JEWELS.into_iter().enumerate() {
        let center = chain.jewel(i);
        let angle = phase.angle(PULSE_RATE) + i as f32 * FRAC_PI_2;

        out.circle(center, radius, Paint::Fill(color)).circle(
            center.orbit(radius * 0.5, angle),
            radius * 0.3,
            Paint::Fill(palette::WHITE),
        );
    }
}
