use super::{MaskKind, drawn};
use crate::clock::{ARM_RATE, BOUNCE_RATE, LEG_RATE, PULSE_RATE, Phase};
use crate::draw::{DrawList, Paint, Stroke, palette, with_opacity};
use crate::landmarks::{Anchor, Anchors};
use crate::metrics::FaceMetrics;
use crate::shapes::Point;
use std::f32::consts::TAU;

const OPACITY: f32 = 0.8;
const SPARKLES: usize = 5;

/// Per-frame offsets of the dance, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dance {
    pub bounce: f32,
    pub arm_wave: f32,
    pub leg_wave: f32,
}

impl Dance {
    pub fn at(phase: Phase) -> Self {
        Self {
            bounce: phase.oscillate(BOUNCE_RATE) * 5.,
            arm_wave: phase.oscillate(ARM_RATE) * 10.,
            leg_wave: phase.oscillate(LEG_RATE) * 8.,
        }
    }
}

pub fn render(anchors: &Anchors, metrics: &FaceMetrics, phase: Phase) -> DrawList {
    let mut out = DrawList::new();
    drawn(
        MaskKind::DancingTeddy,
        "teddy",
        figure(anchors, metrics, phase, &mut out),
    );
    out.faded(OPACITY)
}

fn figure(
    anchors: &Anchors,
    metrics: &FaceMetrics,
    phase: Phase,
    out: &mut DrawList,
) -> Option<()> {
    let size = metrics.temple_span()? * 0.6;
    let forehead = anchors.get(Anchor::Forehead)?;
    let dance = Dance::at(phase);
    // every part bounces together
    let center = Point::new(anchors.temple_center_x()?, forehead.y + dance.bounce);
    let at = |dx: f32, dy: f32| center.offset(size * dx, size * dy);

    let fur = Paint::Fill(palette::BROWN);
    let ink = Paint::Fill(palette::BLACK);
    let limb = Stroke::new(palette::BROWN, size * 0.1);

    out.circle(center, size * 0.4, fur)
        .circle(at(0., -0.2), size * 0.3, fur)
        .circle(at(-0.2, -0.4), size * 0.15, fur)
        .circle(at(0.2, -0.4), size * 0.15, fur)
        .circle(at(-0.1, -0.25), size * 0.05, ink)
        .circle(at(0.1, -0.25), size * 0.05, ink)
        .circle(at(0., -0.15), size * 0.08, ink)
        .line(at(-0.4, 0.), at(-0.6, 0.2).offset(0., dance.arm_wave), limb)
        .line(at(0.4, 0.), at(0.6, 0.2).offset(0., -dance.arm_wave), limb)
        .line(at(-0.2, 0.4), at(-0.3, 0.7).offset(0., dance.leg_wave), limb)
        .line(at(0.2, 0.4), at(0.3, 0.7).offset(0., -dance.leg_wave), limb);

    let sparkle = Paint::Fill(with_opacity(palette::WHITE, 0.6));
    for i in 0..SPARKLES {
        let angle = (phase.angle(PULSE_RATE) + i as f32 * TAU / SPARKLES as f32) % TAU;
        out.circle(center.orbit(size * 0.8, angle), size * 0.05, sparkle);
    }

    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::masks::fixtures;

    #[test]
    fn dance_offsets_use_their_own_rates() {
        let dance = Dance::at(Phase::new(10));
        assert!((dance.bounce - 2f32.sin() * 5.).abs() < 1e-5);
        assert!((dance.arm_wave - 3f32.sin() * 10.).abs() < 1e-5);
        assert!((dance.leg_wave - 2.5f32.sin() * 8.).abs() < 1e-5);
    }

    #[test]
    fn drawn_translucent() {
        let (anchors, metrics) = fixtures::resolved();
        let out = render(&anchors, &metrics, Phase::new(7));
        // body, head, 2 ears, 2 eyes, nose, 4 limbs, 5 sparkles
        assert_eq!(out.len(), 16);

        for cmd in out.iter().take(11) {
            let alpha = match cmd {
                DrawCommand::Arc { paint, .. } => paint.color().0[3],
                DrawCommand::Line { stroke, .. } => stroke.color.0[3],
                other => panic!("unexpected {other:?}"),
            };
            assert_eq!(alpha, 204);
        }
        let DrawCommand::Arc { paint, .. } = out.commands().last().unwrap() else {
            panic!("expected sparkle");
        };
        assert_eq!(paint.color().0[3], 122);
    }

    #[test]
    fn body_bounces_above_forehead_anchor() {
        let (anchors, metrics) = fixtures::resolved();
        let phase = Phase::new(8);
        let out = render(&anchors, &metrics, phase);
        let DrawCommand::Arc { center, radius, .. } = out.commands()[0] else {
            panic!("expected body");
        };
        let size = metrics.temple_span().unwrap() * 0.6;
        assert!((radius - size * 0.4).abs() < 1e-3);
        assert!((center.y - (250. + Dance::at(phase).bounce)).abs() < 1e-3);
    }
}
