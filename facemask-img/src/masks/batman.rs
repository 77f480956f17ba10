use super::silhouette::{self, SilhouetteStyle};
use super::{EYES, MaskKind, drawn, elliptical_eye, emblem_center};
use crate::clock::Phase;
use crate::draw::{DrawList, Paint, palette};
use crate::landmarks::{Anchor, Anchors};
use crate::metrics::FaceMetrics;
use crate::shapes::{Point, Polygon};

const STYLE: SilhouetteStyle = SilhouetteStyle {
    fill: palette::BLACK,
    outline: None,
};

pub fn render(anchors: &Anchors, metrics: &FaceMetrics, _phase: Phase) -> DrawList {
    let mut out = DrawList::new();
    let mask = MaskKind::Batman;

    drawn(mask, "silhouette", silhouette::draw(anchors, &STYLE, &mut out));
    drawn(mask, "left ear", ear(anchors, metrics, Anchor::LeftTemple, &mut out));
    drawn(mask, "right ear", ear(anchors, metrics, Anchor::RightTemple, &mut out));
    for eye in EYES {
        drawn(mask, eye.name(), elliptical_eye(anchors, metrics, eye, &mut out));
    }
    drawn(mask, "emblem", emblem(anchors, metrics, &mut out));

    out
}

/// Triangle rising from the temple at forehead height. The tip leans outward,
/// away from the face center.
fn ear(anchors: &Anchors, metrics: &FaceMetrics, temple: Anchor, out: &mut DrawList) -> Option<()> {
    let face_width = metrics.width?;
    let base = Point::new(anchors.get(temple)?.x, anchors.get(Anchor::Forehead)?.y);
    let height = face_width * 0.4;
    let width = face_width * 0.15;
    let outward = match temple {
        Anchor::RightTemple => 1.,
        _ => -1.,
    };

    let polygon = Polygon::around(
        base,
        &[
            (0., 0.),
            (outward * width, -height),
            (-outward * width, -height / 2.),
        ],
    );
    out.polygon(polygon, Paint::Fill(palette::BLACK));
    Some(())
}

/// Yellow diamond between forehead and nose.
fn emblem(anchors: &Anchors, metrics: &FaceMetrics, out: &mut DrawList) -> Option<()> {
    let half = metrics.width? * 0.3 / 2.;
    let center = emblem_center(anchors)?;

    let polygon = Polygon::around(center, &[(0., -half), (-half, 0.), (0., half), (half, 0.)]);
    out.polygon(polygon, Paint::Fill(palette::YELLOW));
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::masks::fixtures;

    #[test]
    fn ears_rise_above_forehead() {
        let (anchors, metrics) = fixtures::resolved();
        let out = render(&anchors, &metrics, Phase::default());
        let forehead_y = anchors.get(Anchor::Forehead).unwrap().y;
        let raise = metrics.width.unwrap() * 0.4;

        let ears: Vec<&Polygon> = out.commands()[1..3]
            .iter()
            .map(|c| match c {
                DrawCommand::Polygon { polygon, .. } => polygon,
                other => panic!("unexpected {other:?}"),
            })
            .collect();

        for ear in &ears {
            assert!((ear.min_y() - (forehead_y - raise)).abs() < 1e-3);
            assert!((ear.max_y() - forehead_y).abs() < 1e-3);
        }
        // left tip leans left, right tip leans right
        assert!(ears[0].points[1].x < ears[0].points[0].x);
        assert!(ears[1].points[1].x > ears[1].points[0].x);
    }

    #[test]
    fn emblem_is_yellow_diamond() {
        let (anchors, metrics) = fixtures::resolved();
        let out = render(&anchors, &metrics, Phase::default());
        let last = out.commands().last().unwrap();

        let DrawCommand::Polygon { polygon, paint } = last else {
            panic!("expected emblem polygon");
        };
        assert_eq!(*paint, Paint::Fill(palette::YELLOW));
        assert_eq!(polygon.len(), 4);
        assert!((polygon.max_x() - polygon.min_x() - metrics.width.unwrap() * 0.3).abs() < 1e-3);
        let center = polygon.center();
        assert!((center.x - 500.).abs() < 1e-3);
        assert!((center.y - 400.).abs() < 1e-3);
    }

    #[test]
    fn phase_does_not_matter() {
        let (anchors, metrics) = fixtures::resolved();
        assert_eq!(
            render(&anchors, &metrics, Phase::new(0)),
            render(&anchors, &metrics, Phase::new(31))
        );
    }
}
