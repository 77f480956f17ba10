use super::silhouette::{self, SilhouetteStyle};
use super::{EYES, EyeSize, MaskKind, drawn, elliptical_eye, emblem_center};
use crate::clock::Phase;
use crate::draw::{DrawList, Stroke, palette};
use crate::landmarks::{Anchor, Anchors};
use crate::metrics::FaceMetrics;
use crate::shapes::Point;

const STYLE: SilhouetteStyle = SilhouetteStyle {
    fill: palette::RED,
    outline: None,
};

const WEB: Stroke = Stroke {
    color: palette::BLACK,
    width: 2.,
};

const EYE_WEB: Stroke = Stroke {
    color: palette::BLACK,
    width: 1.,
};

/// Web lines either side of the center line, per axis.
const WEB_REACH: i32 = 2;

pub fn render(anchors: &Anchors, metrics: &FaceMetrics, _phase: Phase) -> DrawList {
    let mut out = DrawList::new();
    let mask = MaskKind::SpiderMan;

    drawn(mask, "silhouette", silhouette::draw(anchors, &STYLE, &mut out));
    drawn(mask, "web", web(anchors, metrics, &mut out));
    for eye in EYES {
        drawn(mask, eye.name(), elliptical_eye(anchors, metrics, eye, &mut out));
    }
    for eye in EYES {
        drawn(mask, "eye web", eye_web(anchors, metrics, eye, &mut out));
    }

    out
}

/// Grid spanning temple to temple and forehead to chin.
fn web(anchors: &Anchors, metrics: &FaceMetrics, out: &mut DrawList) -> Option<()> {
    let spacing = metrics.width? * 0.2;
    let center = emblem_center(anchors)?;
    let top = anchors.get(Anchor::Forehead)?.y;
    let bottom = anchors.get(Anchor::Chin)?.y;
    let left = anchors.get(Anchor::LeftTemple)?.x;
    let right = anchors.get(Anchor::RightTemple)?.x;

    for i in -WEB_REACH..=WEB_REACH {
        let x = center.x + i as f32 * spacing;
        out.line(Point::new(x, top), Point::new(x, bottom), WEB);
    }
    for i in -WEB_REACH..=WEB_REACH {
        let y = center.y + i as f32 * spacing;
        out.line(Point::new(left, y), Point::new(right, y), WEB);
    }
    Some(())
}

fn eye_web(
    anchors: &Anchors,
    metrics: &FaceMetrics,
    eye: Anchor,
    out: &mut DrawList,
) -> Option<()> {
    let size = EyeSize::from_metrics(metrics)?;
    let center = anchors.get(eye)?;

    for i in 0..3 {
        let y = center.y - size.height + i as f32 * size.height;
        out.line(
            Point::new(center.x - size.width, y),
            Point::new(center.x + size.width, y),
            EYE_WEB,
        );
    }
    Some(())
}
