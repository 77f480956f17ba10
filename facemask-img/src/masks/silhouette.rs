use crate::draw::{DrawList, Paint, Stroke};
use crate::landmarks::{Anchor, Anchors};
use crate::shapes::{Point, Polygon};
use image::Rgba;

/// Fill and optional outline of a face mask's base shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilhouetteStyle {
    pub fill: Rgba<u8>,
    pub outline: Option<Stroke>,
}

/// Quadrilateral shared by every face mask: both temples raised to forehead
/// height, then down to the mouth corners.
pub fn outline(anchors: &Anchors) -> Option<Polygon> {
    let forehead = anchors.get(Anchor::Forehead)?;
    let left_temple = anchors.get(Anchor::LeftTemple)?;
    let right_temple = anchors.get(Anchor::RightTemple)?;
    let right_mouth = anchors.get(Anchor::RightMouth)?;
    let left_mouth = anchors.get(Anchor::LeftMouth)?;

    Some(Polygon::new(Vec::from([
        Point::new(left_temple.x, forehead.y),
        Point::new(right_temple.x, forehead.y),
        right_mouth,
        left_mouth,
    ])))
}

pub fn draw(anchors: &Anchors, style: &SilhouetteStyle, out: &mut DrawList) -> Option<()> {
    let polygon = outline(anchors)?;
    match style.outline {
        Some(stroke) => {
            out.polygon(polygon.clone(), Paint::Fill(style.fill))
                .polygon(polygon, Paint::Stroke(stroke));
        }
        None => {
            out.polygon(polygon, Paint::Fill(style.fill));
        }
    }
    Some(())
}
