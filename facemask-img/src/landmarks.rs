use crate::error::{MaskError, Result};
use crate::shapes::{Point, Size};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Points per face in the detector's mesh topology.
pub const TOPOLOGY_LEN: usize = 468;

/// A single detector landmark, normalized to [0,1] of the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn project(&self, size: Size) -> Point {
        Point::new(self.x * size.width as f32, self.y * size.height as f32)
    }
}

/// All landmarks the detector produced for one face, in topology order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Full-topology set with only `anchors` placed; every other point sits at
    /// the frame center.
    pub fn from_anchors(anchors: &[(Anchor, f32, f32)]) -> Self {
        let mut points = vec![Landmark::new(0.5, 0.5); TOPOLOGY_LEN];
        for (anchor, x, y) in anchors {
            points[anchor.index()] = Landmark::new(*x, *y);
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Surface pixel position of `anchor` for a surface of `size`.
    pub fn resolve(&self, anchor: Anchor, size: Size) -> Result<Point> {
        let index = anchor.index();
        let landmark = self.points.get(index).ok_or(MaskError::MissingLandmark {
            anchor: anchor.name(),
            index,
            available: self.points.len(),
        })?;

        let point = landmark.project(size);
        if !point.is_finite() {
            return Err(MaskError::NonFiniteLandmark {
                anchor: anchor.name(),
                index,
            });
        }

        Ok(point)
    }

    /// Resolve by anatomical name, e.g. `"leftTemple"`.
    pub fn resolve_named(&self, name: &str, size: Size) -> Result<Point> {
        self.resolve(name.parse()?, size)
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// Anatomical points the masks are anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    LeftEye,
    RightEye,
    Nose,
    LeftMouth,
    RightMouth,
    Chin,
    LeftTemple,
    RightTemple,
    Forehead,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::LeftEye,
        Anchor::RightEye,
        Anchor::Nose,
        Anchor::LeftMouth,
        Anchor::RightMouth,
        Anchor::Chin,
        Anchor::LeftTemple,
        Anchor::RightTemple,
        Anchor::Forehead,
    ];

    /// Index into the detector topology. Must match the detector exactly.
    pub const fn index(&self) -> usize {
        match self {
            Anchor::LeftEye => 33,
            Anchor::RightEye => 263,
            Anchor::Nose => 1,
            Anchor::LeftMouth => 61,
            Anchor::RightMouth => 291,
            Anchor::Chin => 152,
            Anchor::LeftTemple => 234,
            Anchor::RightTemple => 454,
            Anchor::Forehead => 10,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Anchor::LeftEye => "leftEye",
            Anchor::RightEye => "rightEye",
            Anchor::Nose => "nose",
            Anchor::LeftMouth => "leftMouth",
            Anchor::RightMouth => "rightMouth",
            Anchor::Chin => "chin",
            Anchor::LeftTemple => "leftTemple",
            Anchor::RightTemple => "rightTemple",
            Anchor::Forehead => "forehead",
        }
    }

    /// Smallest landmark count that covers every anchor.
    pub fn required_len() -> usize {
        Self::ALL.iter().map(|a| a.index()).max().unwrap_or(0) + 1
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Anchor {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| MaskError::UnknownAnchor(s.to_string()))
    }
}

/// The named anchors of one face, resolved to surface pixels.
///
/// Anchors that could not be resolved are `None`; shapes depending on them are
/// skipped for the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchors {
    points: [Option<Point>; Anchor::ALL.len()],
    size: Size,
}

impl Anchors {
    pub fn resolve(set: &LandmarkSet, size: Size) -> Self {
        let mut points = [None; Anchor::ALL.len()];
        for (slot, anchor) in points.iter_mut().zip(Anchor::ALL) {
            match set.resolve(anchor, size) {
                Ok(p) => *slot = Some(p),
                Err(e) => trace!("{e}"),
            }
        }

        Self { points, size }
    }

    pub fn get(&self, anchor: Anchor) -> Option<Point> {
        Anchor::ALL
            .iter()
            .position(|a| *a == anchor)
            .and_then(|i| self.points[i])
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn missing(&self) -> impl Iterator<Item = Anchor> + '_ {
        Anchor::ALL
            .into_iter()
            .zip(self.points.iter())
            .filter(|(_, p)| p.is_none())
            .map(|(a, _)| a)
    }

    /// Horizontal midpoint of the temples.
    pub fn temple_center_x(&self) -> Option<f32> {
        let l = self.get(Anchor::LeftTemple)?;
        let r = self.get(Anchor::RightTemple)?;
        Some((l.x + r.x) / 2.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_scales_to_surface() {
        let set = LandmarkSet::from_anchors(&[(Anchor::Nose, 0.25, 0.5)]);
        let p = set.resolve(Anchor::Nose, Size::new(800, 600)).unwrap();
        assert_eq!(p, Point::new(200., 300.));
    }

    #[test]
    fn resolve_short_set_fails() {
        let set = LandmarkSet::new(vec![Landmark::new(0.1, 0.1); 300]);
        assert!(set.resolve(Anchor::Nose, Size::new(10, 10)).is_ok());
        assert_eq!(
            set.resolve(Anchor::RightTemple, Size::new(10, 10)),
            Err(MaskError::MissingLandmark {
                anchor: "rightTemple",
                index: 454,
                available: 300,
            })
        );
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let set = LandmarkSet::from_anchors(&[]);
        assert_eq!(
            set.resolve_named("leftEar", Size::new(10, 10)),
            Err(MaskError::UnknownAnchor("leftEar".to_string()))
        );
        assert!(set.resolve_named("leftTemple", Size::new(10, 10)).is_ok());
    }

    #[test]
    fn non_finite_is_rejected() {
        let set = LandmarkSet::from_anchors(&[(Anchor::Chin, f32::NAN, 0.5)]);
        assert!(matches!(
            set.resolve(Anchor::Chin, Size::new(10, 10)),
            Err(MaskError::NonFiniteLandmark { index: 152, .. })
        ));
    }

    #[test]
    fn anchors_record_missing() {
        let set = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 200]);
        let anchors = Anchors::resolve(&set, Size::new(100, 100));

        assert_eq!(anchors.get(Anchor::Nose), Some(Point::new(50., 50.)));
        assert_eq!(anchors.get(Anchor::RightTemple), None);
        let missing: Vec<_> = anchors.missing().collect();
        assert_eq!(
            missing,
            vec![
                Anchor::RightEye,
                Anchor::RightMouth,
                Anchor::LeftTemple,
                Anchor::RightTemple,
            ]
        );
    }

    #[test]
    fn required_len_covers_highest_index() {
        assert_eq!(Anchor::required_len(), 455);
    }
}
