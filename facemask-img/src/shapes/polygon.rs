use super::point::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Polygon from offsets relative to `origin`.
    pub fn around(origin: Point, offsets: &[(f32, f32)]) -> Self {
        Self::new(
            offsets
                .iter()
                .map(|(dx, dy)| origin.offset(*dx, *dy))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    pub fn min_x(&self) -> f32 {
        self.points.iter().fold(f32::INFINITY, |min, p| min.min(p.x))
    }

    pub fn max_x(&self) -> f32 {
        self.points
            .iter()
            .fold(f32::NEG_INFINITY, |max, p| max.max(p.x))
    }

    pub fn min_y(&self) -> f32 {
        self.points.iter().fold(f32::INFINITY, |min, p| min.min(p.y))
    }

    pub fn max_y(&self) -> f32 {
        self.points
            .iter()
            .fold(f32::NEG_INFINITY, |max, p| max.max(p.y))
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x() + (self.max_x() - self.min_x()) / 2.,
            self.min_y() + (self.max_y() - self.min_y()) / 2.,
        )
    }

    /// Scale every point's distance from `origin` by `factor`.
    pub fn scaled_about(&self, origin: Point, factor: f32) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|p| {
                    Point::new(
                        origin.x + (p.x - origin.x) * factor,
                        origin.y + (p.y - origin.y) * factor,
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        let polygon = Polygon::new(Vec::from([
            Point::new(0., 0.),
            Point::new(4., 0.),
            Point::new(4., 2.),
        ]));
        assert_eq!(polygon.center(), Point::new(2., 1.));
    }

    #[test]
    fn test_scaled_about() {
        let polygon = Polygon::around(Point::new(10., 10.), &[(-1., -1.), (1., -1.), (0., 1.)]);
        let scaled = polygon.scaled_about(Point::new(10., 10.), 2.);

        assert_eq!(
            scaled.points,
            Vec::from([
                Point::new(8., 8.),
                Point::new(12., 8.),
                Point::new(10., 12.),
            ])
        );
    }
}
