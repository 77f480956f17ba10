/// A position in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2., (self.y + other.y) / 2.)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Point on the circle of `radius` around self at `theta` radians.
    pub fn orbit(&self, radius: f32, theta: f32) -> Point {
        Point::new(self.x + theta.cos() * radius, self.y + theta.sin() * radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(3., 0.);
        let b = Point::new(0., 4.);
        assert_eq!(a.distance(&b), 5.);
        assert_eq!(b.distance(&a), 5.);
    }

    #[test]
    fn orbit_quarter_turn() {
        let p = Point::new(10., 10.).orbit(2., std::f32::consts::FRAC_PI_2);
        assert!((p.x - 10.).abs() < 1e-5);
        assert!((p.y - 12.).abs() < 1e-5);
    }
}
