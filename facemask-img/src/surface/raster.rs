use super::Surface;
use crate::draw::{DrawCommand, Paint, Stroke};
use crate::shapes::{Point, Size};
use image::{Rgba, RgbaImage};
use std::f32::consts::FRAC_PI_2;
use tiny_skia::{Color, FillRule, LineCap, LineJoin, Path, PathBuilder, Pixmap, Rect, Transform};
use tracing::trace;

/// Radii below this many pixels are not drawn.
const MIN_RADIUS: f32 = 0.5;

/// RGBA overlay rasterized with anti-aliased, source-over paths.
///
/// Every command becomes one path, so a translucent shape is blended exactly
/// once per pixel. Geometry that is non-finite or collapsed is skipped.
#[derive(Default)]
pub struct RasterSurface {
    size: Size,
    // None while the surface has no area
    pixmap: Option<Pixmap>,
}

impl RasterSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixmap: Pixmap::new(size.width, size.height),
        }
    }

    /// Snapshot of the overlay with straight (non-premultiplied) alpha.
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.size.width, self.size.height);
        if let Some(pixmap) = &self.pixmap {
            for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
                let c = src.demultiply();
                *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        img
    }

    /// Keep far off-surface coordinates inside the range the rasterizer clips.
    fn clamp(&self, p: Point) -> Point {
        let (w, h) = (self.size.width as f32, self.size.height as f32);
        Point::new(p.x.clamp(-4. * w, 5. * w), p.y.clamp(-4. * h, 5. * h))
    }

    fn max_radius(&self) -> f32 {
        8. * self.size.width.max(self.size.height) as f32
    }

    fn polyline(&self, points: &[Point], closed: bool) -> Option<Path> {
        let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
        for p in points.iter().map(|p| self.clamp(*p)) {
            if distinct.last() != Some(&p) {
                distinct.push(p);
            }
        }
        if distinct.len() < 2 {
            return None;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(distinct[0].x, distinct[0].y);
        for p in &distinct[1..] {
            pb.line_to(p.x, p.y);
        }
        if closed {
            pb.close();
        }
        pb.finish()
    }

    fn oval(&self, center: Point, rx: f32, ry: f32) -> Option<Path> {
        if rx < MIN_RADIUS || ry < MIN_RADIUS {
            return None;
        }
        let c = self.clamp(center);
        let (rx, ry) = (rx.min(self.max_radius()), ry.min(self.max_radius()));
        let rect = Rect::from_xywh(c.x - rx, c.y - ry, rx * 2., ry * 2.)?;
        PathBuilder::from_oval(rect)
    }

    /// Circular arc from `start` sweeping to `end`, as cubic segments of at
    /// most a quarter turn. Closed arcs fill as a chord.
    fn arc(&self, center: Point, radius: f32, start: f32, end: f32, closed: bool) -> Option<Path> {
        if radius < MIN_RADIUS {
            return None;
        }
        let c = self.clamp(center);
        let r = radius.min(self.max_radius());
        let sweep = end - start;
        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.) as usize;
        let step = sweep / segments as f32;
        let k = 4. / 3. * (step / 4.).tan();

        let mut pb = PathBuilder::new();
        pb.move_to(c.x + r * start.cos(), c.y + r * start.sin());
        for i in 0..segments {
            let a0 = start + step * i as f32;
            let a1 = a0 + step;
            let (s0, c0) = a0.sin_cos();
            let (s1, c1) = a1.sin_cos();
            pb.cubic_to(
                c.x + r * (c0 - k * s0),
                c.y + r * (s0 + k * c0),
                c.x + r * (c1 + k * s1),
                c.y + r * (s1 - k * c1),
                c.x + r * c1,
                c.y + r * s1,
            );
        }
        if closed {
            pb.close();
        }
        pb.finish()
    }

    fn quad(&self, from: Point, control: Point, to: Point) -> Option<Path> {
        let (from, control, to) = (self.clamp(from), self.clamp(control), self.clamp(to));
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.quad_to(control.x, control.y, to.x, to.y);
        pb.finish()
    }

    fn paint(&mut self, path: Option<Path>, paint: Paint) {
        let Some(path) = path else {
            trace!("Skipping collapsed path");
            return;
        };
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let [r, g, b, a] = paint.color().0;
        let mut brush = tiny_skia::Paint::default();
        brush.set_color_rgba8(r, g, b, a);
        brush.anti_alias = true;

        match paint {
            Paint::Fill(_) => {
                pixmap.fill_path(&path, &brush, FillRule::Winding, Transform::identity(), None)
            }
            Paint::Stroke(stroke) => {
                pixmap.stroke_path(&path, &brush, &pen(stroke), Transform::identity(), None)
            }
        }
    }
}

fn pen(stroke: Stroke) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width: stroke.width.max(0.),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn is_drawable(cmd: &DrawCommand) -> bool {
    match cmd {
        DrawCommand::Polygon { polygon, .. } => polygon.is_finite() && !polygon.is_empty(),
        DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            ..
        } => center.is_finite() && radius_x.is_finite() && radius_y.is_finite(),
        DrawCommand::Arc {
            center,
            radius,
            start,
            end,
            ..
        } => center.is_finite() && radius.is_finite() && start.is_finite() && end.is_finite(),
        DrawCommand::QuadCurve {
            from, control, to, ..
        } => from.is_finite() && control.is_finite() && to.is_finite(),
        DrawCommand::Line { from, to, .. } => from.is_finite() && to.is_finite(),
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        if size != self.size {
            trace!("Resizing surface to {}x{}", size.width, size.height);
            *self = Self::new(size);
        }
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn draw(&mut self, cmd: &DrawCommand) {
        if self.pixmap.is_none() {
            return;
        }
        if !is_drawable(cmd) {
            trace!("Skipping non-finite {cmd:?}");
            return;
        }

        match cmd {
            DrawCommand::Polygon { polygon, paint } => {
                let path = self.polyline(&polygon.points, true);
                self.paint(path, *paint);
            }
            DrawCommand::Ellipse {
                center,
                radius_x,
                radius_y,
                paint,
            } => {
                let path = self.oval(*center, *radius_x, *radius_y);
                self.paint(path, *paint);
            }
            DrawCommand::Arc {
                center,
                radius,
                start,
                end,
                paint,
            } => {
                let path = if cmd.is_full_circle() {
                    self.oval(*center, *radius, *radius)
                } else {
                    self.arc(*center, *radius, *start, *end, matches!(paint, Paint::Fill(_)))
                };
                self.paint(path, *paint);
            }
            DrawCommand::QuadCurve {
                from,
                control,
                to,
                stroke,
            } => {
                let path = self.quad(*from, *control, *to);
                self.paint(path, Paint::Stroke(*stroke));
            }
            DrawCommand::Line { from, to, stroke } => {
                let path = self.polyline(&[*from, *to], false);
                self.paint(path, Paint::Stroke(*stroke));
            }
        }
    }
}
