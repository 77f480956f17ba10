use crate::shapes::{Point, Polygon};
use image::Rgba;
use std::f32::consts::TAU;

pub mod palette {
    use image::Rgba;

    pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    pub const GOLD: Rgba<u8> = Rgba([255, 215, 0, 255]);
    pub const CYAN: Rgba<u8> = Rgba([0, 255, 255, 255]);
    pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
    pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    pub const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);
    pub const BROWN: Rgba<u8> = Rgba([139, 69, 19, 255]);
}

/// `color` with its alpha multiplied by `opacity`.
pub fn with_opacity(color: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let [r, g, b, a] = color.0;
    let a = (a as f32 * opacity.clamp(0., 1.)).round() as u8;
    Rgba([r, g, b, a])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Rgba<u8>, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Rgba<u8>),
    Stroke(Stroke),
}

impl Paint {
    pub fn color(&self) -> Rgba<u8> {
        match self {
            Paint::Fill(c) => *c,
            Paint::Stroke(s) => s.color,
        }
    }

    fn faded(&self, opacity: f32) -> Paint {
        match self {
            Paint::Fill(c) => Paint::Fill(with_opacity(*c, opacity)),
            Paint::Stroke(s) => Paint::Stroke(Stroke::new(with_opacity(s.color, opacity), s.width)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Closed polygon.
    Polygon { polygon: Polygon, paint: Paint },
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        paint: Paint,
    },
    /// Circular arc from `start` to `end` radians, clockwise in surface space.
    Arc {
        center: Point,
        radius: f32,
        start: f32,
        end: f32,
        paint: Paint,
    },
    QuadCurve {
        from: Point,
        control: Point,
        to: Point,
        stroke: Stroke,
    },
    Line { from: Point, to: Point, stroke: Stroke },
}

impl DrawCommand {
    pub fn is_full_circle(&self) -> bool {
        matches!(self, DrawCommand::Arc { start, end, .. } if (end - start).abs() >= TAU)
    }

    fn faded(self, opacity: f32) -> DrawCommand {
        match self {
            DrawCommand::Polygon { polygon, paint } => DrawCommand::Polygon {
                polygon,
                paint: paint.faded(opacity),
            },
            DrawCommand::Ellipse {
                center,
                radius_x,
                radius_y,
                paint,
            } => DrawCommand::Ellipse {
                center,
                radius_x,
                radius_y,
                paint: paint.faded(opacity),
            },
            DrawCommand::Arc {
                center,
                radius,
                start,
                end,
                paint,
            } => DrawCommand::Arc {
                center,
                radius,
                start,
                end,
                paint: paint.faded(opacity),
            },
            DrawCommand::QuadCurve {
                from,
                control,
                to,
                stroke,
            } => DrawCommand::QuadCurve {
                from,
                control,
                to,
                stroke: Stroke::new(with_opacity(stroke.color, opacity), stroke.width),
            },
            DrawCommand::Line { from, to, stroke } => DrawCommand::Line {
                from,
                to,
                stroke: Stroke::new(with_opacity(stroke.color, opacity), stroke.width),
            },
        }
    }
}

/// Ordered draw commands produced by one renderer call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCommand) -> &mut Self {
        self.commands.push(cmd);
        self
    }

    pub fn extend(&mut self, other: DrawList) -> &mut Self {
        self.commands.extend(other.commands);
        self
    }

    pub fn polygon(&mut self, polygon: Polygon, paint: Paint) -> &mut Self {
        self.push(DrawCommand::Polygon { polygon, paint })
    }

    pub fn ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        paint: Paint,
    ) -> &mut Self {
        self.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            paint,
        })
    }

    pub fn circle(&mut self, center: Point, radius: f32, paint: Paint) -> &mut Self {
        self.push(DrawCommand::Arc {
            center,
            radius,
            start: 0.,
            end: TAU,
            paint,
        })
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) -> &mut Self {
        self.push(DrawCommand::Line { from, to, stroke })
    }

    pub fn quad_curve(
        &mut self,
        from: Point,
        control: Point,
        to: Point,
        stroke: Stroke,
    ) -> &mut Self {
        self.push(DrawCommand::QuadCurve {
            from,
            control,
            to,
            stroke,
        })
    }

    /// Multiply the alpha of every command by `opacity`.
    pub fn faded(self, opacity: f32) -> DrawList {
        DrawList {
            commands: self.commands.into_iter().map(|c| c.faded(opacity)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }
}

impl IntoIterator for DrawList {
    type Item = DrawCommand;
    type IntoIter = std::vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
