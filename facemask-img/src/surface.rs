use crate::draw::{DrawCommand, DrawList};
use crate::shapes::Size;

pub mod raster;
pub mod recording;

pub use raster::RasterSurface;
pub use recording::{RecordingSurface, SurfaceEvent};

/// Something draw commands can be rendered onto.
///
/// A surface is owned by a single consumer; frame steps never interleave.
pub trait Surface {
    fn size(&self) -> Size;

    /// Match the surface to the incoming frame. Must precede clear/draw.
    fn resize(&mut self, size: Size);

    fn clear(&mut self);

    fn draw(&mut self, cmd: &DrawCommand);

    fn draw_all(&mut self, list: &DrawList) {
        for cmd in list {
            self.draw(cmd);
        }
    }
}
