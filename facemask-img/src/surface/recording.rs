use super::Surface;
use crate::draw::DrawCommand;
use crate::shapes::Size;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Resize(Size),
    Clear,
    Draw(DrawCommand),
}

/// Surface that records every call instead of rasterizing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Draw commands issued since the most recent clear.
    pub fn visible(&self) -> Vec<&DrawCommand> {
        let start = self
            .events
            .iter()
            .rposition(|e| *e == SurfaceEvent::Clear)
            .map_or(0, |i| i + 1);

        self.events[start..]
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Draw(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.events.push(SurfaceEvent::Resize(size));
    }

    fn clear(&mut self) {
        self.events.push(SurfaceEvent::Clear);
    }

    fn draw(&mut self, cmd: &DrawCommand) {
        self.events.push(SurfaceEvent::Draw(cmd.clone()));
    }
}
