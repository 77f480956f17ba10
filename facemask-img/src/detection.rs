use crate::landmarks::LandmarkSet;
use crate::shapes::Size;
use serde::Deserialize;

/// One detector result: the frame it was computed on and every face found.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Detection {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl Detection {
    pub fn new(size: Size, faces: Vec<LandmarkSet>) -> Self {
        Self {
            width: size.width,
            height: size.height,
            faces,
        }
    }

    pub fn empty(size: Size) -> Self {
        Self::new(size, Vec::new())
    }

    pub fn frame_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
