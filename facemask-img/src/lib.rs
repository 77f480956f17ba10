pub mod capture;
pub mod clock;
pub mod detection;
pub mod draw;
pub mod error;
pub mod feed;
pub mod landmarks;
pub mod masks;
pub mod metrics;
pub mod selector;
pub mod session;
pub mod shapes;
pub mod surface;

pub use error::{MaskError, Result};
