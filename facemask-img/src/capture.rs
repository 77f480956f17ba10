use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::{Level, span};

/// Still capture: `frame` stretched to the overlay's size with the overlay
/// composited on top.
pub fn compose(frame: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let span = span!(Level::DEBUG, "compose_capture");
    let _guard = span.enter();

    let (width, height) = overlay.dimensions();
    if width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }

    let mut still = if frame.dimensions() == (width, height) {
        frame.clone()
    } else {
        imageops::resize(frame, width, height, FilterType::Triangle)
    };
    imageops::overlay(&mut still, overlay, 0, 0);
    still
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const GREY: Rgba<u8> = Rgba([90, 90, 90, 255]);

    #[test]
    fn frame_is_resized_to_overlay() {
        let frame = RgbaImage::from_pixel(20, 10, GREY);
        let overlay = RgbaImage::new(40, 30);
        let still = compose(&frame, &overlay);

        assert_eq!(still.dimensions(), (40, 30));
        let px = still.get_pixel(20, 15);
        assert!(px.0[..3].iter().all(|c| c.abs_diff(90) <= 1));
        assert_eq!(px.0[3], 255);
    }

    #[test]
    fn overlay_is_drawn_on_top() {
        let frame = RgbaImage::from_pixel(8, 8, GREY);
        let mut overlay = RgbaImage::new(8, 8);
        overlay.put_pixel(3, 3, Rgba([255, 0, 0, 255]));

        let still = compose(&frame, &overlay);
        assert_eq!(*still.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(*still.get_pixel(4, 4), GREY);
    }

    #[test]
    fn empty_overlay_gives_empty_still() {
        let frame = RgbaImage::from_pixel(8, 8, GREY);
        assert_eq!(compose(&frame, &RgbaImage::new(0, 0)).dimensions(), (0, 0));
    }
}
