use anyhow::Result;
use facemask_img::shapes::Size;
use image::{EncodableLayout, RgbaImage};
use tracing::{debug, error};

use std::io::Write;
use std::process::{Command, Stdio};

/// Raw rgba frames piped into an `ffplay` window.
pub struct OutputVideoStream {
    output_proc: std::process::Child,
    size: Size,
}

impl Drop for OutputVideoStream {
    fn drop(&mut self) {
        if let Err(e) = self.output_proc.kill() {
            error!("Failed to stop output process {e:?}");
        }
    }
}

impl OutputVideoStream {
    pub fn new(size: Size) -> Result<Self> {
        debug!("Opening display at {}x{}", size.width, size.height);
        let output_proc = Command::new("ffplay")
            .args([
                "-f",
                "rawvideo",
                "-pixel_format",
                "rgba",
                "-video_size",
                &format!("{}x{}", size.width, size.height),
                "-fflags",
                "nobuffer",
                "-flags",
                "low_delay",
                "-window_title",
                "facemask",
                "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()?;

        Ok(Self { output_proc, size })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn write_frame(&mut self, img: &RgbaImage) -> Result<()> {
        if let Some(stdin) = self.output_proc.stdin.as_mut() {
            stdin.write_all(img.as_bytes())?;
        }

        Ok(())
    }
}
