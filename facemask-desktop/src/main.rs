#![warn(unused_extern_crates)]
use anyhow::{Error, Result};
use clap::{Args, Parser};
use config::{FileConfig, Overrides, Settings};
use events::{Control, Event};
use facemask_img::capture;
use facemask_img::detection::Detection;
use facemask_img::feed::{self, FeedReceiver, FeedSender};
use facemask_img::masks::Registry;
use facemask_img::session::{FrameOutcome, Session};
use facemask_img::shapes::Size;
use facemask_img::surface::RasterSurface;
use image::{Rgba, RgbaImage};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use tracing::{Level, debug, error, info, span, trace, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use video::OutputVideoStream;

mod config;
mod events;
mod video;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CmdArgs {
    /// TOML file with default settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON lines event stream. Reads stdin if unset
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Initial mask, e.g. ironMan, batman, spiderMan, shakthiMan
    #[arg(short, long)]
    mask: Option<String>,

    /// Also register the accessory renderers
    #[arg(long)]
    accessories: bool,

    /// Max detections waiting for the renderer
    #[arg(short, long)]
    queue: Option<usize>,

    /// Drop the oldest waiting detection instead of blocking the reader
    #[arg(long)]
    drop_stale: bool,

    /// Image shown under the overlay, stretched to each frame
    #[arg(short, long, value_name = "FILE")]
    background: Option<PathBuf>,

    /// Max delay (ms) before a frame is shown without its overlay
    #[arg(short = 'l', long)]
    max_frame_lag_ms: Option<u32>,

    #[command(flatten)]
    out: Out,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
struct Out {
    /// Show composited frames in a window
    #[arg(group = "dest", short, long)]
    display: bool,

    /// Write each composited frame as a PNG into this directory
    #[arg(group = "dest", short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

enum Sink {
    Display(Option<OutputVideoStream>),
    Directory(PathBuf),
    Discard,
}

impl Sink {
    fn write(&mut self, img: &RgbaImage, index: u64) -> Result<()> {
        match self {
            Sink::Display(stream) => {
                let size = Size::new(img.width(), img.height());
                if stream.as_ref().is_none_or(|s| s.size() != size) {
                    stream.replace(OutputVideoStream::new(size)?);
                }
                if let Some(s) = stream.as_mut() {
                    s.write_frame(img)?;
                }
            }
            Sink::Directory(dir) => img.save(dir.join(format!("frame_{index:05}.png")))?,
            Sink::Discard => {}
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env();
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let args = CmdArgs::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            mask: args.mask,
            accessories: args.accessories,
            queue: args.queue,
            drop_stale: args.drop_stale,
            background: args.background,
            max_frame_lag_ms: args.max_frame_lag_ms,
        },
    )?;
    debug!("Settings: {settings:?}");

    let registry = if settings.accessories {
        Registry::with_accessories()
    } else {
        Registry::default()
    };
    let mut session = Session::new(registry);
    session.select_kind(settings.mask)?;
    if settings.autostart {
        session.start();
    }

    let background = match &settings.background {
        Some(path) => Some(image::open(path)?.into_rgba8()),
        None => None,
    };

    let mut sink = match args.out.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            Sink::Directory(dir)
        }
        None if args.out.display => Sink::Display(None),
        None => Sink::Discard,
    };

    let (frame_tx, frame_rx) = feed::bounded(settings.queue, settings.backpressure);
    let (control_tx, control_rx) = flume::unbounded();

    let input = args.input;
    let reader = thread::spawn(move || read_events(input, frame_tx, control_tx));

    let mut renderer = Renderer {
        session,
        surface: RasterSurface::default(),
        background,
        within_ms: settings.max_frame_lag_ms,
        frame: RgbaImage::new(0, 0),
    };
    renderer.run(frame_rx, control_rx, |seq, img| sink.write(img, seq));

    match reader.join() {
        Ok(result) => result,
        Err(_) => Err(Error::msg("Event reader panicked")),
    }
}

/// Reader side: parse the stream, frames through the bounded feed, controls
/// through an unbounded channel so none are ever dropped.
fn read_events(
    input: Option<PathBuf>,
    mut frames: FeedSender<(u64, Detection)>,
    controls: flume::Sender<Control>,
) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut seq = 0;
    for (n, line) in reader.lines().enumerate() {
        let event = match events::parse_line(&line?) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                error!("Line {}: {e:?}", n + 1);
                continue;
            }
        };

        match event {
            Event::Frame(detection) => {
                frames.push((seq, detection))?;
                seq += 1;
            }
            event => controls.send(Control {
                before_frame: seq,
                event,
            })?,
        }
    }

    info!("Input finished after {seq} frames ({} dropped)", frames.dropped());
    Ok(())
}

struct Renderer {
    session: Session,
    surface: RasterSurface,
    background: Option<RgbaImage>,
    within_ms: Option<u32>,
    /// Most recent video frame, sized to the last detection.
    frame: RgbaImage,
}

impl Renderer {
    fn run(
        &mut self,
        frames: FeedReceiver<(u64, Detection)>,
        controls: flume::Receiver<Control>,
        mut emit: impl FnMut(u64, &RgbaImage) -> Result<()>,
    ) {
        let mut pending: VecDeque<Control> = VecDeque::new();

        while let Ok((seq, detection)) = frames.recv() {
            pending.extend(controls.try_iter());
            while pending.front().is_some_and(|c| c.before_frame <= seq) {
                if let Some(control) = pending.pop_front() {
                    self.apply(control.event);
                }
            }

            match self.render(&detection) {
                Ok(Some(img)) => match emit(seq, &img) {
                    Ok(_) => trace!("Rendered frame {seq}."),
                    Err(e) => error!("Failed to write frame {seq}: {e:?}"),
                },
                Ok(None) => {}
                Err(e) => error!("Failed to process frame {seq}: {e:?}"),
            }
        }

        // controls after the last frame
        pending.extend(controls.iter());
        for control in pending {
            self.apply(control.event);
        }
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::Frame(_) => warn!("Frame arrived on control channel"),
            Event::Select { mask } => {
                if let Err(e) = self.session.select(&mask) {
                    debug!("Select {mask} ignored: {e}");
                }
            }
            Event::ToggleAudio => {
                let playing = self.session.toggle_audio();
                info!("Audio {}", if playing { "on" } else { "off" });
            }
            Event::ToggleCamera => {
                let toggle = self.session.toggle_camera();
                if toggle.restart {
                    info!("Camera restart requested, facing {}", toggle.facing);
                }
            }
            Event::Capture { path } => {
                if let Err(e) = self.capture(&path) {
                    error!("Capture to {} failed: {e:?}", path.display());
                }
            }
            Event::Start => self.session.start(),
            Event::Stop => self.session.stop(&mut self.surface),
        }
    }

    fn capture(&self, path: &Path) -> Result<()> {
        match self.session.capture(&self.frame, &self.surface.to_image()) {
            Some(still) => {
                still.save(path)?;
                info!("Captured {}", path.display());
            }
            None => warn!("Capture ignored while stopped"),
        }
        Ok(())
    }

    /// Draw one detection and composite it over the video frame. `None` when
    /// the session is stopped.
    fn render(&mut self, detection: &Detection) -> Result<Option<RgbaImage>> {
        let span = span!(Level::DEBUG, "render_frame");
        let _guard = span.enter();
        let start = Instant::now();

        self.frame = self.video_frame(detection.frame_size());
        if self.session.process(detection, &mut self.surface) == FrameOutcome::Skipped {
            return Ok(None);
        }

        if let Err(e) = check_time(self.within_ms, start, "Mask Rendering") {
            error!("{e:?}");
            return Ok(Some(self.frame.clone()));
        }

        let composed = capture::compose(&self.frame, &self.surface.to_image());
        if let Err(e) = check_time(self.within_ms, start, "Compositing") {
            error!("{e:?}");
            return Ok(Some(self.frame.clone()));
        }
        Ok(Some(composed))
    }

    fn video_frame(&self, size: Size) -> RgbaImage {
        match &self.background {
            Some(bg) => capture::compose(bg, &RgbaImage::new(size.width, size.height)),
            None => RgbaImage::from_pixel(size.width, size.height, Rgba([0, 0, 0, 255])),
        }
    }
}

fn check_time(within_ms: Option<u32>, start: Instant, waypoint: &str) -> Result<()> {
    let elapsed_ms = start.elapsed().as_millis();
    debug!("{elapsed_ms}ms at {waypoint}");

    if let Some(within_ms) = within_ms {
        if elapsed_ms >= within_ms.into() {
            return Err(Error::msg(format!(
                "{elapsed_ms}ms exceeds allowed time of {within_ms}ms at {waypoint}",
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
fn test_renderer() -> Renderer {
    let mut session = Session::new(Registry::default());
    session.start();
    Renderer {
        session,
        surface: RasterSurface::default(),
        background: None,
        within_ms: None,
        frame: RgbaImage::new(0, 0),
    }
}

#[cfg(test)]
fn test_detection() -> Detection {
    use facemask_img::landmarks::{Anchor, LandmarkSet};
    let face = LandmarkSet::from_anchors(&[
        (Anchor::LeftEye, 0.4, 0.45),
        (Anchor::RightEye, 0.6, 0.45),
        (Anchor::Nose, 0.5, 0.55),
        (Anchor::LeftMouth, 0.42, 0.65),
        (Anchor::RightMouth, 0.58, 0.65),
        (Anchor::Chin, 0.5, 0.75),
        (Anchor::LeftTemple, 0.3, 0.4),
        (Anchor::RightTemple, 0.7, 0.4),
        (Anchor::Forehead, 0.5, 0.25),
    ]);
    Detection::new(Size::new(96, 96), vec![face])
}

#[test]
fn controls_apply_between_frames() -> Result<()> {
    use facemask_img::feed::Backpressure;
    use facemask_img::masks::MaskKind;

    // same frames rendered without any controls, and with batman from the start
    let mut iron_man = test_renderer();
    let mut batman = test_renderer();
    batman.session.select("batman")?;
    let mut expected = Vec::new();
    for renderer in [&mut iron_man, &mut batman] {
        let first = renderer.render(&test_detection())?;
        let second = renderer.render(&test_detection())?;
        expected.push((first, second));
    }
    assert_ne!(expected[0].1, expected[1].1);

    let (mut frame_tx, frame_rx) = feed::bounded(1, Backpressure::DropStale);
    let (control_tx, control_rx) = flume::unbounded();
    let (ack_tx, ack_rx) = flume::unbounded();

    let producer = thread::spawn(move || -> Result<u64> {
        frame_tx.push((0, test_detection()))?;
        ack_rx.recv()?;
        control_tx.send(Control {
            before_frame: 1,
            event: Event::Select {
                mask: "batman".to_string(),
            },
        })?;
        frame_tx.push((1, test_detection()))?;
        ack_rx.recv()?;
        control_tx.send(Control {
            before_frame: 2,
            event: Event::Stop,
        })?;
        frame_tx.push((2, test_detection()))?;
        Ok(frame_tx.dropped())
    });

    let mut renderer = test_renderer();
    let mut shown = Vec::new();
    renderer.run(frame_rx, control_rx, |seq, img| {
        shown.push((seq, img.clone()));
        ack_tx.send(())?;
        Ok(())
    });

    let dropped = producer.join().map_err(|_| Error::msg("producer panicked"))??;
    assert_eq!(dropped, 0);
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].0, 0);
    assert_eq!(Some(&shown[0].1), expected[0].0.as_ref());
    assert_eq!(shown[1].0, 1);
    assert_eq!(Some(&shown[1].1), expected[1].1.as_ref());

    assert_eq!(renderer.session.current_mask(), MaskKind::Batman);
    assert!(!renderer.session.is_active());
    assert_eq!(renderer.render(&test_detection())?, None);
    Ok(())
}

#[test]
fn controls_survive_dropped_frames() -> Result<()> {
    use facemask_img::feed::Backpressure;
    use facemask_img::masks::MaskKind;

    let (mut frame_tx, frame_rx) = feed::bounded(1, Backpressure::DropStale);
    let (control_tx, control_rx) = flume::unbounded();

    frame_tx.push((0, test_detection()))?;
    control_tx.send(Control {
        before_frame: 1,
        event: Event::Select {
            mask: "batman".to_string(),
        },
    })?;
    frame_tx.push((1, test_detection()))?;
    control_tx.send(Control {
        before_frame: 2,
        event: Event::Stop,
    })?;
    frame_tx.push((2, test_detection()))?;
    control_tx.send(Control {
        before_frame: 3,
        event: Event::ToggleAudio,
    })?;
    assert_eq!(frame_tx.dropped(), 2);
    drop(frame_tx);
    drop(control_tx);

    let mut renderer = test_renderer();
    let mut shown = Vec::new();
    renderer.run(frame_rx, control_rx, |seq, _| {
        shown.push(seq);
        Ok(())
    });

    assert!(shown.is_empty());
    assert_eq!(renderer.session.current_mask(), MaskKind::Batman);
    assert!(!renderer.session.is_active());
    assert!(renderer.session.is_audio_playing());
    Ok(())
}
