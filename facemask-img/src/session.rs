use crate::capture;
use crate::clock::{AnimationClock, Phase};
use crate::detection::Detection;
use crate::error::Result;
use crate::landmarks::{Anchor, Anchors};
use crate::masks::{MaskKind, Registry};
use crate::metrics::FaceMetrics;
use crate::selector::MaskSelector;
use crate::surface::Surface;
use image::RgbaImage;
use std::fmt;
use tracing::{Level, debug, error, info, span, trace};

/// Which camera the host should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    User,
    Environment,
}

impl Facing {
    pub fn toggled(&self) -> Facing {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Facing::User => write!(f, "user"),
            Facing::Environment => write!(f, "environment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraToggle {
    pub facing: Facing,
    /// The host must reopen its camera with the new facing.
    pub restart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Session stopped; the surface was left alone and the clock did not move.
    Skipped,
    Drawn {
        mask: MaskKind,
        phase: Phase,
        faces: usize,
        commands: usize,
    },
}

/// Owns everything that persists between frames: the registry, selected mask,
/// animation clock and session flags.
#[derive(Debug)]
pub struct Session {
    registry: Registry,
    selector: MaskSelector,
    clock: AnimationClock,
    active: bool,
    audio_playing: bool,
    facing: Facing,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl Session {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            selector: MaskSelector::default(),
            clock: AnimationClock::new(),
            active: false,
            audio_playing: false,
            facing: Facing::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn current_mask(&self) -> MaskKind {
        self.selector.current()
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_audio_playing(&self) -> bool {
        self.audio_playing
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn start(&mut self) {
        if !self.active {
            info!("Starting session with {} ({} camera)", self.current_mask(), self.facing);
        }
        self.active = true;
    }

    /// Stop processing results, silence audio and blank the overlay.
    pub fn stop(&mut self, surface: &mut impl Surface) {
        if self.active {
            info!("Stopping session");
        }
        self.active = false;
        self.audio_playing = false;
        surface.clear();
    }

    pub fn select(&mut self, name: &str) -> Result<MaskKind> {
        self.selector.select(name, &self.registry)
    }

    pub fn select_kind(&mut self, kind: MaskKind) -> Result<MaskKind> {
        self.selector.select_kind(kind, &self.registry)
    }

    /// Flip the audio flag, returning whether audio now plays.
    pub fn toggle_audio(&mut self) -> bool {
        self.audio_playing = !self.audio_playing;
        debug!("Audio playing: {}", self.audio_playing);
        self.audio_playing
    }

    pub fn toggle_camera(&mut self) -> CameraToggle {
        self.facing = self.facing.toggled();
        debug!("Camera facing: {}", self.facing);
        CameraToggle {
            facing: self.facing,
            restart: self.active,
        }
    }

    /// Frame plus overlay as one image. `None` while stopped.
    pub fn capture(&self, frame: &RgbaImage, overlay: &RgbaImage) -> Option<RgbaImage> {
        if !self.active {
            debug!("Ignoring capture while stopped");
            return None;
        }
        Some(capture::compose(frame, overlay))
    }

    /// Run one frame step: resize, clear, draw every face, tick.
    pub fn process(&mut self, detection: &Detection, surface: &mut impl Surface) -> FrameOutcome {
        let span = span!(Level::DEBUG, "process_detection");
        let _guard = span.enter();

        if !self.active {
            trace!("Session stopped, ignoring detection");
            return FrameOutcome::Skipped;
        }

        let size = detection.frame_size();
        surface.resize(size);
        surface.clear();

        let mask = self.selector.current();
        let phase = self.clock.phase();
        let mut commands = 0;

        for (i, face) in detection.faces.iter().enumerate() {
            let anchors = Anchors::resolve(face, size);
            let missing: Vec<Anchor> = anchors.missing().collect();
            if !missing.is_empty() {
                debug!("Face {i} missing anchors {missing:?}");
            }
            let metrics = FaceMetrics::measure(&anchors);

            match self.registry.render(mask, &anchors, &metrics, phase) {
                Ok(list) => {
                    commands += list.len();
                    surface.draw_all(&list);
                }
                Err(e) => error!("Failed to render face {i}: {e}"),
            }
        }

        self.clock.tick();
        trace!("Drew {commands} commands for {} face(s)", detection.faces.len());

        FrameOutcome::Drawn {
            mask,
            phase,
            faces: detection.faces.len(),
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masks::fixtures;
    use crate::shapes::Size;
    use crate::surface::{RecordingSurface, SurfaceEvent};

    fn running() -> (Session, RecordingSurface) {
        let mut session = Session::default();
        session.start();
        (session, RecordingSurface::new())
    }

    #[test]
    fn stopped_session_ignores_detections() {
        let mut session = Session::default();
        let mut surface = RecordingSurface::new();
        let detection = Detection::new(Size::new(640, 480), vec![fixtures::face()]);

        assert_eq!(session.process(&detection, &mut surface), FrameOutcome::Skipped);
        assert!(surface.events().is_empty());
        assert_eq!(session.phase(), Phase::new(0));
    }

    #[test]
    fn resize_precedes_clear_and_draws() {
        let (mut session, mut surface) = running();
        let detection = Detection::new(Size::new(640, 480), vec![fixtures::face()]);
        session.process(&detection, &mut surface);

        let events = surface.events();
        assert_eq!(events[0], SurfaceEvent::Resize(Size::new(640, 480)));
        assert_eq!(events[1], SurfaceEvent::Clear);
        assert!(events[2..].iter().all(|e| matches!(e, SurfaceEvent::Draw(_))));
        assert!(events.len() > 2);
    }

    #[test]
    fn stop_clears_and_silences() {
        let (mut session, mut surface) = running();
        assert!(session.toggle_audio());
        session.stop(&mut surface);

        assert!(!session.is_active());
        assert!(!session.is_audio_playing());
        assert_eq!(surface.events(), &[SurfaceEvent::Clear]);
    }

    #[test]
    fn camera_toggle_requests_restart_only_while_active() {
        let mut session = Session::default();
        assert_eq!(
            session.toggle_camera(),
            CameraToggle {
                facing: Facing::Environment,
                restart: false
            }
        );
        session.start();
        assert_eq!(
            session.toggle_camera(),
            CameraToggle {
                facing: Facing::User,
                restart: true
            }
        );
    }

    #[test]
    fn capture_needs_active_session() {
        let frame = RgbaImage::new(4, 4);
        let overlay = RgbaImage::new(4, 4);
        let mut session = Session::default();
        assert!(session.capture(&frame, &overlay).is_none());
        session.start();
        assert_eq!(
            session.capture(&frame, &overlay).map(|i| i.dimensions()),
            Some((4, 4))
        );
    }

    #[test]
    fn selection_persists_across_frames() {
        let (mut session, mut surface) = running();
        session.select("spiderMan").unwrap();
        let detection = Detection::new(Size::new(100, 100), vec![fixtures::face()]);
        for _ in 0..3 {
            match session.process(&detection, &mut surface) {
                FrameOutcome::Drawn { mask, .. } => assert_eq!(mask, MaskKind::SpiderMan),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(session.phase(), Phase::new(3));
    }
}
