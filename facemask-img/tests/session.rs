use facemask_img::clock::Phase;
use facemask_img::detection::Detection;
use facemask_img::draw::DrawCommand;
use facemask_img::landmarks::{Anchor, Landmark, LandmarkSet};
use facemask_img::masks::{MaskKind, Registry};
use facemask_img::session::{FrameOutcome, Session};
use facemask_img::shapes::Size;
use facemask_img::surface::{RasterSurface, RecordingSurface, Surface, SurfaceEvent};
use facemask_img::{MaskError, Result};

fn face_at(dx: f32) -> LandmarkSet {
    LandmarkSet::from_anchors(&[
        (Anchor::LeftEye, 0.2 + dx, 0.45),
        (Anchor::RightEye, 0.3 + dx, 0.45),
        (Anchor::Nose, 0.25 + dx, 0.55),
        (Anchor::LeftMouth, 0.21 + dx, 0.65),
        (Anchor::RightMouth, 0.29 + dx, 0.65),
        (Anchor::Chin, 0.25 + dx, 0.75),
        (Anchor::LeftTemple, 0.15 + dx, 0.4),
        (Anchor::RightTemple, 0.35 + dx, 0.4),
        (Anchor::Forehead, 0.25 + dx, 0.25),
    ])
}

fn started() -> Session {
    let mut session = Session::default();
    session.start();
    session
}

#[test]
fn zero_faces_blanks_the_surface() {
    let mut session = started();
    let mut surface = RecordingSurface::new();

    let outcome = session.process(&Detection::empty(Size::new(320, 240)), &mut surface);

    assert_eq!(
        outcome,
        FrameOutcome::Drawn {
            mask: MaskKind::IronMan,
            phase: Phase::new(0),
            faces: 0,
            commands: 0
        }
    );
    assert_eq!(
        surface.events(),
        &[SurfaceEvent::Resize(Size::new(320, 240)), SurfaceEvent::Clear]
    );
    assert_eq!(session.phase(), Phase::new(1));
}

#[test]
fn two_faces_share_mask_and_phase() {
    let mut session = started();
    let mut surface = RecordingSurface::new();
    for _ in 0..15 {
        session.process(&Detection::empty(Size::new(10, 10)), &mut surface);
    }
    surface.take_events();

    let detection = Detection::new(Size::new(1000, 1000), vec![face_at(0.), face_at(0.5)]);
    let outcome = session.process(&detection, &mut surface);

    let FrameOutcome::Drawn {
        mask,
        phase,
        faces,
        commands,
    } = outcome
    else {
        panic!("unexpected {outcome:?}");
    };
    assert_eq!((mask, phase, faces), (MaskKind::IronMan, Phase::new(15), 2));
    assert_eq!(commands, surface.visible().len());
    assert_eq!(session.phase(), Phase::new(16));

    // translucent pulse rings drawn for each face use the same phase
    let pulses: Vec<f32> = surface
        .visible()
        .into_iter()
        .filter_map(|c| match c {
            DrawCommand::Arc { radius, paint, .. } if paint.color().0[3] == 128 => Some(*radius),
            _ => None,
        })
        .collect();
    assert_eq!(pulses.len(), 2);
    assert!((pulses[0] - pulses[1]).abs() < 1e-4);
}

#[test]
fn invalid_selection_keeps_batman() {
    let mut session = started();
    assert_eq!(session.select("batman"), Ok(MaskKind::Batman));
    assert_eq!(
        session.select("invalidName"),
        Err(MaskError::UnknownMask("invalidName".to_string()))
    );
    assert_eq!(session.current_mask(), MaskKind::Batman);
}

#[test]
fn accessories_need_opt_in() -> Result<()> {
    let mut session = Session::new(Registry::with_accessories());
    session.start();
    session.select("jewelNecklace")?;

    let mut surface = RecordingSurface::new();
    let detection = Detection::new(Size::new(1000, 1000), vec![face_at(0.2)]);
    match session.process(&detection, &mut surface) {
        FrameOutcome::Drawn { mask, commands, .. } => {
            assert_eq!(mask, MaskKind::JewelNecklace);
            assert!(commands > 0);
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(
        Session::default().select("jewelNecklace"),
        Err(MaskError::UnregisteredMask("jewelNecklace"))
    );
    Ok(())
}

#[test]
fn truncated_landmarks_degrade_without_failing() {
    let mut session = started();
    let mut surface = RecordingSurface::new();
    let short = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 200]);

    for kind in MaskKind::FACE_MASKS {
        session.select_kind(kind).unwrap();
        let detection = Detection::new(Size::new(640, 480), vec![short.clone()]);
        assert!(matches!(
            session.process(&detection, &mut surface),
            FrameOutcome::Drawn { faces: 1, .. }
        ));
    }
}

#[test]
fn raster_surface_follows_frame_size() {
    let mut session = started();
    let mut surface = RasterSurface::default();

    for (w, h) in [(64, 48), (32, 32)] {
        let detection = Detection::new(Size::new(w, h), vec![face_at(0.3)]);
        session.process(&detection, &mut surface);
        assert_eq!(surface.size(), Size::new(w, h));
        assert!(surface.to_image().pixels().any(|p| p.0[3] > 0));
    }

    session.stop(&mut surface);
    assert!(surface.to_image().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn detections_parse_from_json() {
    let line = r#"{"width": 640, "height": 480, "faces": [[{"x": 0.1, "y": 0.2, "z": 0.0}]]}"#;
    let detection: Detection = serde_json::from_str(line).unwrap();
    assert_eq!(detection.frame_size(), Size::new(640, 480));
    assert_eq!(detection.faces[0].get(0), Some(&Landmark::new(0.1, 0.2)));

    let empty: Detection = serde_json::from_str(r#"{"width": 1, "height": 1}"#).unwrap();
    assert!(empty.faces.is_empty());
}
