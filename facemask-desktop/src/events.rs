use anyhow::{Context, Result};
use facemask_img::detection::Detection;
use serde::Deserialize;
use std::path::PathBuf;

/// One line of a replay stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Detector output for one video frame.
    Frame(Detection),
    Select { mask: String },
    ToggleAudio,
    ToggleCamera,
    /// Save frame plus overlay to `path`.
    Capture { path: PathBuf },
    Start,
    Stop,
}

/// Parse one stream line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Event>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let event = serde_json::from_str(line).with_context(|| format!("Bad event: {line}"))?;
    Ok(Some(event))
}

/// A non-frame event, stamped with how many frames preceded it in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub before_frame: u64,
    pub event: Event,
}

#[test]
fn parses_frame() {
    let event = parse_line(r#"{"type": "frame", "width": 4, "height": 3, "faces": []}"#)
        .unwrap()
        .unwrap();
    match event {
        Event::Frame(d) => assert_eq!((d.width, d.height, d.faces.len()), (4, 3, 0)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn parses_controls() {
    assert_eq!(
        parse_line(r#"{"type": "select", "mask": "batman"}"#).unwrap(),
        Some(Event::Select {
            mask: "batman".to_string()
        })
    );
    assert_eq!(
        parse_line(r#"{"type":"toggle_audio"}"#).unwrap(),
        Some(Event::ToggleAudio)
    );
    assert_eq!(
        parse_line(r#"{"type":"capture","path":"out.png"}"#).unwrap(),
        Some(Event::Capture {
            path: PathBuf::from("out.png")
        })
    );
}

#[test]
fn skips_blank_and_comment_lines() {
    assert_eq!(parse_line("   ").unwrap(), None);
    assert_eq!(parse_line("# recorded 2024-01-01").unwrap(), None);
    assert!(parse_line(r#"{"type":"explode"}"#).is_err());
}
