//! Golden event fixtures.
//!
//! A fixture file lists markup inputs and the exact event lines they must produce,
//! in the format of [`view_parser::event_fmt`]. TOML and JSON files share one
//! schema:
//!
//! ```toml
//! format = "view-parser-events-v1"
//!
//! [[cases]]
//! id = "void-element"
//! markup = "<br>x"
//! expected = ["START name=br unary=true", "END name=br unary=true", "CHARS text=\"x\"", "DONE"]
//! ```

use crate::{RecordingHandler, diff_lines};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use view_parser::{EventKind, Parser, ParserConfig};

pub const EVENTS_FORMAT_V1: &str = "view-parser-events-v1";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GoldenManifest {
    pub format: String,
    pub cases: Vec<GoldenCase>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GoldenCase {
    pub id: String,
    pub markup: String,
    /// Compare lines with ` line=N` suffixes.
    #[serde(default)]
    pub with_lines: bool,
    /// Kinds the handler vetoes; the case then checks the recorded stream, not
    /// the live calls.
    #[serde(default)]
    pub skip: Vec<EventKind>,
    pub expected: Vec<String>,
}

/// Loads a fixture file, picking the parser by extension. Panics with the path on
/// any read, parse, or validation failure.
pub fn load_manifest(path: &Path) -> GoldenManifest {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read golden fixture {path:?}: {err}"));
    let manifest: GoldenManifest = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse golden TOML {path:?}: {err}")),
        Some("json") => serde_json::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse golden JSON {path:?}: {err}")),
        other => panic!("unsupported golden fixture extension {other:?} for {path:?}"),
    };
    validate_manifest(&manifest, path);
    manifest
}

fn validate_manifest(manifest: &GoldenManifest, path: &Path) {
    assert_eq!(
        manifest.format, EVENTS_FORMAT_V1,
        "unsupported golden fixture format in {path:?}"
    );
    let mut seen = BTreeSet::new();
    for case in &manifest.cases {
        assert!(!case.id.is_empty(), "golden case with empty id in {path:?}");
        assert!(
            seen.insert(case.id.as_str()),
            "duplicate golden case id '{}' in {path:?}",
            case.id
        );
        assert_eq!(
            case.expected.last().map(String::as_str).map(|line| line.starts_with("DONE")),
            Some(true),
            "golden case '{}' in {path:?} must end with DONE",
            case.id
        );
    }
}

/// Parses the case's markup and compares the produced lines with the expected ones.
pub fn run_case(case: &GoldenCase) -> Result<(), String> {
    let parser = Parser::new(ParserConfig::default().quiet());
    let mut handler = RecordingHandler::skipping(&case.skip);
    let stream = parser
        .parse_recorded(&case.markup, &mut handler)
        .map_err(|err| format!("case '{}': {err}", case.id))?;

    let actual: Vec<String> = if case.skip.is_empty() {
        if case.with_lines {
            handler.lines_with_numbers()
        } else {
            handler.lines()
        }
    } else {
        let mut replayed = RecordingHandler::new();
        let Ok(_) = stream.replay(&mut replayed);
        if case.with_lines {
            replayed.lines_with_numbers()
        } else {
            replayed.lines()
        }
    };

    if actual == case.expected {
        Ok(())
    } else {
        Err(format!(
            "case '{}' ({:?}):\n{}",
            case.id,
            case.markup,
            diff_lines(&case.expected, &actual)
        ))
    }
}
