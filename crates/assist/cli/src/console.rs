//! Terminal stand-ins for the tabletop's crosshair, effects and toasts.
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use assist_core::Point;
use assist_runtime::{
    CrosshairPicker, CrosshairPrompt, EffectsRenderer, MarkerSpec, Notifier, PickerError,
    RenderError,
};

/// Parses `"x,y"` or `"x y"` into a point.
pub fn parse_point(input: &str) -> Option<Point> {
    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

// ============================================================================
// Pickers
// ============================================================================

/// Reads picks from stdin. An empty line, `q`, or end of input cancels.
pub struct StdinPicker {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinPicker {
    pub fn new() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl CrosshairPicker for StdinPicker {
    async fn pick(&self, prompt: &CrosshairPrompt) -> Result<Option<Point>, PickerError> {
        let mut lines = self.lines.lock().await;
        loop {
            let counter = if prompt.label.is_empty() {
                String::new()
            } else {
                format!(" [{}]", prompt.label)
            };
            eprint!(
                "pick {:?} ({}px){} as x,y (empty to cancel): ",
                prompt.footprint, prompt.marker.size, counter
            );
            let _ = std::io::stderr().flush();

            let line = lines
                .next_line()
                .await
                .map_err(|e| PickerError::new(format!("cannot read stdin: {e}")))?;
            let Some(line) = line else {
                return Ok(None);
            };
            let line = line.trim();
            if line.is_empty() || line.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match parse_point(line) {
                Some(point) => return Ok(Some(point)),
                None => eprintln!("cannot parse {line:?}, expected x,y"),
            }
        }
    }
}

/// Replays picks given on the command line, then cancels.
pub struct ScriptPicker {
    points: Mutex<VecDeque<Point>>,
}

impl ScriptPicker {
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: Mutex::new(points.into_iter().collect()),
        }
    }
}

#[async_trait]
impl CrosshairPicker for ScriptPicker {
    async fn pick(&self, prompt: &CrosshairPrompt) -> Result<Option<Point>, PickerError> {
        let next = self
            .points
            .lock()
            .map_err(|_| PickerError::new("pick script lock poisoned"))?
            .pop_front();
        tracing::debug!(label = %prompt.label, pick = ?next, "Scripted pick");
        Ok(next)
    }
}

// ============================================================================
// Effects & notifications
// ============================================================================

pub struct ConsoleRenderer;

#[async_trait]
impl EffectsRenderer for ConsoleRenderer {
    async fn show_marker(&self, anchor: Point, marker: &MarkerSpec) -> Result<(), RenderError> {
        tracing::info!(
            x = anchor.x,
            y = anchor.y,
            asset = %marker.asset,
            size = marker.size,
            alpha = marker.alpha,
            "Marker"
        );
        Ok(())
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
