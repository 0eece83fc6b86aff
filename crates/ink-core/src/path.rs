//! Pen-path codec.
//!
//! Freehand strokes are stored on the wire as compact path-data strings of
//! move/line commands in overlay coordinates, e.g. `M 10 10 L 14 12.5`.
//! Built on `winnow` 0.7. Coordinates are quantized to 1/100 px on emit,
//! which keeps the canonical form stable: parsing an emitted string yields
//! the same command list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use winnow::combinator::alt;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// A single path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(f32, f32),
    LineTo(f32, f32),
}

impl PathCmd {
    pub fn point(&self) -> (f32, f32) {
        match *self {
            PathCmd::MoveTo(x, y) | PathCmd::LineTo(x, y) => (x, y),
        }
    }
}

/// An ordered command sequence. Always starts with a `MoveTo`; a bare
/// `MoveTo` is a valid dot stroke (press and release without moving).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    commands: Vec<PathCmd>,
}

impl PathData {
    /// Open a path at the gesture's start point.
    pub fn start(x: f32, y: f32) -> Self {
        Self {
            commands: vec![PathCmd::MoveTo(x, y)],
        }
    }

    /// Append a line segment to the current end of the path.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCmd::LineTo(x, y));
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All vertices in order, command kind erased.
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.commands.iter().map(PathCmd::point)
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────

/// Parse a path-data string into a `PathData`.
///
/// Accepts whitespace and/or a comma between coordinates. The first command
/// must be `M`; an empty string is rejected.
pub fn parse_path(input: &str) -> Result<PathData, String> {
    let mut rest = input.trim();
    if rest.is_empty() {
        return Err("empty path".to_string());
    }

    let mut commands = Vec::new();
    while !rest.is_empty() {
        let cmd = parse_cmd
            .parse_next(&mut rest)
            .map_err(|e| format!("path parse error: {e}"))?;
        commands.push(cmd);
        rest = rest.trim_start();
    }

    if !matches!(commands[0], PathCmd::MoveTo(..)) {
        return Err("path must begin with a move command".to_string());
    }

    Ok(PathData { commands })
}

fn parse_cmd(input: &mut &str) -> ModalResult<PathCmd> {
    let op = alt(('M', 'L')).parse_next(input)?;
    let x = preceded_coord(input)?;
    let y = preceded_coord(input)?;
    Ok(match op {
        'M' => PathCmd::MoveTo(x, y),
        _ => PathCmd::LineTo(x, y),
    })
}

/// Skip separators (spaces, one optional comma) then parse a coordinate.
fn preceded_coord(input: &mut &str) -> ModalResult<f32> {
    skip_separators(input);
    parse_number(input)
}

fn skip_separators(input: &mut &str) {
    *input = input.trim_start();
    if let Some(stripped) = input.strip_prefix(',') {
        *input = stripped.trim_start();
    }
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f32>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

// ─── Emitter ─────────────────────────────────────────────────────────────

/// Emit the canonical string form: single spaces, coordinates quantized to
/// 1/100 px, no trailing zeros.
pub fn emit_path(path: &PathData) -> String {
    let mut out = String::new();
    for (i, cmd) in path.commands.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let (op, x, y) = match *cmd {
            PathCmd::MoveTo(x, y) => ('M', x, y),
            PathCmd::LineTo(x, y) => ('L', x, y),
        };
        out.push(op);
        out.push(' ');
        out.push_str(&fmt_coord(x));
        out.push(' ');
        out.push_str(&fmt_coord(y));
    }
    out
}

fn fmt_coord(v: f32) -> String {
    let mut s = format!("{v:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&emit_path(self))
    }
}

impl FromStr for PathData {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl Serialize for PathData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&emit_path(self))
    }
}

impl<'de> Deserialize<'de> for PathData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_path(&s).map_err(serde::de::Error::custom)
    }
}
