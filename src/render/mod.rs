//! # Render Module
//!
//! The board side of synchronization. The session drives a [`BoardRenderer`]
//! with imperative calls; the renderer never calls back into the session.
//!
//! ## Renderers
//! - [`CommandLog`] - Records every call (tests, dry runs)
//! - [`AsciiBoard`] - Keeps the latest state and draws it as text for the CLI

mod ascii;

pub use ascii::AsciiBoard;

/// Board widget contract.
///
/// Highlights and arrows are always cleared and re-added as a group, so
/// implementations don't need to diff.
pub trait BoardRenderer {
    /// Show the position encoded by `fen`. The string is passed through verbatim.
    fn set_position(&mut self, fen: &str);
    fn clear_highlights(&mut self);
    fn add_highlight(&mut self, square: &str);
    fn clear_arrows(&mut self);
    fn add_arrow(&mut self, from: &str, to: &str);

    /// Called once when the session is torn down.
    fn release(&mut self) {}
}

/// Parse an algebraic square ("e4") into zero-based (file, rank).
pub fn parse_square(square: &str) -> Option<(u8, u8)> {
    match square.as_bytes() {
        [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some((file - b'a', rank - b'1')),
        _ => None,
    }
}

pub fn is_valid_square(square: &str) -> bool {
    parse_square(square).is_some()
}

/// A single renderer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    SetPosition(String),
    ClearHighlights,
    AddHighlight(String),
    ClearArrows,
    AddArrow { from: String, to: String },
}

/// Renderer that records the calls it receives.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Vec<RenderCommand>,
    released: bool,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl BoardRenderer for CommandLog {
    fn set_position(&mut self, fen: &str) {
        self.commands.push(RenderCommand::SetPosition(fen.to_string()));
    }

    fn clear_highlights(&mut self) {
        self.commands.push(RenderCommand::ClearHighlights);
    }

    fn add_highlight(&mut self, square: &str) {
        self.commands.push(RenderCommand::AddHighlight(square.to_string()));
    }

    fn clear_arrows(&mut self) {
        self.commands.push(RenderCommand::ClearArrows);
    }

    fn add_arrow(&mut self, from: &str, to: &str) {
        self.commands.push(RenderCommand::AddArrow {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    fn release(&mut self) {
        self.released = true;
    }
}
