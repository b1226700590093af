//! Parsed command value.

use std::fmt;

/// One parsed instruction: an upper-cased action and its integer parameters.
///
/// An empty `action` means the transport went idle before any action byte
/// arrived; treat it as "no command this cycle".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    /// Upper-cased verb, e.g. `MOVE`.
    pub action: String,
    /// Parameters in order of appearance on the line.
    pub params: Vec<i32>,
}

impl Command {
    /// Build a command, upper-casing `action`.
    pub fn new(action: impl Into<String>, params: Vec<i32>) -> Self {
        let mut action = action.into();
        action.make_ascii_uppercase();
        Self { action, params }
    }

    /// `true` when no action was received.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.action.is_empty()
    }

    /// Parameter at `index`, if present.
    #[inline]
    pub fn param(&self, index: usize) -> Option<i32> {
        self.params.get(index).copied()
    }
}

/// Renders the wire form without the terminator: `MOVE 5 -3`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action)?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}
