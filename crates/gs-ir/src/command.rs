//! Per-cell commands stored in the score grid.

/// Run-length marker for one (voice, column, pitch) cell.
///
/// A maximal run of non-`None` cells at a fixed voice and pitch is one
/// played note: `Begin` opens it, `End` closes it, `Hold` fills the
/// interior, and `Short` is a single-column note.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NoteCommand {
    #[default]
    None,
    Begin,
    Hold,
    End,
    Short,
}

impl NoteCommand {
    pub const fn is_none(self) -> bool {
        matches!(self, NoteCommand::None)
    }

    /// True if a note starts sounding at this column.
    pub const fn begins(self) -> bool {
        matches!(self, NoteCommand::Begin | NoteCommand::Short)
    }

    /// True if a note stops sounding after this column.
    pub const fn ends(self) -> bool {
        matches!(self, NoteCommand::End | NoteCommand::Short)
    }
}

/// Continuous dynamics marking for one (voice, column) cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContinuousDynamicsCommand {
    #[default]
    None,
    Crescendo,
    Diminuendo,
}

impl ContinuousDynamicsCommand {
    pub const fn is_none(self) -> bool {
        matches!(self, ContinuousDynamicsCommand::None)
    }
}
