//! Run boundary repair rules for note commands.

use gs_ir::NoteCommand;

/// Which edge of a run a column is being repaired as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// A run starts here and has no predecessor.
    Start,
    /// A run ends here and has no successor.
    End,
    /// A run starts here unless the previous column is occupied, in which
    /// case it continues that run.
    BlendStart,
    /// A run ends here unless the next column is occupied, in which case
    /// it continues into that run.
    BlendEnd,
}

/// Re-derive the marker for one column.
///
/// `has_prev` / `has_next` report whether the neighboring columns at the
/// same voice and pitch hold a non-empty command.
pub fn repair(current: NoteCommand, kind: Boundary, has_prev: bool, has_next: bool) -> NoteCommand {
    use NoteCommand::*;

    match (kind, current) {
        (Boundary::BlendStart, Begin) if has_prev => Hold,
        (Boundary::BlendStart, Short) if has_prev => End,
        (Boundary::BlendStart, _) if has_prev => current,
        (Boundary::BlendEnd, End) if has_next => Hold,
        (Boundary::BlendEnd, Short) if has_next => Begin,
        (Boundary::BlendEnd, _) if has_next => current,

        (Boundary::Start | Boundary::BlendStart, End) => Short,
        (Boundary::Start | Boundary::BlendStart, Hold) => Begin,
        (Boundary::End | Boundary::BlendEnd, Begin) => Short,
        (Boundary::End | Boundary::BlendEnd, Hold) => End,
        _ => current,
    }
}
