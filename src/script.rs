//! Gesture scripts: a line-oriented way to drive the editor headlessly.
//!
//! ```text
//! # comments start with '#'
//! length 48
//! bpm 90
//! voice 1
//! snap 3
//! write 39 0 5        # pitch, from column, to column
//! blend 39 6 8
//! erase 39 2 2
//! cresc 0 11          # from column, to column
//! dim 12 20
//! unpaint 4 6
//! instrument 1 Cello
//! scroll 4
//! clear
//! ```

use std::fs;
use std::path::Path;

use gs_engine::{EngineError, GatedInstrument, Transport};
use gs_master::{
    ContinuousDynamicsCommand, Controller, EditorError, EventLog, EventLogInstrument, InstrumentKind, NoteGesture,
    NUM_VOICES,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: {command} takes {expected} argument(s), found {found}")]
    Arity {
        line: usize,
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: {source}")]
    Editor { line: usize, source: EditorError },

    #[error("line {line}: {source}")]
    Engine { line: usize, source: EngineError },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Length(usize),
    Bpm(f64),
    Voice(usize),
    Snap(usize),
    Note {
        gesture: NoteGesture,
        pitch: usize,
        from: usize,
        to: usize,
    },
    Dynamics {
        command: ContinuousDynamicsCommand,
        from: usize,
        to: usize,
    },
    Instrument {
        voice: usize,
        name: String,
    },
    Scroll(f64),
    Clear,
}

/// A parsed command and the line it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub number: usize,
    pub command: Command,
}

pub fn load(path: &Path) -> Result<Vec<Line>, ScriptError> {
    let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Vec<Line>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        lines.push(Line {
            number,
            command: parse_line(number, content)?,
        });
    }
    Ok(lines)
}

fn parse_line(line: usize, content: &str) -> Result<Command, ScriptError> {
    let mut words = content.split_whitespace();
    let name = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    let arity = |command: &'static str, expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ScriptError::Arity {
                line,
                command,
                expected,
                found: args.len(),
            })
        }
    };
    let int = |i: usize| number::<usize>(line, args[i]);

    let command = match name {
        "length" => {
            arity("length", 1)?;
            Command::Length(int(0)?)
        }
        "bpm" => {
            arity("bpm", 1)?;
            Command::Bpm(number(line, args[0])?)
        }
        "voice" => {
            arity("voice", 1)?;
            Command::Voice(int(0)?)
        }
        "snap" => {
            arity("snap", 1)?;
            Command::Snap(int(0)?)
        }
        "write" | "erase" | "blend" => {
            let (gesture, label) = match name {
                "write" => (NoteGesture::Write, "write"),
                "erase" => (NoteGesture::Erase, "erase"),
                _ => (NoteGesture::Blend, "blend"),
            };
            arity(label, 3)?;
            Command::Note {
                gesture,
                pitch: int(0)?,
                from: int(1)?,
                to: int(2)?,
            }
        }
        "cresc" | "dim" | "unpaint" => {
            let (command, label) = match name {
                "cresc" => (ContinuousDynamicsCommand::Crescendo, "cresc"),
                "dim" => (ContinuousDynamicsCommand::Diminuendo, "dim"),
                _ => (ContinuousDynamicsCommand::None, "unpaint"),
            };
            arity(label, 2)?;
            Command::Dynamics {
                command,
                from: int(0)?,
                to: int(1)?,
            }
        }
        "instrument" => {
            if args.len() < 2 {
                return Err(ScriptError::Arity {
                    line,
                    command: "instrument",
                    expected: 2,
                    found: args.len(),
                });
            }
            // Names may contain spaces ("Double Basses")
            Command::Instrument {
                voice: int(0)?,
                name: args[1..].join(" "),
            }
        }
        "scroll" => {
            arity("scroll", 1)?;
            Command::Scroll(number(line, args[0])?)
        }
        "clear" => {
            arity("clear", 0)?;
            Command::Clear
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(command)
}

fn number<N: std::str::FromStr>(line: usize, value: &str) -> Result<N, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

/// A controller plus the log its instruments write to.
pub struct Session<T> {
    pub controller: Controller<T>,
    pub log: EventLog,
    pub instruments: [Option<InstrumentKind>; NUM_VOICES],
}

impl<T: Transport> Session<T> {
    /// Every voice starts with a logging instrument.
    pub fn new(mut controller: Controller<T>) -> Result<Self, EngineError> {
        let log = controller.log_all_voices()?;
        Ok(Self {
            controller,
            log,
            instruments: [None; NUM_VOICES],
        })
    }

    pub fn run(&mut self, lines: &[Line]) -> Result<(), ScriptError> {
        for line in lines {
            self.apply(line)?;
        }
        Ok(())
    }

    fn apply(&mut self, line: &Line) -> Result<(), ScriptError> {
        debug!(line = line.number, command = ?line.command, "script");
        let number = line.number;
        let editor_err = |source| ScriptError::Editor { line: number, source };
        let engine_err = |source| ScriptError::Engine { line: number, source };

        match &line.command {
            Command::Length(length) => self.controller.resize(*length),
            Command::Bpm(bpm) => self.controller.editor_mut().set_bpm(*bpm).map_err(editor_err)?,
            Command::Voice(voice) => self
                .controller
                .editor_mut()
                .set_active_voice(*voice)
                .map_err(editor_err)?,
            Command::Snap(interval) => self
                .controller
                .editor_mut()
                .set_snap_interval(*interval)
                .map_err(editor_err)?,
            Command::Note {
                gesture,
                pitch,
                from,
                to,
            } => {
                let editor = self.controller.editor_mut();
                editor.start_note_interaction(*from, *pitch, *gesture);
                editor.mouse_enter_column(*to);
                editor.end_interaction();
            }
            Command::Dynamics { command, from, to } => {
                let editor = self.controller.editor_mut();
                editor.start_dynamics_interaction(*from, *command);
                editor.mouse_enter_column(*to);
                editor.end_interaction();
            }
            Command::Instrument { voice, name } => {
                let kind: InstrumentKind = name.parse().map_err(engine_err)?;
                let backend = EventLogInstrument::new(*voice, self.log.clone());
                self.controller
                    .set_instrument(*voice, Box::new(GatedInstrument::loaded(kind, backend)))
                    .map_err(engine_err)?;
                if let Some(slot) = self.instruments.get_mut(*voice) {
                    *slot = Some(kind);
                }
            }
            Command::Scroll(column) => self.controller.scroll_to_column(*column),
            Command::Clear => self.controller.editor_mut().clear_score(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_skips_comments() {
        let lines = parse("# header\n\nwrite 39 0 5  # a note\ninstrument 2 Double Basses\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 3);
        assert_eq!(
            lines[0].command,
            Command::Note {
                gesture: NoteGesture::Write,
                pitch: 39,
                from: 0,
                to: 5
            }
        );
        assert_eq!(
            lines[1].command,
            Command::Instrument {
                voice: 2,
                name: "Double Basses".into()
            }
        );
    }

    #[test]
    fn reports_line_numbers() {
        let err = parse("snap 2\nwobble 1\n").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownCommand { line: 2, .. }));

        let err = parse("cresc 1\n").unwrap_err();
        assert!(matches!(err, ScriptError::Arity { line: 1, expected: 2, found: 1, .. }));

        let err = parse("write x 1 2\n").unwrap_err();
        assert_eq!(err.to_string(), "line 1: invalid number \"x\"");
    }
}
