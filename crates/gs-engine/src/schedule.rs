//! Score-to-trigger scheduling.
//!
//! Walks every voice of a score once, turning note begin/end markers at or
//! after the start column into timed start/stop triggers.

use alloc::vec::Vec;

use gs_ir::{Linear, Maximum, ScoreData, ValueConverter, NUM_NOTES};

use crate::frequency::pitch_frequency;

/// Stop triggers land just before the next column so back-to-back notes
/// at one pitch release before they retrigger.
pub const NOTE_RELEASE_COLUMNS: f64 = 0.999;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerKind {
    Start,
    Stop,
}

/// One instrument call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEvent {
    pub voice: usize,
    pub pitch: usize,
    pub frequency: u32,
    /// Seconds after playback start
    pub time: f64,
    pub kind: TriggerKind,
}

#[derive(Clone, Debug, Default)]
pub struct Schedule {
    /// Triggers sorted by time. Ties keep scan order.
    pub events: Vec<TriggerEvent>,
    /// Time of the last stop trigger
    pub play_duration: f64,
}

impl Schedule {
    pub fn starts(&self) -> impl Iterator<Item = &TriggerEvent> {
        self.events.iter().filter(|e| e.kind == TriggerKind::Start)
    }

    pub fn stops(&self) -> impl Iterator<Item = &TriggerEvent> {
        self.events.iter().filter(|e| e.kind == TriggerKind::Stop)
    }
}

/// Maps columns to seconds relative to playback starting at `start_column`.
pub fn columns_to_seconds(score: &ScoreData, start_column: f64) -> Linear {
    Linear::with_offset_first(score.seconds_per_column(), -start_column)
}

/// Build the trigger list for playing `score` from `start_column`.
///
/// Notes that begin before the start column and are still held at it start
/// at time zero.
pub fn schedule_score(score: &ScoreData, start_column: f64) -> Schedule {
    let seconds = columns_to_seconds(score, start_column);
    let mut events = Vec::new();
    let mut duration = Maximum::new(0.0);

    for (voice, data) in score.voices().iter().enumerate() {
        let mut sounding = [false; NUM_NOTES];
        for column in 0..data.len() {
            let before_start = (column as f64) < start_column;
            for (pitch, command) in data.column(column).iter().enumerate() {
                if before_start {
                    if command.begins() {
                        sounding[pitch] = true;
                    }
                    if command.ends() {
                        sounding[pitch] = false;
                    }
                    continue;
                }

                if command.begins() {
                    events.push(TriggerEvent {
                        voice,
                        pitch,
                        frequency: pitch_frequency(pitch),
                        time: seconds.forwards(column as f64),
                        kind: TriggerKind::Start,
                    });
                }
                if command.ends() {
                    let time = seconds.forwards(column as f64 + NOTE_RELEASE_COLUMNS);
                    duration.accept(time);
                    events.push(TriggerEvent {
                        voice,
                        pitch,
                        frequency: pitch_frequency(pitch),
                        time,
                        kind: TriggerKind::Stop,
                    });
                }
            }
        }

        for pitch in (0..NUM_NOTES).filter(|&p| sounding[p]) {
            events.push(TriggerEvent {
                voice,
                pitch,
                frequency: pitch_frequency(pitch),
                time: 0.0,
                kind: TriggerKind::Start,
            });
        }
    }

    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    Schedule {
        events,
        play_duration: duration.get(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_ir::NoteCommand;

    const SPC: f64 = 0.5 / 6.0;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn write_note(score: &mut ScoreData, voice: usize, pitch: usize, start: usize, end: usize) {
        if start == end {
            score.set_note(voice, start, pitch, NoteCommand::Short);
            return;
        }
        score.set_note(voice, start, pitch, NoteCommand::Begin);
        for c in start + 1..end {
            score.set_note(voice, c, pitch, NoteCommand::Hold);
        }
        score.set_note(voice, end, pitch, NoteCommand::End);
    }

    #[test]
    fn empty_score_has_no_duration() {
        let schedule = schedule_score(&ScoreData::new(16), 0.0);
        assert!(schedule.events.is_empty());
        assert_eq!(schedule.play_duration, 0.0);
    }

    #[test]
    fn note_times_follow_tempo() {
        let mut score = ScoreData::new(16);
        write_note(&mut score, 0, 39, 2, 5);
        let schedule = schedule_score(&score, 0.0);

        let start: Vec<_> = schedule.starts().collect();
        let stop: Vec<_> = schedule.stops().collect();
        assert_eq!(start.len(), 1);
        assert_eq!(stop.len(), 1);
        assert_eq!(start[0].frequency, 440);
        assert!(approx(start[0].time, 2.0 * SPC));
        assert!(approx(stop[0].time, 5.999 * SPC));
        assert!(approx(schedule.play_duration, 5.999 * SPC));
    }

    #[test]
    fn short_note_starts_and_stops_in_one_column() {
        let mut score = ScoreData::new(4);
        write_note(&mut score, 1, 10, 3, 3);
        let schedule = schedule_score(&score, 0.0);
        assert_eq!(schedule.events.len(), 2);
        assert_eq!(schedule.events[0].kind, TriggerKind::Start);
        assert!(approx(schedule.events[1].time - schedule.events[0].time, 0.999 * SPC));
    }

    #[test]
    fn duration_is_latest_stop_across_voices() {
        let mut score = ScoreData::new(32);
        write_note(&mut score, 0, 20, 0, 3);
        write_note(&mut score, 4, 60, 10, 20);
        write_note(&mut score, 2, 5, 6, 6);
        let schedule = schedule_score(&score, 0.0);

        let latest = schedule.stops().map(|e| e.time).fold(0.0, f64::max);
        assert!(approx(schedule.play_duration, latest));
        assert!(approx(schedule.play_duration, 20.999 * SPC));
    }

    #[test]
    fn notes_before_start_are_skipped_and_straddlers_start_at_zero() {
        let mut score = ScoreData::new(16);
        write_note(&mut score, 0, 30, 0, 2); // entirely before
        write_note(&mut score, 0, 40, 2, 6); // straddles column 4
        write_note(&mut score, 0, 50, 5, 7); // after
        let schedule = schedule_score(&score, 4.0);

        assert!(schedule.events.iter().all(|e| e.pitch != 30));

        let straddler: Vec<_> = schedule.events.iter().filter(|e| e.pitch == 40).collect();
        assert_eq!(straddler.len(), 2);
        assert_eq!(straddler[0].kind, TriggerKind::Start);
        assert_eq!(straddler[0].time, 0.0);
        assert!(approx(straddler[1].time, 2.999 * SPC));

        let later = schedule.starts().find(|e| e.pitch == 50).map(|e| e.time);
        assert!(approx(later.unwrap_or(-1.0), SPC));
    }

    #[test]
    fn note_ending_just_before_start_is_not_resumed() {
        let mut score = ScoreData::new(8);
        write_note(&mut score, 0, 12, 1, 3);
        let schedule = schedule_score(&score, 4.0);
        assert!(schedule.events.is_empty());
    }

    #[test]
    fn events_are_sorted_by_time() {
        let mut score = ScoreData::new(24);
        write_note(&mut score, 3, 1, 10, 12);
        write_note(&mut score, 0, 2, 0, 20);
        write_note(&mut score, 5, 3, 4, 4);
        let schedule = schedule_score(&score, 0.0);
        assert!(schedule.events.windows(2).all(|w| w[0].time <= w[1].time));
    }
}
