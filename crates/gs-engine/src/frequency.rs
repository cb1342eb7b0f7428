//! Pitch-row to frequency conversion.
//!
//! Row indices run from the top of the grid downwards: row 0 is the highest
//! key and row 87 the lowest, with A4 (440 Hz) at row 39.

/// Row index of the reference pitch.
pub const REFERENCE_PITCH: usize = 39;

/// Frequency of the reference pitch in Hz.
pub const REFERENCE_HZ: f64 = 440.0;

/// Equal-tempered frequency of a pitch row, truncated to whole Hz.
pub fn pitch_frequency(pitch: usize) -> u32 {
    let semitones_up = REFERENCE_PITCH as f64 - pitch as f64;
    libm::floor(libm::pow(2.0, semitones_up / 12.0) * REFERENCE_HZ) as u32
}
