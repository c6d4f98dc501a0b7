//! Chord voicings: choosing chord tones, placing them in register
//! and leading from one voicing to the next.

mod error;
pub mod options;
pub mod selection;
pub mod absolute;
pub mod leading;
pub mod next;

use std::fmt::Display;
use crate::core::Pitch;

pub use error::VoicingError;
pub use options::{Hooks, NoteCount, VoicingOptions, Window};
pub use selection::{all_voice_permutations, available_tensions, note_selections, optional_notes, pitches, required_notes, voice_permutations, ChordPitches};
pub use absolute::{absolute, allocations, chord_voicings};
pub use leading::{analyze, analyze_voice_leading, voice_leading, voicing_intervals, Tone, VoiceLeading};
pub use next::{desired_direction, next_voicing, voice_chord};

/// Pitches from the bottom voice up.
pub type Voicing = Vec<Pitch>;

/// Space-separated note names, e.g. "C4 E4 G4".
pub fn describe<T: Display>(notes: &[T]) -> String {
    notes.iter()
        .map(|n| n.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}
