use thiserror::Error;
use crate::core::ChordParseError;

#[derive(Error, Debug)]
pub enum VoicingError {
    #[error("Min notes ({min}) cannot be greater than max notes ({max})")]
    MinNotesAboveMax { min: usize, max: usize },

    #[error("Cannot voice {notes} notes with only {voices} voices")]
    TooManyNotesForVoices { notes: usize, voices: usize },

    #[error("No required or optional pitches given")]
    NoPitches,

    #[error("No range given")]
    NoRange,

    #[error("At least one note has to be voiced")]
    NoNotes,

    #[error("Couldn't parse chord")]
    Chord(#[from] ChordParseError),
}
