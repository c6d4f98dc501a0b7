use std::cmp::Ordering;
use serde::Deserialize;
use lazy_static::lazy_static;
use crate::core::{Direction, Note, Pitch, PitchClass, Register};
use super::error::VoicingError;
use super::leading::VoiceLeading;

lazy_static! {
    /// For each interval in semitones, the lowest pitch
    /// its upper note may sit on before the interval turns muddy.
    static ref LOW_INTERVAL_LIMITS: Vec<(isize, Pitch)> = {
        let limits: [(isize, &str); 11] = [
            (1, "E3"), (2, "Eb3"), (3, "C3"), (4, "Bb2"), (5, "Bb2"),
            (6, "B2"), (7, "Bb1"), (8, "F2"), (9, "F2"), (10, "F2"), (11, "F2")];
        limits.iter().map(|(semis, p)| (*semis, (*p).try_into().unwrap())).collect()
    };
}

/// The lowest allowed upper note for an interval, if it has a limit.
pub fn low_interval_limit(semitones: isize) -> Option<Pitch> {
    LOW_INTERVAL_LIMITS.iter()
        .find(|(semis, _)| *semis == semitones)
        .map(|(_, limit)| *limit)
}

/// How many notes a voicing may have.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NoteCount {
    Fixed(usize),
    Range(usize, usize),
}

impl NoteCount {
    pub fn bounds(&self) -> (usize, usize) {
        match self {
            NoteCount::Fixed(n) => (*n, *n),
            NoteCount::Range(min, max) => (*min, *max),
        }
    }
}

/// Inclusive semitone bounds for the gap between two neighbouring notes.
/// Written as `[min, max]` in config files.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub struct Window(pub isize, pub isize);

impl Window {
    pub fn contains(&self, semitones: isize) -> bool {
        semitones >= self.0 && semitones <= self.1
    }

    /// Like `contains`, but a bound of 0 is open.
    pub fn admits(&self, semitones: isize) -> bool {
        (self.0 == 0 || semitones >= self.0) && (self.1 == 0 || semitones <= self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VoicingOptions {
    /// Outer bounds for all voiced pitches.
    pub range: Option<Register>,

    /// Number of notes in an absolute voicing.
    pub notes: NoteCount,
    pub min_notes: Option<usize>,
    pub max_notes: Option<usize>,

    /// Semitones the outer voices of the previous voicing may come
    /// to the range edges before the next pick is pushed away from them.
    pub range_borders: (isize, isize),

    /// Number of pitch classes picked from a chord.
    pub max_voices: usize,

    pub force_direction: Option<Direction>,
    pub force_best_pick: bool,

    // Absolute search
    pub required_pitches: Vec<PitchClass>,
    pub optional_pitches: Vec<PitchClass>,
    pub default_distances: Window,
    pub bottom_distances: Vec<Option<Window>>,
    pub top_distances: Vec<Window>,
    pub prefer_top_distances: bool,
    pub bottom_pitches: Vec<Vec<PitchClass>>,
    pub top_pitches: Vec<Vec<PitchClass>>,
    pub bottom_degrees: Vec<Vec<usize>>,
    pub top_degrees: Vec<Vec<usize>>,
    pub voices: Vec<Register>,
    pub ignore_lower_interval_limits: bool,
    pub max_solutions: Option<usize>,

    // Pitch class permutations
    pub top_notes: Vec<Note>,
    pub bottom_notes: Vec<Note>,
    pub omit_notes: Vec<PitchClass>,
    pub max_distance: isize,
    pub min_distance: isize,
    pub min_bottom_distance: isize,
    pub min_top_distance: isize,

    // Next voicing
    pub no_top_drop: bool,
    pub no_top_add: bool,
    pub no_bottom_drop: bool,
    pub no_bottom_add: bool,
    pub idle_chance: f64,
}

impl Default for VoicingOptions {
    fn default() -> Self {
        VoicingOptions {
            range: Some(Register::default()),
            notes: NoteCount::Fixed(4),
            min_notes: None,
            max_notes: None,
            range_borders: (3, 3),
            max_voices: 3,
            force_direction: None,
            force_best_pick: false,
            required_pitches: vec![],
            optional_pitches: vec![],
            default_distances: Window(1, 7),
            bottom_distances: vec![],
            top_distances: vec![],
            prefer_top_distances: false,
            bottom_pitches: vec![],
            top_pitches: vec![],
            bottom_degrees: vec![],
            top_degrees: vec![],
            voices: vec![],
            ignore_lower_interval_limits: false,
            max_solutions: None,
            top_notes: vec![],
            bottom_notes: vec![],
            omit_notes: vec![],
            max_distance: 6,
            min_distance: 1,
            min_bottom_distance: 3,
            min_top_distance: 2,
            no_top_drop: true,
            no_top_add: true,
            no_bottom_drop: false,
            no_bottom_add: false,
            idle_chance: 1.,
        }
    }
}

impl VoicingOptions {
    /// Min and max note counts, with `min_notes`/`max_notes`
    /// taking precedence over `notes`.
    pub fn note_bounds(&self) -> Result<(usize, usize), VoicingError> {
        let (min, max) = self.notes.bounds();
        let min = self.min_notes.unwrap_or(min);
        let max = self.max_notes.unwrap_or(max);
        if min > max {
            Err(VoicingError::MinNotesAboveMax { min, max })
        } else {
            Ok((min, max))
        }
    }
}

pub type PermutationHook<'a> = &'a dyn Fn(&[PitchClass], &PitchClass, &[PitchClass]) -> bool;
pub type FilterHook<'a> = &'a dyn Fn(&VoiceLeading<Pitch>) -> bool;
pub type SortHook<'a> = &'a dyn Fn(&VoiceLeading<Pitch>, &VoiceLeading<Pitch>) -> Ordering;

/// Caller-supplied behaviour that can't live in a config file.
#[derive(Default, Clone, Copy)]
pub struct Hooks<'a> {
    /// Extra constraint on each step of a pitch class permutation.
    pub permutation: Option<PermutationHook<'a>>,

    /// Extra filter on voice-leading choices.
    pub filter: Option<FilterHook<'a>>,

    /// Replaces ordering choices by their difference.
    pub sort: Option<SortHook<'a>>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_note_bounds() {
        let opts = VoicingOptions::default();
        assert_eq!(opts.note_bounds().unwrap(), (4, 4));

        let opts = VoicingOptions {
            notes: NoteCount::Range(2, 3),
            ..Default::default()
        };
        assert_eq!(opts.note_bounds().unwrap(), (2, 3));

        let opts = VoicingOptions {
            notes: NoteCount::Range(2, 3),
            max_notes: Some(5),
            ..Default::default()
        };
        assert_eq!(opts.note_bounds().unwrap(), (2, 5));

        let opts = VoicingOptions {
            min_notes: Some(5),
            ..Default::default()
        };
        assert!(matches!(opts.note_bounds(), Err(VoicingError::MinNotesAboveMax { min: 5, max: 4 })));
    }

    #[test]
    fn test_windows() {
        let w = Window(3, 5);
        assert!(w.contains(3));
        assert!(w.contains(5));
        assert!(!w.contains(6));

        let w = Window(0, 5);
        assert!(!w.contains(-1));
        assert!(w.admits(-1));
        assert!(!w.admits(6));

        let w = Window(2, 0);
        assert!(w.admits(20));
        assert!(!w.admits(1));
    }

    #[test]
    fn test_low_interval_limits() {
        assert_eq!(low_interval_limit(1), Some("E3".try_into().unwrap()));
        assert_eq!(low_interval_limit(7), Some("Bb1".try_into().unwrap()));
        assert_eq!(low_interval_limit(11), Some("F2".try_into().unwrap()));
        assert_eq!(low_interval_limit(12), None);
    }

    #[test]
    fn test_parse_options() {
        let yaml = "
range: [G2, C4]
notes: [2, 3]
required_pitches: [E]
optional_pitches: [C, E, G]
bottom_distances: [~, [1, 2]]
top_notes: [G3, C]
force_direction: up
";
        let opts: VoicingOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(opts.range, Some(Register("G2".try_into().unwrap(), "C4".try_into().unwrap())));
        assert_eq!(opts.notes, NoteCount::Range(2, 3));
        assert_eq!(opts.required_pitches, vec!["E".try_into().unwrap()]);
        assert_eq!(opts.bottom_distances, vec![None, Some(Window(1, 2))]);
        assert_eq!(opts.top_notes, vec![
            Note::Pitch("G3".try_into().unwrap()),
            Note::Class("C".try_into().unwrap()),
        ]);
        assert_eq!(opts.force_direction, Some(Direction::Up));

        // Untouched fields keep their defaults
        assert_eq!(opts.default_distances, Window(1, 7));
        assert_eq!(opts.max_voices, 3);
        assert!(opts.no_top_drop);

        let opts: VoicingOptions = serde_yaml::from_str("notes: 3").unwrap();
        assert_eq!(opts.notes, NoteCount::Fixed(3));
    }
}
