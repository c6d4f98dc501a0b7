//! Searching voicings as absolute pitches inside a range.

use log::{debug, trace};
use crate::core::{Chord, Pitch, PitchClass, Register};
use crate::search::search;
use super::error::VoicingError;
use super::options::{low_interval_limit, VoicingOptions, Window};
use super::selection::pitches;
use super::Voicing;

/// Options with everything a search needs worked out up front.
struct ResolvedOptions<'a> {
    options: &'a VoicingOptions,
    min_notes: usize,
    max_notes: usize,
    range: Register,

    /// Every pitch in range whose class may be voiced, ascending.
    allowed: Vec<Pitch>,
}

impl<'a> ResolvedOptions<'a> {
    fn resolve(options: &'a VoicingOptions) -> Result<ResolvedOptions<'a>, VoicingError> {
        let mut pool: Vec<PitchClass> = vec![];
        for pc in options.required_pitches.iter().chain(&options.optional_pitches) {
            if !pool.contains(pc) {
                pool.push(*pc);
            }
        }
        if pool.is_empty() {
            return Err(VoicingError::NoPitches);
        }

        let (min_notes, max_notes) = options.note_bounds()?;
        let range = match (options.voices.first(), options.voices.last()) {
            (Some(lowest), Some(highest)) => {
                if max_notes > options.voices.len() {
                    return Err(VoicingError::TooManyNotesForVoices {
                        notes: max_notes,
                        voices: options.voices.len(),
                    });
                }
                Register(lowest.low(), highest.high())
            }
            _ => options.range.ok_or(VoicingError::NoRange)?,
        };
        if min_notes == 0 {
            return Err(VoicingError::NoNotes);
        }

        let allowed = range.pitches()
            .filter(|p| pool.contains(&p.chroma()))
            .collect();
        Ok(ResolvedOptions {
            options,
            min_notes,
            max_notes,
            range,
            allowed,
        })
    }

    /// The window for the gap above the note at `len - 1`.
    ///
    /// Top distances are only considered for a fixed number of notes.
    /// The lookup checks one gap further down than the window it takes.
    fn distance_window(&self, len: usize) -> Window {
        let opts = self.options;
        let bottom = opts.bottom_distances.get(len - 1).copied().flatten();
        let top = if self.min_notes == self.max_notes
            && opts.top_distances.get(self.max_notes - len - 1).is_some() {
            opts.top_distances.get(self.max_notes - len).copied()
        } else {
            None
        };
        match (bottom, top) {
            (Some(bottom), Some(top)) => if opts.prefer_top_distances { top } else { bottom },
            (bottom, top) => bottom.or(top).unwrap_or(opts.default_distances),
        }
    }

    fn fits_bottom_pitches(&self, position: usize, pitch: &Pitch) -> bool {
        self.options.bottom_pitches.get(position)
            .map_or(true, |classes| classes.contains(&pitch.chroma()))
    }

    fn candidates(&self, path: &[Pitch], solutions: &[Voicing]) -> Vec<Pitch> {
        if self.options.max_solutions.map_or(false, |n| solutions.len() >= n) {
            return vec![];
        }
        let last = match path.last() {
            None => return self.allowed.iter()
                .filter(|p| self.fits_bottom_pitches(0, p))
                .cloned()
                .collect(),
            Some(last) => *last,
        };
        if path.len() >= self.max_notes {
            return vec![];
        }
        let window = self.distance_window(path.len());
        self.allowed.iter()
            .filter(|p| {
                let semis = (**p - last).semitones;
                semis > 0
                    && window.admits(semis)
                    && self.fits_bottom_pitches(path.len(), p)
                    && (self.options.ignore_lower_interval_limits
                        || low_interval_limit(semis).map_or(true, |limit| **p >= limit))
            })
            .cloned()
            .collect()
    }

    fn accepts(&self, path: &[Pitch]) -> bool {
        let opts = self.options;
        if path.len() < self.min_notes {
            return false;
        }
        if !opts.required_pitches.iter().all(|pc| path.iter().any(|p| p.chroma() == *pc)) {
            return false;
        }
        if let Some(top) = path.last() {
            if !opts.top_notes.is_empty() && !opts.top_notes.iter().any(|n| n.matches(top)) {
                return false;
            }
        }
        if !anchored_at_top(path.len(), &opts.top_pitches, |i, classes| classes.contains(&path[i].chroma())) {
            return false;
        }
        if !anchored_at_top(path.len(), &opts.top_distances, |i, window| window.contains((path[i] - path[i - 1]).semitones)) {
            return false;
        }
        if !opts.voices.is_empty() && allocations(path, &opts.voices).is_empty() {
            trace!("{} can't be split across the voices", super::describe(path));
            return false;
        }
        true
    }
}

/// Check constraints listed bottom to top against the top end of a path
/// of `len` notes. The constraint that would land on the first note is
/// skipped, one that lands below it fails.
fn anchored_at_top<C>(len: usize, constraints: &[C], check: impl Fn(usize, &C) -> bool) -> bool {
    constraints.iter().enumerate().all(|(i, constraint)| {
        match (len + i).checked_sub(constraints.len()) {
            None => false,
            Some(0) => true,
            Some(index) => check(index, constraint),
        }
    })
}

/// Every voicing in range that satisfies the options, in ascending
/// order of their notes from the bottom up.
pub fn absolute(options: &VoicingOptions) -> Result<Vec<Voicing>, VoicingError> {
    let resolved = ResolvedOptions::resolve(options)?;
    let voicings = search(
        |path: &[Pitch], solutions: &[Voicing]| resolved.candidates(path, solutions),
        |path: &[Pitch], _: &[Voicing]| resolved.accepts(path));
    debug!("{} pitches in {}, {} voicings",
        resolved.allowed.len(), resolved.range, voicings.len());
    Ok(voicings)
}

/// Ways to hand out `notes`, bottom to top, to voices with the given
/// registers so that each voice sings a note in its range.
///
/// Voices are ordered by their upper bound; each note goes to a higher
/// voice than the note below it. Returns voice indices in that order.
pub fn allocations(notes: &[Pitch], voices: &[Register]) -> Vec<Vec<usize>> {
    let mut voices = voices.to_vec();
    voices.sort_by_key(|v| v.high());
    search(
        |path: &[usize], _: &[Vec<usize>]| {
            if path.len() >= notes.len() {
                return vec![];
            }
            let note = notes[path.len()];
            let lowest = path.last().map_or(0, |last| last + 1);
            (lowest..voices.len())
                .filter(|i| voices[*i].contains(&note))
                .collect()
        },
        |path: &[usize], _: &[Vec<usize>]| path.len() == notes.len())
}

/// Absolute voicings of a chord.
///
/// Required and optional pitches come from the chord unless given,
/// and bottom/top degrees are turned into the matching pitch classes.
pub fn chord_voicings(chord: &Chord, options: &VoicingOptions) -> Result<Vec<Voicing>, VoicingError> {
    let (_, max_notes) = options.note_bounds()?;
    let derived = pitches(chord, max_notes);
    let mut options = options.clone();
    if options.required_pitches.is_empty() {
        options.required_pitches = derived.required;
    }
    if options.optional_pitches.is_empty() {
        options.optional_pitches = derived.optional;
    }
    let degree_classes = |degrees: &[Vec<usize>]| -> Vec<Vec<PitchClass>> {
        degrees.iter()
            .map(|ds| ds.iter().filter_map(|d| chord.tone_at(*d)).collect())
            .collect()
    };
    let bottom = degree_classes(&options.bottom_degrees);
    let top = degree_classes(&options.top_degrees);
    options.bottom_pitches.extend(bottom);
    options.top_pitches.extend(top);
    absolute(&options)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::voicing::options::NoteCount;

    fn pitch(name: &str) -> Pitch {
        name.try_into().unwrap()
    }

    fn pcs(names: &[&str]) -> Vec<PitchClass> {
        names.iter().map(|n| (*n).try_into().unwrap()).collect()
    }

    fn voicings(names: &[&str]) -> Vec<Voicing> {
        // Voicings written as "G2 C3 E3"
        names.iter()
            .map(|v| v.split(' ').map(pitch).collect())
            .collect()
    }

    fn range(low: &str, high: &str) -> Option<Register> {
        Some(Register(pitch(low), pitch(high)))
    }

    fn c_major(notes: NoteCount, default_distances: Window) -> VoicingOptions {
        VoicingOptions {
            range: range("G2", "C4"),
            notes,
            default_distances,
            required_pitches: pcs(&["E"]),
            optional_pitches: pcs(&["C", "E", "G"]),
            ..Default::default()
        }
    }

    #[test]
    fn test_absolute() {
        let opts = c_major(NoteCount::Fixed(3), Window(1, 12));
        assert_eq!(absolute(&opts).unwrap(), voicings(&[
            "G2 C3 E3", "G2 E3 G3", "G2 E3 C4", "C3 E3 G3", "C3 E3 C4", "E3 G3 C4",
        ]));

        let opts = c_major(NoteCount::Fixed(3), Window(1, 6));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["G2 C3 E3", "C3 E3 G3", "E3 G3 C4"]));

        let opts = c_major(NoteCount::Fixed(3), Window(5, 12));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["G2 E3 C4"]));

        let opts = c_major(NoteCount::Fixed(2), Window(1, 6));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["C3 E3", "E3 G3"]));

        let opts = c_major(NoteCount::Range(2, 3), Window(1, 6));
        assert_eq!(absolute(&opts).unwrap(), voicings(&[
            "G2 C3 E3", "C3 E3", "C3 E3 G3", "E3 G3", "E3 G3 C4",
        ]));
    }

    #[test]
    fn test_absolute_properties() {
        let mut option_sets = vec![];
        for notes in [NoteCount::Fixed(2), NoteCount::Fixed(3), NoteCount::Range(2, 4), NoteCount::Range(1, 3)] {
            for window in [Window(1, 6), Window(3, 9), Window(1, 12), Window(0, 0)] {
                option_sets.push(c_major(notes, window));
                option_sets.push(VoicingOptions {
                    range: range("C3", "C5"),
                    voices: herrenchor(),
                    ..c_major(notes, window)
                });
            }
        }

        let mut total = 0;
        for opts in &option_sets {
            let (min, max) = opts.note_bounds().unwrap();
            let found = match absolute(opts) {
                Ok(found) => found,
                // More notes than voices
                Err(VoicingError::TooManyNotesForVoices { .. }) => continue,
                Err(err) => panic!("{}", err),
            };
            for voicing in &found {
                assert!(voicing.len() >= min && voicing.len() <= max);
                assert!(voicing.windows(2).all(|w| w[0] < w[1]));
                for pc in &opts.required_pitches {
                    assert!(voicing.iter().any(|p| p.chroma() == *pc));
                }
                if opts.voices.is_empty() {
                    let range = opts.range.unwrap();
                    assert!(voicing.iter().all(|p| range.contains(p)));
                } else {
                    assert!(!allocations(voicing, &opts.voices).is_empty());
                }
            }
            assert_eq!(absolute(opts).unwrap(), found);
            total += found.len();
        }
        assert!(total > 0);
    }

    #[test]
    fn test_absolute_top() {
        let opts = VoicingOptions {
            top_pitches: vec![pcs(&["C", "E"])],
            ..c_major(NoteCount::Fixed(3), Window(1, 6))
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&["G2 C3 E3", "E3 G3 C4"]));

        let opts = VoicingOptions {
            top_notes: vec!["G3".try_into().unwrap(), "C4".try_into().unwrap()],
            ..c_major(NoteCount::Fixed(3), Window(1, 6))
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&["C3 E3 G3", "E3 G3 C4"]));
    }

    #[test]
    fn test_bottom_distances() {
        let efg = |bottom_distances: Vec<Option<Window>>, default_distances: Window| VoicingOptions {
            range: range("E4", "F5"),
            notes: NoteCount::Fixed(3),
            required_pitches: pcs(&["E", "F", "G"]),
            default_distances,
            bottom_distances,
            ..Default::default()
        };
        let opts = efg(vec![], Window(1, 9));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["E4 F4 G4", "F4 G4 E5", "G4 E5 F5"]));

        let opts = efg(vec![Some(Window(1, 1))], Window(1, 9));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["E4 F4 G4"]));

        let opts = efg(vec![Some(Window(1, 2))], Window(3, 9));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["F4 G4 E5"]));

        let ceg = |bottom_distances: Vec<Option<Window>>, default_distances: Window| VoicingOptions {
            range: range("C4", "E5"),
            notes: NoteCount::Fixed(3),
            required_pitches: pcs(&["C", "E", "G"]),
            default_distances,
            bottom_distances,
            ..Default::default()
        };
        let opts = ceg(vec![], Window(3, 5));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["C4 E4 G4", "E4 G4 C5", "G4 C5 E5"]));

        let opts = ceg(vec![Some(Window(4, 5))], Window(3, 5));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["C4 E4 G4", "G4 C5 E5"]));

        let opts = ceg(vec![Some(Window(4, 5)), Some(Window(4, 4))], Window(1, 7));
        assert_eq!(absolute(&opts).unwrap(), voicings(&["G4 C5 E5"]));
    }

    #[test]
    fn test_top_distances() {
        let ceg = |top_distances: Vec<Window>| VoicingOptions {
            range: range("C4", "E5"),
            notes: NoteCount::Fixed(3),
            required_pitches: pcs(&["C", "E", "G"]),
            default_distances: Window(3, 5),
            top_distances,
            ..Default::default()
        };
        let opts = ceg(vec![Window(3, 4)]);
        assert_eq!(absolute(&opts).unwrap(), voicings(&["C4 E4 G4", "G4 C5 E5"]));

        let opts = ceg(vec![Window(3, 4), Window(3, 4)]);
        assert_eq!(absolute(&opts).unwrap(), voicings(&["C4 E4 G4"]));
    }

    #[test]
    fn test_low_interval_limits() {
        let opts = VoicingOptions {
            range: range("E2", "F4"),
            notes: NoteCount::Fixed(2),
            required_pitches: pcs(&["E", "F"]),
            ..Default::default()
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&["E3 F3", "E4 F4"]));

        let opts = VoicingOptions {
            range: range("Eb2", "F4"),
            notes: NoteCount::Fixed(2),
            required_pitches: pcs(&["Eb", "F"]),
            ..Default::default()
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&["Eb3 F3", "Eb4 F4"]));

        let opts = VoicingOptions {
            range: range("E2", "F4"),
            notes: NoteCount::Fixed(2),
            required_pitches: pcs(&["E", "F"]),
            ignore_lower_interval_limits: true,
            ..Default::default()
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&["E2 F2", "E3 F3", "E4 F4"]));
    }

    #[test]
    fn test_max_solutions() {
        let opts = VoicingOptions {
            max_solutions: Some(2),
            ..c_major(NoteCount::Fixed(3), Window(1, 12))
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&["G2 C3 E3", "G2 E3 G3"]));
    }

    #[test]
    fn test_configuration_errors() {
        let opts = VoicingOptions::default();
        assert!(matches!(absolute(&opts), Err(VoicingError::NoPitches)));

        let opts = VoicingOptions {
            range: None,
            ..c_major(NoteCount::Fixed(3), Window(1, 6))
        };
        assert!(matches!(absolute(&opts), Err(VoicingError::NoRange)));

        let opts = c_major(NoteCount::Range(3, 2), Window(1, 6));
        assert!(matches!(absolute(&opts), Err(VoicingError::MinNotesAboveMax { .. })));

        let opts = c_major(NoteCount::Fixed(0), Window(1, 6));
        assert!(matches!(absolute(&opts), Err(VoicingError::NoNotes)));

        let opts = VoicingOptions {
            voices: vec![Register(pitch("C3"), pitch("C4")), Register(pitch("C4"), pitch("C5"))],
            ..c_major(NoteCount::Fixed(3), Window(1, 6))
        };
        assert!(matches!(absolute(&opts), Err(VoicingError::TooManyNotesForVoices { notes: 3, voices: 2 })));
    }

    fn frauenchor() -> Vec<Register> {
        vec![
            Register(pitch("G3"), pitch("E5")),
            Register(pitch("A3"), pitch("F5")),
            Register(pitch("C4"), pitch("A5")),
        ]
    }

    fn herrenchor() -> Vec<Register> {
        vec![
            Register(pitch("E2"), pitch("E4")),
            Register(pitch("G2"), pitch("G4")),
            Register(pitch("C3"), pitch("A4")),
        ]
    }

    #[test]
    fn test_allocations() {
        let voices = frauenchor();
        assert_eq!(allocations(&[pitch("A3"), pitch("C4")], &voices), vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
        assert_eq!(allocations(&[pitch("A3"), pitch("G5")], &voices), vec![vec![0, 2], vec![1, 2]]);
        assert_eq!(allocations(&[pitch("A3"), pitch("B3")], &voices), vec![vec![0, 1]]);
        assert_eq!(allocations(&[pitch("C4"), pitch("E4"), pitch("G4")], &voices), vec![vec![0, 1, 2]]);
        assert!(allocations(&[pitch("F3")], &voices).is_empty());
    }

    #[test]
    fn test_voices() {
        let opts = VoicingOptions {
            voices: herrenchor(),
            notes: NoteCount::Fixed(3),
            required_pitches: pcs(&["C", "E", "G"]),
            default_distances: Window(1, 5),
            ..Default::default()
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&[
            "G2 C3 E3", "C3 E3 G3", "E3 G3 C4", "G3 C4 E4", "C4 E4 G4",
        ]));

        let opts = VoicingOptions {
            ignore_lower_interval_limits: true,
            ..opts
        };
        assert_eq!(absolute(&opts).unwrap(), voicings(&[
            "E2 G2 C3", "G2 C3 E3", "C3 E3 G3", "E3 G3 C4", "G3 C4 E4", "C4 E4 G4",
        ]));

        let opts = VoicingOptions {
            voices: frauenchor(),
            notes: NoteCount::Fixed(3),
            required_pitches: pcs(&["C", "E", "G"]),
            default_distances: Window(1, 5),
            ..Default::default()
        };
        let found = absolute(&opts).unwrap();
        assert_eq!(found.first(), voicings(&["G3 C4 E4"]).first());
        assert_eq!(found.last(), voicings(&["C5 E5 G5"]).first());
    }

    #[test]
    fn test_chord_voicings() {
        let opts = VoicingOptions {
            range: range("C1", "C4"),
            default_distances: Window(1, 7),
            ..Default::default()
        };
        let c7: Chord = "C7".try_into().unwrap();
        assert_eq!(chord_voicings(&c7, &opts).unwrap(), voicings(&[
            "G2 C3 E3 Bb3",
            "Bb2 E3 G3 Bb3",
            "Bb2 E3 G3 C4",
            "Bb2 E3 Bb3 C4",
            "C3 E3 G3 Bb3",
            "C3 E3 Bb3 C4",
            "E3 G3 Bb3 C4",
        ]));
    }

    #[test]
    fn test_chord_voicings_degrees() {
        let opts = VoicingOptions {
            range: range("C1", "C4"),
            bottom_degrees: vec![vec![1]],
            ..Default::default()
        };
        let c7: Chord = "C7".try_into().unwrap();
        assert_eq!(chord_voicings(&c7, &opts).unwrap(), voicings(&[
            "C3 E3 G3 Bb3",
            "C3 E3 Bb3 C4",
        ]));
    }
}
