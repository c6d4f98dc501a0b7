//! Picking which pitch classes of a chord to voice, and in which order.

use log::trace;
use lazy_static::lazy_static;
use crate::core::{Chord, Degree, Interval, PitchClass};
use crate::search::{binomial, permutations_by};
use super::options::{Hooks, VoicingOptions};

lazy_static! {
    /// Tensions tried over the root of a dominant chord.
    static ref DOMINANT_TENSIONS: Vec<Degree> = {
        let ds: [&str; 9] = ["b9", "9", "#9", "3", "11", "#11", "b13", "13", "7"];
        ds.iter().map(|d| (*d).try_into().unwrap()).collect()
    };
}

/// Chord tones in order of how much they define the chord's sound.
#[derive(Debug, Copy, Clone)]
enum GuideTone {
    Third,
    Seventh,
    FlatFifth,
    Sixth,
}

const GUIDE_TONES: [GuideTone; 4] = [
    GuideTone::Third,
    GuideTone::Seventh,
    GuideTone::FlatFifth,
    GuideTone::Sixth,
];

impl GuideTone {
    fn in_chord(&self, chord: &Chord) -> Option<PitchClass> {
        match self {
            GuideTone::Third => chord.tone_at(3),
            GuideTone::Seventh => chord.tone_at(7),
            GuideTone::FlatFifth => chord.tone_of(&Degree { degree: 5, adj: -1 }),
            GuideTone::Sixth => chord.tone_at(6),
        }
    }
}

fn without(notes: &[PitchClass], omit: &[PitchClass]) -> Vec<PitchClass> {
    notes.iter().filter(|n| !omit.contains(n)).cloned().collect()
}

/// The notes a voicing with `voices` voices can't do without.
///
/// Guide tones are taken in order, as many as there are voices
/// (at least two); a chord without a third needs its fourth.
/// From four voices on the chord's topmost tone is added too.
pub fn required_notes(chord: &Chord, voices: usize) -> Vec<PitchClass> {
    let mut required: Vec<PitchClass> = GUIDE_TONES.iter()
        .take(voices.max(2))
        .filter_map(|tone| tone.in_chord(chord))
        .collect();
    if !chord.has_degree(3) {
        if let Some(fourth) = chord.tone_at(4) {
            required.push(fourth);
        }
    }
    if voices > 3 {
        if let Some(top) = chord.notes().last() {
            if !required.contains(top) {
                required.push(*top);
            }
        }
    }
    required
}

/// Chord tones that aren't required.
pub fn optional_notes(chord: &Chord, voices: usize) -> Vec<PitchClass> {
    without(&chord.notes(), &required_notes(chord, voices))
}

/// Notes that can be added to the chord as tensions.
pub fn available_tensions(chord: &Chord) -> Vec<PitchClass> {
    let notes = chord.notes();
    if chord.is_dominant() {
        let fourth = Degree { degree: 4, adj: 0 };
        // Tensions a semitone above these would clash
        let avoid_above = [
            chord.tone_at(3),
            if chord.contains(&fourth) { chord.tone_of(&fourth) } else { None },
            chord.tone_at(7),
        ];
        DOMINANT_TENSIONS.iter()
            .map(|d| chord.root + Interval { semitones: d.to_interval() })
            .filter(|t| !notes.contains(t))
            .filter(|t| avoid_above.iter().flatten().all(|below| below.distance_to(t) > 1))
            .collect()
    } else {
        notes.iter()
            .take(4)
            .filter(|n| **n == chord.root || n.distance_to(&chord.root) > 2)
            .map(|n| *n + Interval { semitones: 2 })
            .filter(|t| t.distance_to(&chord.root) != 2)
            .collect()
    }
}

/// Every choice of pitch classes for a chord with `max_voices` voices,
/// required notes first.
///
/// Pinned top and bottom notes count as required. With a single voice
/// each required note is a choice of its own; with more voices than
/// required notes the rest is filled from the optional notes.
pub fn note_selections(chord: &Chord, max_voices: usize, top_notes: &[PitchClass], bottom_notes: &[PitchClass], omit: &[PitchClass]) -> Vec<Vec<PitchClass>> {
    let mut required = required_notes(chord, max_voices);
    let pinned: Vec<PitchClass> = top_notes.iter().chain(bottom_notes).cloned().collect();
    if !pinned.is_empty() {
        if max_voices == 1 {
            return vec![pinned];
        }
        required = pinned.into_iter().chain(required).collect();
    }
    let required = without(&required, omit);

    if max_voices == 1 {
        return required.into_iter().map(|n| vec![n]).collect();
    }
    if max_voices == required.len() {
        return vec![required];
    }
    if max_voices < required.len() {
        return binomial(&required, max_voices);
    }

    let fill = max_voices - required.len();
    let optional = without(&without(&chord.notes(), &required), omit);
    if fill >= optional.len() {
        return vec![required.into_iter().chain(optional).collect()];
    }
    binomial(&optional, fill).into_iter()
        .map(|extra| required.iter().cloned().chain(extra).collect())
        .collect()
}

/// Whether `next` may follow `path` in a pitch class voicing,
/// where `remaining` holds the notes left to place (including `next`).
///
/// Pinned top/bottom notes and degrees are checked at the outer
/// positions, steps between neighbours are measured upwards.
fn allows(options: &VoicingOptions, root: Option<PitchClass>, path: &[PitchClass], next: &PitchClass, remaining: &[PitchClass]) -> bool {
    let position = path.len();
    let is_top = remaining.len() == 1;
    let is_bottom = position == 0;

    if is_top && !options.top_notes.is_empty()
        && !options.top_notes.iter().any(|n| n.chroma() == *next) {
        return false;
    }
    if is_bottom && !options.bottom_notes.is_empty()
        && !options.bottom_notes.iter().any(|n| n.chroma() == *next) {
        return false;
    }

    if let Some(root) = root {
        let degree = (*next - root).to_degree().simple();
        let fits = |degrees: Option<&Vec<usize>>| degrees.map_or(true, |ds| {
            ds.iter().any(|d| Degree { degree: (*d).max(1), adj: 0 }.simple() == degree)
        });
        if is_top && !fits(options.top_degrees.last()) {
            return false;
        }
        if is_bottom && !fits(options.bottom_degrees.first()) {
            return false;
        }
    }

    let below = match path.last() {
        None => return true,
        Some(below) => below,
    };
    let step = below.distance_to(next);
    if step > options.max_distance {
        return false;
    }
    if !is_top && position != 1 && step < options.min_distance {
        return false;
    }
    if is_top && step < options.min_top_distance {
        return false;
    }
    if position == 1 && step < options.min_bottom_distance {
        return false;
    }
    true
}

/// Orderings of `selection` that make sensible voicings, bottom to top.
pub fn voice_permutations(selection: &[PitchClass], options: &VoicingOptions, root: Option<PitchClass>, hooks: &Hooks) -> Vec<Vec<PitchClass>> {
    if selection.len() == 1 {
        return vec![selection.to_vec()];
    }
    permutations_by(selection, |path: &[PitchClass], next: &PitchClass, remaining: &[PitchClass]| {
        hooks.permutation.map_or(true, |hook| hook(path, next, remaining))
            && allows(options, root, path, next, remaining)
    })
}

/// Voice permutations for every note selection of the chord.
pub fn all_voice_permutations(chord: &Chord, options: &VoicingOptions, hooks: &Hooks) -> Vec<Vec<PitchClass>> {
    let top: Vec<PitchClass> = options.top_notes.iter().map(|n| n.chroma()).collect();
    let bottom: Vec<PitchClass> = options.bottom_notes.iter().map(|n| n.chroma()).collect();
    let selections = note_selections(chord, options.max_voices, &top, &bottom, &options.omit_notes);
    let perms: Vec<Vec<PitchClass>> = selections.iter()
        .flat_map(|selection| voice_permutations(selection, options, Some(chord.root), hooks))
        .collect();
    trace!("{}: {} selections, {} permutations", chord, selections.len(), perms.len());
    perms
}

/// Required and optional pitch classes for an absolute voicing of a chord.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordPitches {
    pub required: Vec<PitchClass>,
    pub optional: Vec<PitchClass>,
}

/// Split the chord's tones for a voicing of up to `max_notes` notes.
pub fn pitches(chord: &Chord, max_notes: usize) -> ChordPitches {
    ChordPitches {
        required: required_notes(chord, max_notes),
        optional: optional_notes(chord, max_notes),
    }
}
