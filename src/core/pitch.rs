use super::interval::{Direction, Interval};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use std::{fmt, str::FromStr};
use std::ops::{Add, Sub};
use lazy_static::lazy_static;

const NAMES: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

/// Semitones above C for each letter name.
const LETTERS: [(char, isize); 7] = [
    ('C', 0), ('D', 2), ('E', 4), ('F', 5), ('G', 7), ('A', 9), ('B', 11)];

lazy_static! {
    static ref NOTE_RE: Regex = Regex::new(r"^([A-Ga-g])([b#]*)(-?\d+)?$").unwrap();
}

#[derive(Error, Debug)]
pub enum PitchParseError {
    #[error("Invalid note name `{0}`")]
    InvalidName(String),

    #[error("Missing octave in `{0}`")]
    MissingOctave(String),

    #[error("Couldn't parse octave")]
    ParseIntError(#[from] std::num::ParseIntError),
}

/// Split a note name into semitones above C and an optional octave,
/// e.g. "Bb2" -> (10, Some(2)), "F#" -> (6, None).
fn parse_name(s: &str) -> Result<(isize, Option<isize>), PitchParseError> {
    let caps = NOTE_RE.captures(s.trim())
        .ok_or_else(|| PitchParseError::InvalidName(s.to_string()))?;
    let letter = caps.get(1)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| PitchParseError::InvalidName(s.to_string()))?;
    let base = LETTERS.iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, semis)| *semis)
        .ok_or_else(|| PitchParseError::InvalidName(s.to_string()))?;
    let accidentals = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let adj = accidentals.matches('#').count() as isize - accidentals.matches('b').count() as isize;
    let octave = match caps.get(3) {
        Some(m) => Some(m.as_str().parse::<isize>()?),
        None => None,
    };
    Ok((base + adj, octave))
}

/// A pitch without register, 0 = C.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct PitchClass {
    chroma: isize,
}

impl PitchClass {
    pub fn new(chroma: isize) -> PitchClass {
        PitchClass { chroma: chroma.rem_euclid(12) }
    }

    pub fn chroma(&self) -> isize {
        self.chroma
    }

    /// Ascending semitones from this pitch class up to `other`, in 0..=11.
    pub fn distance_to(&self, other: &PitchClass) -> isize {
        (other.chroma - self.chroma).rem_euclid(12)
    }
}

impl FromStr for PitchClass {
    type Err = PitchParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (semis, _) = parse_name(s)?;
        Ok(PitchClass::new(semis))
    }
}

impl TryFrom<&str> for PitchClass {
    type Error = PitchParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}

impl TryFrom<String> for PitchClass {
    type Error = PitchParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self::from_str(&s)?)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", NAMES[self.chroma as usize])
    }
}

/// Add an interval to this pitch class.
impl Add<Interval> for PitchClass {
    type Output = Self;

    fn add(self, intv: Interval) -> Self {
        PitchClass::new(self.chroma + intv.semitones)
    }
}

/// The ascending interval from `other` up to this pitch class.
impl Sub for PitchClass {
    type Output = Interval;

    fn sub(self, other: Self) -> Interval {
        Interval { semitones: other.distance_to(&self) }
    }
}


/// An absolute pitch, ranked as MIDI note numbers:
/// 60 = "C4", 0 = "C-1".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Pitch {
    pub semitones: isize,
}

impl Pitch {
    pub fn new(class: PitchClass, octave: isize) -> Pitch {
        Pitch { semitones: (octave + 1) * 12 + class.chroma }
    }

    pub fn chroma(&self) -> PitchClass {
        PitchClass::new(self.semitones)
    }

    pub fn octave(&self) -> isize {
        self.semitones.div_euclid(12) - 1
    }

    /// The closest pitch of the given class at or above
    /// (or at or below) this one.
    pub fn nearest(&self, class: PitchClass, direction: Direction) -> Pitch {
        let intv = (class - self.chroma()).minimal(Some(direction));
        *self + intv
    }
}

/// Try to parse a pitch from a string, e.g. "C4", "Bb2".
impl FromStr for Pitch {
    type Err = PitchParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_name(s)? {
            (semis, Some(octave)) => Ok(Pitch { semitones: (octave + 1) * 12 + semis }),
            (_, None) => Err(PitchParseError::MissingOctave(s.to_string())),
        }
    }
}

impl TryFrom<&str> for Pitch {
    type Error = PitchParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}

impl TryFrom<String> for Pitch {
    type Error = PitchParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self::from_str(&s)?)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chroma(), self.octave())
    }
}

/// Add an interval to this pitch.
impl Add<Interval> for Pitch {
    type Output = Self;

    fn add(self, intv: Interval) -> Self {
        Self {
            semitones: self.semitones + intv.semitones
        }
    }
}

/// The signed interval from `other` to this pitch.
impl Sub for Pitch {
    type Output = Interval;

    fn sub(self, other: Self) -> Interval {
        Interval { semitones: self.semitones - other.semitones }
    }
}


/// A note given either with or without register,
/// e.g. "G" or "G4".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Note {
    Class(PitchClass),
    Pitch(Pitch),
}

impl Note {
    pub fn chroma(&self) -> PitchClass {
        match self {
            Note::Class(pc) => *pc,
            Note::Pitch(p) => p.chroma(),
        }
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self {
            Note::Class(_) => None,
            Note::Pitch(p) => Some(*p),
        }
    }

    /// Pitches must match exactly, pitch classes by chroma.
    pub fn matches(&self, pitch: &Pitch) -> bool {
        match self {
            Note::Class(pc) => *pc == pitch.chroma(),
            Note::Pitch(p) => p == pitch,
        }
    }
}

impl FromStr for Note {
    type Err = PitchParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_name(s)? {
            (semis, Some(octave)) => Ok(Note::Pitch(Pitch { semitones: (octave + 1) * 12 + semis })),
            (semis, None) => Ok(Note::Class(PitchClass::new(semis))),
        }
    }
}

impl TryFrom<&str> for Note {
    type Error = PitchParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}

impl TryFrom<String> for Note {
    type Error = PitchParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self::from_str(&s)?)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Class(pc) => write!(f, "{}", pc),
            Note::Pitch(p) => write!(f, "{}", p),
        }
    }
}


/// An inclusive pitch range, e.g. an instrument's or a voice's register.
/// Written as `[low, high]` in config files.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub struct Register(pub Pitch, pub Pitch);

impl Register {
    pub fn low(&self) -> Pitch {
        self.0
    }

    pub fn high(&self) -> Pitch {
        self.1
    }

    pub fn contains(&self, pitch: &Pitch) -> bool {
        *pitch >= self.0 && *pitch <= self.1
    }

    /// Every pitch in the register, ascending.
    pub fn pitches(&self) -> impl Iterator<Item=Pitch> {
        (self.0.semitones..=self.1.semitones).map(|semitones| Pitch { semitones })
    }
}

/// C3 to C5
impl Default for Register {
    fn default() -> Self {
        Register(Pitch { semitones: 48 }, Pitch { semitones: 72 })
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Place pitch classes in register, starting with the first class
/// in the octave of `start` and moving each following note the
/// smallest step in `direction` (a repeated class moves an octave).
pub fn render_absolute(classes: &[PitchClass], start: Pitch, direction: Direction) -> Vec<Pitch> {
    let mut pitches: Vec<Pitch> = Vec::with_capacity(classes.len());
    for class in classes {
        let next = match pitches.last() {
            None => Pitch::new(*class, start.octave()),
            Some(prev) => {
                let mut intv = (*class - prev.chroma()).minimal(Some(direction));
                if intv.semitones == 0 {
                    intv = direction.octave();
                }
                *prev + intv
            }
        };
        pitches.push(next);
    }
    pitches
}
