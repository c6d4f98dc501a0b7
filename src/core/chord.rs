use regex::Regex;
use thiserror::Error;
use std::{fmt, str::FromStr};
use std::collections::HashMap;
use super::pitch::{PitchClass, PitchParseError};
use super::interval::Interval;
use super::degree::Degree;
use lazy_static::lazy_static;

/// Chord symbol suffixes and the degrees they stand for.
const QUALITIES: &[(&[&str], &str)] = &[
    (&["", "M", "maj", "^"], "1 3 5"),
    (&["-", "m", "min"], "1 b3 5"),
    (&["o", "dim"], "1 b3 b5"),
    (&["+", "aug"], "1 3 #5"),
    (&["sus", "sus4"], "1 4 5"),
    (&["sus2"], "1 2 5"),
    (&["5"], "1 5"),
    (&["6", "M6"], "1 3 5 6"),
    (&["69", "6/9", "M69"], "1 3 5 6 9"),
    (&["-6", "m6"], "1 b3 5 6"),
    (&["-69", "m69"], "1 b3 5 6 9"),
    (&["add9", "Madd9"], "1 3 5 9"),
    (&["7"], "1 3 5 b7"),
    (&["^7", "M7", "maj7", "Maj7"], "1 3 5 7"),
    (&["-7", "m7", "min7"], "1 b3 5 b7"),
    (&["-^7", "m^7", "mM7", "mMaj7"], "1 b3 5 7"),
    (&["h", "h7", "m7b5", "-7b5"], "1 b3 b5 b7"),
    (&["o7", "dim7"], "1 b3 b5 bb7"),
    (&["7sus", "7sus4"], "1 4 5 b7"),
    (&["7b5"], "1 3 b5 b7"),
    (&["7#5", "+7", "aug7"], "1 3 #5 b7"),
    (&["^7#5", "M7#5", "maj7#5"], "1 3 #5 7"),
    (&["^7#11", "M7#11", "maj7#11"], "1 3 5 7 #11"),
    (&["7b9"], "1 3 5 b7 b9"),
    (&["7#9"], "1 3 5 b7 #9"),
    (&["7#11"], "1 3 5 b7 #11"),
    (&["7b13"], "1 3 b7 b13"),
    (&["7b9b13"], "1 3 5 b7 b9 b13"),
    (&["7#9b13"], "1 3 5 b7 #9 b13"),
    (&["9"], "1 3 5 b7 9"),
    (&["^9", "M9", "maj9"], "1 3 5 7 9"),
    (&["-9", "m9"], "1 b3 5 b7 9"),
    (&["-^9", "mM9"], "1 b3 5 7 9"),
    (&["9b5"], "1 3 b5 b7 9"),
    (&["9#11"], "1 3 5 b7 9 #11"),
    (&["9sus", "9sus4"], "1 4 5 b7 9"),
    (&["11"], "1 5 b7 9 11"),
    (&["-11", "m11"], "1 b3 5 b7 9 11"),
    (&["13"], "1 3 5 b7 9 13"),
    (&["^13", "M13", "maj13"], "1 3 5 7 9 13"),
    (&["-13", "m13"], "1 b3 5 b7 9 13"),
    (&["13sus", "13sus4"], "1 4 5 b7 9 13"),
];

lazy_static! {
    static ref CHORD_RE: Regex = Regex::new(r"^([A-G][b#]?)(.*)$").unwrap();

    static ref QUALITY_DEGREES: HashMap<&'static str, Vec<Degree>> = {
        let mut map = HashMap::new();
        for (names, degrees) in QUALITIES.iter() {
            let degrees: Vec<Degree> = degrees.split(' ')
                .map(|d| d.try_into().unwrap())
                .collect();
            for name in names.iter() {
                map.insert(*name, degrees.clone());
            }
        }
        map
    };
}

#[derive(Error, Debug)]
pub enum ChordParseError {
    #[error("Invalid chord symbol `{0}`")]
    InvalidChordSymbol(String),

    #[error("Couldn't parse chord root")]
    InvalidRoot(#[from] PitchParseError),
}

/// A chord as a root and the degrees stacked on it,
/// in the order the chord symbol defines them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chord {
    pub root: PitchClass,
    quality: String,
    degrees: Vec<Degree>,
}

impl Chord {
    pub fn degrees(&self) -> &[Degree] {
        &self.degrees
    }

    /// The chord's pitch classes, root first.
    pub fn notes(&self) -> Vec<PitchClass> {
        self.degrees.iter()
            .map(|d| self.root + Interval { semitones: d.to_interval() })
            .collect()
    }

    /// The first degree on the given scale step, ignoring octaves
    /// and alterations, e.g. `find_degree(3)` finds "b3" or "3".
    pub fn find_degree(&self, step: usize) -> Option<&Degree> {
        let step = Degree { degree: step.max(1), adj: 0 }.simple();
        self.degrees.iter().find(|d| d.simple() == step)
    }

    pub fn has_degree(&self, step: usize) -> bool {
        self.find_degree(step).is_some()
    }

    /// The pitch class on the given scale step, if the chord has one.
    pub fn tone_at(&self, step: usize) -> Option<PitchClass> {
        self.find_degree(step)
            .map(|d| self.root + Interval { semitones: d.to_interval() })
    }

    /// Whether the chord has exactly this degree, e.g. "4" but not "11".
    pub fn contains(&self, degree: &Degree) -> bool {
        self.degrees.contains(degree)
    }

    /// The pitch class of the degree matching the given
    /// step and alteration, e.g. "b5".
    pub fn tone_of(&self, degree: &Degree) -> Option<PitchClass> {
        self.degrees.iter()
            .find(|d| d.same_step(degree))
            .map(|d| self.root + Interval { semitones: d.to_interval() })
    }

    /// Major third and minor seventh,
    /// or a suspended fourth and minor seventh.
    pub fn is_dominant(&self) -> bool {
        let b7 = Degree { degree: 7, adj: -1 };
        if !self.contains(&b7) {
            return false;
        }
        if self.has_degree(3) {
            self.contains(&Degree { degree: 3, adj: 0 })
        } else {
            self.contains(&Degree { degree: 4, adj: 0 })
        }
    }
}

/// Try to parse a chord from a symbol, e.g. "D-7", "Bb^7", "F#h7".
impl FromStr for Chord {
    type Err = ChordParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let caps = CHORD_RE.captures(s)
            .ok_or_else(|| ChordParseError::InvalidChordSymbol(s.to_string()))?;
        let root = caps.get(1)
            .ok_or_else(|| ChordParseError::InvalidChordSymbol(s.to_string()))?
            .as_str();
        let quality = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let degrees = QUALITY_DEGREES.get(quality)
            .ok_or_else(|| ChordParseError::InvalidChordSymbol(s.to_string()))?;
        Ok(Chord {
            root: root.parse()?,
            quality: quality.to_string(),
            degrees: degrees.clone(),
        })
    }
}

impl TryFrom<&str> for Chord {
    type Error = ChordParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}

impl TryFrom<String> for Chord {
    type Error = ChordParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self::from_str(&s)?)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)
    }
}
