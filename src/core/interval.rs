use thiserror::Error;
use super::degree::Degree;
use serde::Deserialize;
use std::{fmt, str::FromStr};
use lazy_static::lazy_static;

const NAMES: [&str; 12] = [
    "P1",
    "m2",
    "M2",
    "m3",
    "M3",
    "P4",
    "d5",
    "P5",
    "m6",
    "M6",
    "m7",
    "M7",
];

lazy_static! {
    pub static ref MAJ_DEGS: Vec<Degree> = {
        let ds: [&str; 12] = [
            "1", "b2", "2", "b3", "3", "4",
            "b5", "5", "b6", "6", "b7", "7"];
        ds.iter().map(|d| (*d).try_into().unwrap()).collect()
    };
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Signed octave in this direction.
    pub fn octave(&self) -> Interval {
        match self {
            Direction::Up => Interval { semitones: 12 },
            Direction::Down => Interval { semitones: -12 },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
        };
        write!(f, "{}", name)
    }
}

/// A signed distance in semitones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Interval {
    pub semitones: isize
}

impl Interval {
    /// The interval's degree, counted from 1 and growing by 7 per octave,
    /// so m3 and M3 are both 3 and an octave is 8.
    /// Descending intervals get the degree of their size.
    pub fn to_degree(&self) -> Degree {
        let size = self.semitones.abs();
        let base = &MAJ_DEGS[(size % 12) as usize];
        Degree {
            degree: base.degree + 7 * (size / 12) as usize,
            adj: base.adj,
        }
    }

    /// Reduce to the smallest interval reaching the same pitch class.
    /// Without a direction the result lies in -5..=6,
    /// going up it lies in 0..=11 and going down in -11..=0.
    pub fn minimal(&self, direction: Option<Direction>) -> Interval {
        let rem = self.semitones.rem_euclid(12);
        let semitones = match direction {
            Some(Direction::Up) => rem,
            Some(Direction::Down) => if rem == 0 { 0 } else { rem - 12 },
            None => if rem > 6 { rem - 12 } else { rem },
        };
        Interval { semitones }
    }

    pub fn abs(&self) -> isize {
        self.semitones.abs()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.semitones.abs();
        let name = if size > 0 && size % 12 == 0 {
            "P8"
        } else {
            NAMES[(size % 12) as usize]
        };
        let sign = if self.semitones < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, name)
    }
}

/// Generate an interval from an integer.
impl From<isize> for Interval {
    fn from(i: isize) -> Self {
        Interval { semitones: i }
    }
}

#[derive(Error, Debug)]
pub enum IntervalParseError {
    #[error("Invalid interval `{0}`")]
    InvalidInterval(String),
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    /// Parses an interval, e.g. "M3", "P5", "d5".
    /// A leading "-" makes it descending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, name) = match s.strip_prefix('-') {
            Some(name) => (-1, name),
            None => (1, s),
        };
        let semitones = match name {
            "P1" | "d2" => 0,
            "m2" | "A1" => 1,
            "M2" | "d3" => 2,
            "m3" | "A2" => 3,
            "M3" | "d4" => 4,
            "P4" | "A3" => 5,
            "d5" | "A4" => 6,
            "P5" | "d6" => 7,
            "m6" | "A5" => 8,
            "M6" | "d7" => 9,
            "m7" | "A6" => 10,
            "M7" | "d8" => 11,
            "P8" | "A7" => 12,
            _ => return Err(IntervalParseError::InvalidInterval(s.to_string())),
        };
        Ok(Interval { semitones: sign * semitones })
    }
}

impl TryFrom<&str> for Interval {
    type Error = IntervalParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}
