use regex::Regex;
use thiserror::Error;
use std::{fmt, str::FromStr};
use lazy_static::lazy_static;

/// Semitones above the root for each step of the major scale.
pub const MAJOR: [usize; 7] = [0, 2, 4, 5, 7, 9, 11];

lazy_static! {
    static ref EXT_RE: Regex = Regex::new(r"^([b#]*)(\d+)$").unwrap();
}

#[derive(Error, Debug)]
pub enum DegreeParseError {
    #[error("Invalid degree `{0}`")]
    InvalidDegree(String),

    #[error("Couldn't parse degree")]
    ParseIntError(#[from] std::num::ParseIntError),
}

/// A chord degree relative to the major scale,
/// e.g. "b7" is `Degree { degree: 7, adj: -1 }`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Degree {
    pub degree: usize,
    pub adj: isize
}

impl Degree {
    /// Semitones above the root.
    pub fn to_interval(&self) -> isize {
        // Convert from 1-indexed to 0-indexed degrees
        let degree_0 = self.degree - 1;
        let octaves = (degree_0/7 * 12) as isize;
        MAJOR[degree_0 % 7] as isize + octaves + self.adj
    }

    /// The degree folded into the first octave, e.g. 9 -> 2.
    pub fn simple(&self) -> usize {
        (self.degree - 1) % 7 + 1
    }

    /// Same scale step and alteration, ignoring octaves.
    pub fn same_step(&self, other: &Degree) -> bool {
        self.simple() == other.simple() && self.adj == other.adj
    }
}

impl FromStr for Degree {
    type Err = DegreeParseError;

    /// Parses a chord extension, e.g. "7", "b7", "#9", "bb7"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = EXT_RE.captures(s).ok_or(DegreeParseError::InvalidDegree(s.to_string()))?;
        let adjustments = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let degree = caps.get(2)
            .ok_or(DegreeParseError::InvalidDegree("(none)".to_string()))?
            .as_str().parse::<usize>()?;
        if degree == 0 {
            return Err(DegreeParseError::InvalidDegree(s.to_string()));
        }
        let adj = adjustments.matches('#').count() as isize - adjustments.matches('b').count() as isize;
        Ok(Degree { degree, adj })
    }
}

impl TryFrom<&str> for Degree {
    type Error = DegreeParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = "".to_string();
        let count = self.adj.unsigned_abs();
        if self.adj < 0 {
            s.push_str(&"b".repeat(count));
        } else if self.adj > 0 {
            s.push_str(&"#".repeat(count));
        }
        write!(f, "{}{}", s, self.degree)
    }
}
