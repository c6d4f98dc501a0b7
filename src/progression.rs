use std::{fmt, str::FromStr};
use rand::Rng;
use serde::{Deserialize, Deserializer};
use crate::core::{Chord, ChordParseError, Pitch};
use crate::voicing::{voice_chord, Hooks, Voicing, VoicingOptions};

const REST: &str = "r";

#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    // Progression sequence, one element
    // per chord symbol. "None"s are rests.
    pub sequence: Vec<Option<Chord>>,
}

impl Progression {
    pub fn new(sequence: Vec<Option<Chord>>) -> Progression {
        Progression { sequence }
    }

    /// The chords, without rests.
    pub fn chords(&self) -> Vec<&Chord> {
        self.sequence.iter().flatten().collect()
    }

    /// Voice each chord, leading from the voicing before it.
    /// Rests get an empty voicing and don't break the voice leading.
    pub fn voice<R: Rng>(&self, start: &[Pitch], options: &VoicingOptions, hooks: &Hooks, rng: &mut R) -> Vec<Voicing> {
        let mut previous: Voicing = start.to_vec();
        self.sequence.iter().map(|chord| match chord {
            None => vec![],
            Some(chord) => {
                let voicing = voice_chord(chord, &previous, options, hooks, rng);
                if !voicing.is_empty() {
                    previous = voicing.clone();
                }
                voicing
            }
        }).collect()
    }
}

/// Parse a progression from space-separated chord symbols,
/// e.g. "D-7 G7 C^7 r"
impl FromStr for Progression {
    type Err = ChordParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sequence = s.split_whitespace()
            .map(|symbol| if symbol == REST {
                Ok(None)
            } else {
                symbol.parse().map(Some)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Progression::new(sequence))
    }
}

impl TryFrom<&str> for Progression {
    type Error = ChordParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Self::from_str(s)?)
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<String> = self.sequence.iter()
            .map(|chord| match chord {
                Some(chord) => chord.to_string(),
                None => REST.to_string(),
            })
            .collect();
        write!(f, "{}", symbols.join(" "))
    }
}

/// Lets us write progressions as space-separated strings in yaml,
/// e.g. "D-7 G7 C^7" instead of "[D-7, G7, C^7]"
impl<'de> Deserialize<'de> for Progression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn pitches(names: &[&str]) -> Vec<Pitch> {
        names.iter().map(|n| (*n).try_into().unwrap()).collect()
    }

    #[test]
    fn test_parse_progression() {
        let prog: Progression = "D-7 G7 r C^7".try_into().unwrap();
        assert_eq!(prog.sequence.len(), 4);
        assert_eq!(prog.chords().len(), 3);
        assert!(prog.sequence[2].is_none());
        assert_eq!(prog.to_string(), "D-7 G7 r C^7");

        let res: Result<Progression, _> = "D-7 Q7".try_into();
        assert!(res.is_err());
    }

    #[test]
    fn test_deserialize_progression() {
        let prog: Progression = serde_yaml::from_str("\"C G r\"").unwrap();
        assert_eq!(prog.to_string(), "C G r");
    }

    #[test]
    fn test_voice_progression() {
        let prog: Progression = "C r G".try_into().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let opts = VoicingOptions::default();
        let voicings = prog.voice(&pitches(&["C4", "E4", "G4"]), &opts, &Hooks::default(), &mut rng);
        assert_eq!(voicings.len(), 3);
        assert_eq!(voicings[0], pitches(&["C4", "E4", "G4"]));
        assert!(voicings[1].is_empty());

        // The rest doesn't reset the voice leading
        assert_eq!(voicings[2], pitches(&["B3", "D4", "G4"]));
    }

    #[test]
    fn test_voice_leading_is_smooth() {
        let prog: Progression = "D-7 G7 C^7".try_into().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let opts = VoicingOptions::default();
        let voicings = prog.voice(&[], &opts, &Hooks::default(), &mut rng);
        assert_eq!(voicings.len(), 3);
        for (chord, voicing) in prog.chords().iter().zip(&voicings) {
            assert_eq!(voicing.len(), 3);
            let range = opts.range.unwrap();
            assert!(voicing.iter().all(|p| range.contains(p)));
            for p in voicing {
                assert!(chord.notes().contains(&p.chroma()));
            }
        }
    }
}
