mod pitch;
mod chord;
mod degree;
mod interval;

pub use pitch::{Pitch, PitchClass, Note, Register, PitchParseError, render_absolute};
pub use chord::{Chord, ChordParseError};
pub use degree::{Degree, DegreeParseError};
pub use interval::{Interval, IntervalParseError, Direction};
