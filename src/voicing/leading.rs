//! Describing the movement from one voicing to the next.

use std::fmt;
use crate::core::{Interval, Pitch, PitchClass};
use crate::search::binomial;
use super::describe;

/// Something voices can sit on: a pitch class or an absolute pitch.
pub trait Tone: Copy + PartialEq + fmt::Display {
    /// How far a voice moves from this tone to `other`.
    fn interval_to(&self, other: &Self) -> Interval;
}

/// Pitch classes move the shortest way, within a tritone.
impl Tone for PitchClass {
    fn interval_to(&self, other: &Self) -> Interval {
        (*other - *self).minimal(None)
    }
}

impl Tone for Pitch {
    fn interval_to(&self, other: &Self) -> Interval {
        *other - *self
    }
}

/// Pairwise movement of the voices of `a` to those of `b`.
pub fn voicing_intervals<T: Tone>(a: &[T], b: &[T]) -> Vec<Interval> {
    a.iter().zip(b).map(|(from, to)| from.interval_to(to)).collect()
}

/// A transition between two voicings.
///
/// `origin` and `targets` are the full voicings; when they have
/// different sizes, `from` and `to` are the equally sized parts
/// that are actually compared.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceLeading<T> {
    pub from: Vec<T>,
    pub to: Vec<T>,
    pub origin: Vec<T>,
    pub targets: Vec<T>,
    pub intervals: Vec<Interval>,
    pub degrees: Vec<usize>,

    /// Total distance moved by all voices.
    pub difference: isize,

    /// Signed sum of all voice movements.
    pub movement: isize,

    pub similar: bool,
    pub contrary: bool,
    pub parallel: bool,

    /// Tones held by both voicings.
    pub oblique: Vec<T>,

    pub added: Vec<T>,
    pub dropped: Vec<T>,
    pub top_dropped: bool,
    pub top_added: bool,
    pub bottom_dropped: bool,
    pub bottom_added: bool,
}

impl<T: Tone> VoiceLeading<T> {
    /// The record of moving from nothing.
    fn from_nothing(to: &[T], targets: &[T], origin: &[T]) -> VoiceLeading<T> {
        VoiceLeading {
            from: vec![],
            to: to.to_vec(),
            origin: origin.to_vec(),
            targets: targets.to_vec(),
            intervals: vec![],
            degrees: vec![],
            difference: 0,
            movement: 0,
            similar: false,
            contrary: false,
            parallel: false,
            oblique: vec![],
            added: vec![],
            dropped: vec![],
            top_dropped: false,
            top_added: false,
            bottom_dropped: false,
            bottom_added: false,
        }
    }
}

impl<T: Tone> fmt::Display for VoiceLeading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (difference {}, movement {})",
            describe(&self.origin), describe(&self.targets),
            self.difference, self.movement)
    }
}

/// Analyze moving the voices of `from` to `to`, which were picked
/// from the full voicings `origin` and `targets`.
pub fn analyze_voice_leading<T: Tone>(to: &[T], from: &[T], targets: &[T], origin: &[T]) -> VoiceLeading<T> {
    if from.is_empty() {
        return VoiceLeading::from_nothing(to, targets, origin);
    }
    let intervals = voicing_intervals(from, to);
    let degrees: Vec<usize> = intervals.iter().map(|i| i.to_degree().degree).collect();
    let difference = intervals.iter().map(|i| i.abs()).sum::<isize>();
    let movement = intervals.iter().map(|i| i.semitones).sum::<isize>();
    let similar = movement.abs() == difference;
    let parallel = difference > 0 && similar
        && degrees.iter().all(|d| *d == degrees[0]);
    let oblique = from.iter().filter(|t| to.contains(t)).cloned().collect();

    let mut added = vec![];
    let mut dropped = vec![];
    if origin.len() < targets.len() {
        added = targets.iter().filter(|t| !to.contains(t)).cloned().collect();
    } else {
        dropped = origin.iter().filter(|t| !from.contains(t)).cloned().collect();
    }

    let top_dropped = origin.last().map_or(false, |t| dropped.contains(t));
    let top_added = targets.last().map_or(false, |t| added.contains(t));
    let bottom_dropped = origin.first().map_or(false, |t| dropped.contains(t));
    let bottom_added = targets.first().map_or(false, |t| added.contains(t));

    VoiceLeading {
        from: from.to_vec(),
        to: to.to_vec(),
        origin: origin.to_vec(),
        targets: targets.to_vec(),
        intervals,
        degrees,
        difference,
        movement,
        similar,
        contrary: !similar,
        parallel,
        oblique,
        added,
        dropped,
        top_dropped,
        top_added,
        bottom_dropped,
        bottom_added,
    }
}

/// Analyze moving `from` to `to` as whole voicings.
pub fn analyze<T: Tone>(to: &[T], from: &[T]) -> VoiceLeading<T> {
    analyze_voice_leading(to, from, to, from)
}

/// Every way of leading `origin` to `targets`.
///
/// Voicings of the same size give a single record. Otherwise each
/// combination of the larger voicing's tones, as many as the smaller
/// one has, is compared with the smaller voicing.
pub fn voice_leading<T: Tone>(targets: &[T], origin: &[T]) -> Vec<VoiceLeading<T>> {
    if origin.is_empty() || origin.len() == targets.len() {
        return vec![analyze_voice_leading(targets, origin, targets, origin)];
    }
    if origin.len() > targets.len() {
        binomial(origin, targets.len()).iter()
            .map(|from| analyze_voice_leading(targets, from, targets, origin))
            .collect()
    } else {
        binomial(targets, origin.len()).iter()
            .map(|to| analyze_voice_leading(to, origin, targets, origin))
            .collect()
    }
}
