//! Picking the next voicing of a progression.

use log::{debug, error, trace, warn};
use rand::Rng;
use crate::core::{render_absolute, Chord, Direction, Interval, Pitch, PitchClass, Register};
use super::error::VoicingError;
use super::leading::{voice_leading, VoiceLeading};
use super::options::{Hooks, VoicingOptions};
use super::selection::all_voice_permutations;
use super::{describe, Voicing};

/// Which way the next voicing should move so the outer voices of
/// `voicing` keep `borders` semitones away from the range edges.
///
/// No direction if both edges are too close.
pub fn desired_direction(voicing: &[Pitch], range: &Register, borders: (isize, isize)) -> Option<Direction> {
    let (first, last) = (voicing.first()?, voicing.last()?);
    let below = (*first - range.low()).semitones;
    let above = (range.high() - *last).semitones;
    if below < borders.0 && above < borders.1 {
        error!("{} doesn't fit into {} with borders {:?}", describe(voicing), range, borders);
        return None;
    }
    if below < borders.0 {
        Some(Direction::Up)
    } else if above < borders.1 {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Voicings the chord's permutations can be placed as,
/// analyzed against the previous voicing.
fn choices(permutations: &[Vec<PitchClass>], previous: &[Pitch], options: &VoicingOptions) -> Vec<VoiceLeading<Pitch>> {
    let range = options.range.unwrap_or_default();
    let mut remaining: Vec<&Vec<PitchClass>> = permutations.iter().collect();
    let mut choices = vec![];

    // Permutations ending on a pinned top pitch are placed downwards from it
    for top in options.top_notes.iter().filter_map(|n| n.pitch()) {
        let (matching, rest): (Vec<&Vec<PitchClass>>, Vec<&Vec<PitchClass>>) = remaining.into_iter()
            .partition(|p| p.last() == Some(&top.chroma()));
        for perm in matching {
            let reversed: Vec<PitchClass> = perm.iter().rev().cloned().collect();
            let mut voicing = render_absolute(&reversed, top, Direction::Down);
            voicing.reverse();
            choices.extend(voice_leading(&voicing, previous));
        }
        remaining = rest;
    }
    if remaining.is_empty() {
        return choices;
    }

    if previous.is_empty() {
        // Nothing to lead from: take the first permutation that fits
        let first_fit = remaining.iter().find_map(|perm| {
            let start = range.low().nearest(*perm.first()?, Direction::Up);
            let voicing = render_absolute(perm, start, Direction::Up);
            let fits = voicing.first().map_or(false, |p| range.contains(p))
                && voicing.last().map_or(false, |p| range.contains(p));
            if fits { Some(voicing) } else { None }
        });
        if let Some(voicing) = first_fit {
            choices.extend(voice_leading(&voicing, previous));
        }
        return choices;
    }

    let bottom = previous[0];
    for perm in remaining {
        let class = match perm.first() {
            Some(class) => *class,
            None => continue,
        };
        let step = class - bottom.chroma();
        let down = bottom + step.minimal(Some(Direction::Down));
        let up = bottom + step.minimal(Some(Direction::Up));
        let starts = if down == up { vec![down] } else { vec![down, up] };
        for start in starts {
            let voicing = render_absolute(perm, start, Direction::Up);
            let in_range = voicing.first().map_or(false, |p| range.contains(p))
                && voicing.last().map_or(false, |p| range.contains(p));
            if in_range {
                choices.extend(voice_leading(&voicing, previous));
            } else {
                trace!("{} is out of {}", describe(&voicing), range);
            }
        }
    }
    choices
}

/// Pick how to voice `chord` after `previous`, given as a chord symbol.
/// A rest ("" or "r") gives an empty voicing.
pub fn next_voicing<R: Rng>(symbol: &str, previous: &[Pitch], options: &VoicingOptions, hooks: &Hooks, rng: &mut R) -> Result<Voicing, VoicingError> {
    let symbol = symbol.trim();
    if symbol.is_empty() || symbol == "r" {
        return Ok(vec![]);
    }
    let chord: Chord = symbol.parse()?;
    Ok(voice_chord(&chord, previous, options, hooks, rng))
}

/// Pick how to voice `chord` after `previous`.
///
/// Choices are ranked by how little the voices move. When the previous
/// voicing came close to an edge of the range, the best choice moving
/// away from that edge is taken instead.
pub fn voice_chord<R: Rng>(chord: &Chord, previous: &[Pitch], options: &VoicingOptions, hooks: &Hooks, rng: &mut R) -> Voicing {
    let permutations = all_voice_permutations(chord, options, hooks);
    if permutations.is_empty() {
        warn!("{}: no voice permutations", chord);
        return vec![];
    }

    let all = choices(&permutations, previous, options);
    let total = all.len();
    let mut choices: Vec<VoiceLeading<Pitch>> = all.into_iter()
        .filter(|c| !(options.no_top_drop && c.top_dropped)
            && !(options.no_top_add && c.top_added)
            && !(options.no_bottom_drop && c.bottom_dropped)
            && !(options.no_bottom_add && c.bottom_added))
        .filter(|c| hooks.filter.map_or(true, |f| f(c)))
        .filter(|c| options.top_notes.is_empty() || c.targets.last()
            .map_or(false, |top| options.top_notes.iter().any(|n| n.chroma() == top.chroma())))
        .collect();
    let candidates = choices.len();
    choices.retain(|c| c.difference > 0 || candidates == 1 || rng.gen::<f64>() < options.idle_chance);

    match hooks.sort {
        Some(sort) => choices.sort_by(|a, b| sort(a, b)),
        None => choices.sort_by_key(|c| c.difference),
    }
    let best = match choices.first() {
        Some(best) => best,
        None => {
            warn!("{}: none of {} choices left after filtering", chord, total);
            return vec![];
        }
    };

    let range = options.range.unwrap_or_default();
    let direction = desired_direction(previous, &range, options.range_borders)
        .or(options.force_direction);
    let pick = match direction {
        None => best.targets.clone(),
        Some(direction) if options.force_best_pick => {
            // Kept in place only when the top already left the range
            let mut pick = best.targets.clone();
            let shift = pick.first().map_or(false, |p| !range.contains(p))
                || pick.last().map_or(false, |p| range.contains(p));
            if shift {
                let octave: Interval = direction.octave();
                pick = pick.into_iter().map(|p| p + octave).collect();
            }
            pick
        }
        Some(direction) => {
            let mut by_movement: Vec<&VoiceLeading<Pitch>> = choices.iter().collect();
            by_movement.sort_by_key(|c| c.movement.abs());
            let towards = by_movement.into_iter().find(|c| match direction {
                Direction::Up => c.movement >= 0,
                Direction::Down => c.movement <= 0,
            });
            match towards {
                Some(choice) => choice.targets.clone(),
                None => {
                    debug!("{}: nothing moves {}, keeping the closest choice", chord, direction);
                    best.targets.clone()
                }
            }
        }
    };
    debug!("{}: {} of {} choices, picked {}", chord, choices.len(), total, describe(&pick));
    pick
}
