//! Depth-first backtracking search.
//!
//! A search is driven by two functions: a collector, which returns
//! the candidates that may extend a path, and a validator, which decides
//! whether a path is a solution. Both see the solutions found so far.

pub mod collector;
pub mod validator;
mod combinatorics;

pub use collector::{collect, Stage, Filter};
pub use validator::{validate, combine, Check, Constraint};
pub use combinatorics::{permutations, permutations_by, binomial, urn};

/// Explore every path the collector allows, in collector order,
/// and return the paths the validator accepts.
///
/// The validator is checked on every visited path, including the empty
/// one and paths that are later extended. After each child subtree
/// the collector is asked again, so it can react to new solutions.
pub fn search<T, C, V>(collector: C, validator: V) -> Vec<Vec<T>>
where
    T: Clone,
    C: Fn(&[T], &[Vec<T>]) -> Vec<T>,
    V: Fn(&[T], &[Vec<T>]) -> bool,
{
    let mut solutions = vec![];
    descend(&collector, &validator, vec![], &mut solutions);
    solutions
}

fn descend<T, C, V>(collector: &C, validator: &V, path: Vec<T>, solutions: &mut Vec<Vec<T>>)
where
    T: Clone,
    C: Fn(&[T], &[Vec<T>]) -> Vec<T>,
    V: Fn(&[T], &[Vec<T>]) -> bool,
{
    let mut candidates = collector(&path, solutions);
    if validator(&path, solutions) {
        solutions.push(path.clone());
    }

    let mut i = 0;
    while i < candidates.len() {
        let mut next = path.clone();
        next.push(candidates[i].clone());
        descend(collector, validator, next, solutions);
        candidates = collector(&path, solutions);
        i += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_search_order() {
        // All strictly increasing paths over 0..3
        let solutions = search(
            |path: &[usize], _: &[Vec<usize>]| {
                let start = path.last().map_or(0, |last| last + 1);
                (start..3).collect()
            },
            |_: &[usize], _: &[Vec<usize>]| true);
        assert_eq!(solutions, vec![
            vec![],
            vec![0], vec![0, 1], vec![0, 1, 2], vec![0, 2],
            vec![1], vec![1, 2],
            vec![2],
        ]);
    }

    #[test]
    fn test_collector_sees_solutions() {
        // Stop as soon as two solutions exist
        let solutions = search(
            |path: &[usize], solutions: &[Vec<usize>]| {
                if solutions.len() >= 2 || path.len() >= 2 {
                    vec![]
                } else {
                    vec![0, 1, 2]
                }
            },
            |path: &[usize], _: &[Vec<usize>]| path.len() == 2);
        assert_eq!(solutions, vec![vec![0, 0], vec![0, 1]]);
    }

    #[test]
    fn test_no_candidates() {
        let solutions = search(
            |_: &[char], _: &[Vec<char>]| vec![],
            |path: &[char], _: &[Vec<char>]| !path.is_empty());
        assert!(solutions.is_empty());
    }
}
