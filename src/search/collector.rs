//! Candidate collectors.
//!
//! A collector is built from stages. Each stage receives the candidates
//! left by the stage before it, together with the current path and the
//! solutions so far, and returns a narrowed list.

/// A collector stage: `(candidates, path, solutions) -> candidates`.
pub type Stage<'a, T> = Box<dyn Fn(Vec<T>, &[T], &[Vec<T>]) -> Vec<T> + 'a>;

/// A per-candidate test: `(path, next) -> keep`.
pub type Filter<'a, T> = Box<dyn Fn(&[T], &T) -> bool + 'a>;

/// Build a collector that runs `items` through `stages` in order.
pub fn collect<'a, T: Clone + 'a>(items: Vec<T>, stages: Vec<Stage<'a, T>>) -> impl Fn(&[T], &[Vec<T>]) -> Vec<T> + 'a {
    move |path: &[T], solutions: &[Vec<T>]| {
        stages.iter().fold(items.clone(), |pool, stage| stage(pool, path, solutions))
    }
}

/// No candidates once the path holds `n` items.
/// Without `n` the limit is the size of the incoming pool.
pub fn max_items<'a, T: 'a>(n: Option<usize>) -> Stage<'a, T> {
    Box::new(move |pool: Vec<T>, path: &[T], _: &[Vec<T>]| {
        let n = n.unwrap_or(pool.len());
        if path.len() >= n {
            vec![]
        } else {
            pool
        }
    })
}

/// Drop candidates already in the path.
pub fn unique<'a, T: PartialEq + 'a>(active: bool) -> Stage<'a, T> {
    Box::new(move |pool: Vec<T>, path: &[T], _: &[Vec<T>]| {
        if !active {
            return pool;
        }
        pool.into_iter().filter(|item| !path.contains(item)).collect()
    })
}

/// No candidates once `n` solutions have been found.
pub fn max_solutions<'a, T: 'a>(n: Option<usize>) -> Stage<'a, T> {
    Box::new(move |pool: Vec<T>, _: &[T], solutions: &[Vec<T>]| {
        match n {
            Some(n) if solutions.len() >= n => vec![],
            _ => pool,
        }
    })
}

/// Keep candidates that pass every filter.
pub fn filter<'a, T: 'a>(filters: Vec<Filter<'a, T>>) -> Stage<'a, T> {
    Box::new(move |pool: Vec<T>, path: &[T], _: &[Vec<T>]| {
        pool.into_iter()
            .filter(|item| filters.iter().all(|f| f(path, item)))
            .collect()
    })
}

/// Per-candidate filters for use with [`filter`].
pub mod filters {
    /// Extend only paths shorter than `n`.
    pub fn max<T>(n: usize) -> impl Fn(&[T], &T) -> bool {
        move |path: &[T], _: &T| path.len() < n
    }

    /// Each item at most once per path.
    pub fn unique<T: PartialEq>() -> impl Fn(&[T], &T) -> bool {
        |path: &[T], next: &T| !path.contains(next)
    }

    /// No item directly repeated.
    pub fn no_repeat<T: PartialEq>() -> impl Fn(&[T], &T) -> bool {
        |path: &[T], next: &T| path.last() != Some(next)
    }
}
