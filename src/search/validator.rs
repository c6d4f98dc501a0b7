//! Path validators and per-candidate constraints.

/// A solution test: `(path, solutions) -> accept`.
pub type Check<'a, T> = Box<dyn Fn(&[T], &[Vec<T>]) -> bool + 'a>;

/// A per-candidate test with the rest of the pool:
/// `(path, next, remaining) -> keep`.
/// `remaining` still includes `next`.
pub type Constraint<'a, T> = Box<dyn Fn(&[T], &T, &[T]) -> bool + 'a>;

/// Accept paths that pass every check, stopping at the first failure.
pub fn validate<'a, T: 'a>(checks: Vec<Check<'a, T>>) -> impl Fn(&[T], &[Vec<T>]) -> bool + 'a {
    move |path: &[T], solutions: &[Vec<T>]| checks.iter().all(|check| check(path, solutions))
}

/// Keep candidates that pass every constraint, stopping at the first failure.
pub fn combine<'a, T: 'a>(constraints: Vec<Constraint<'a, T>>) -> impl Fn(&[T], &T, &[T]) -> bool + 'a {
    move |path: &[T], next: &T, remaining: &[T]| {
        constraints.iter().all(|constraint| constraint(path, next, remaining))
    }
}

/// At least `n` items.
pub fn min<T>(n: usize) -> impl Fn(&[T], &[Vec<T>]) -> bool {
    move |path: &[T], _: &[Vec<T>]| path.len() >= n
}

/// Exactly `n` items.
pub fn sample<T>(n: usize) -> impl Fn(&[T], &[Vec<T>]) -> bool {
    move |path: &[T], _: &[Vec<T>]| path.len() == n
}

/// Unless `active`, reject paths that reorder an existing solution.
pub fn strict_order<T: Ord + Clone>(active: bool) -> impl Fn(&[T], &[Vec<T>]) -> bool {
    move |path: &[T], solutions: &[Vec<T>]| {
        if active {
            return true;
        }
        let mut sorted = path.to_vec();
        sorted.sort();
        !solutions.iter().any(|solution| {
            let mut other = solution.clone();
            other.sort();
            other == sorted
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        let checks: Vec<Check<i32>> = vec![Box::new(min(2)), Box::new(sample(3))];
        let validator = validate(checks);
        assert!(validator(&[1, 2, 3], &[]));
        assert!(!validator(&[1, 2], &[]));
        assert!(!validator(&[1, 2, 3, 4], &[]));
    }

    #[test]
    fn test_strict_order() {
        let validator = strict_order(false);
        assert!(validator(&[2, 1], &[vec![1, 3]]));
        assert!(!validator(&[2, 1], &[vec![1, 2]]));

        let validator = strict_order(true);
        assert!(validator(&[2, 1], &[vec![1, 2]]));
    }

    #[test]
    fn test_combine() {
        let constraints: Vec<Constraint<i32>> = vec![
            Box::new(|path: &[i32], _: &i32, _: &[i32]| path.len() < 2),
            Box::new(|_: &[i32], next: &i32, _: &[i32]| *next > 0),
        ];
        let constraint = combine(constraints);
        assert!(constraint(&[1], &2, &[2]));
        assert!(!constraint(&[1, 2], &3, &[3]));
        assert!(!constraint(&[], &-1, &[-1]));
    }
}
