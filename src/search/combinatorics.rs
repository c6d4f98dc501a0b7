use super::search;
use super::collector::{self, collect, filters, Filter, Stage};
use super::validator::{self, validate, Check};

/// All orderings of `items`, in recursive-descent order.
pub fn permutations<T: Clone + PartialEq>(items: &[T]) -> Vec<Vec<T>> {
    let n = items.len();
    let fs: Vec<Filter<T>> = vec![
        Box::new(filters::max(n)),
        Box::new(filters::unique()),
    ];
    let checks: Vec<Check<T>> = vec![Box::new(validator::min(n))];
    search(
        collect(items.to_vec(), vec![collector::filter(fs)]),
        validate(checks))
}

/// All orderings of `items` where every step passes `constraint`.
///
/// The constraint gets the path so far, the candidate and the items
/// not yet used (candidate included). Items are told apart by value.
pub fn permutations_by<T, F>(items: &[T], constraint: F) -> Vec<Vec<T>>
where
    T: Clone + PartialEq,
    F: Fn(&[T], &T, &[T]) -> bool,
{
    let remaining = |path: &[T]| -> Vec<T> {
        items.iter().filter(|item| !path.contains(item)).cloned().collect()
    };
    search(
        |path: &[T], _: &[Vec<T>]| {
            let rest = remaining(path);
            rest.iter()
                .filter(|next| constraint(path, *next, &rest))
                .cloned()
                .collect()
        },
        |path: &[T], _: &[Vec<T>]| !path.is_empty() && remaining(path).is_empty())
}

/// Every `k`-sized subset of `items`, keeping their relative order.
/// Each subset takes an item, then completes itself only from
/// the items after it.
pub fn binomial<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k == 0 || k > n {
        return vec![];
    }
    let picks = search(
        |path: &[usize], _: &[Vec<usize>]| {
            if path.len() >= k {
                return vec![];
            }
            let start = path.last().map_or(0, |last| last + 1);
            // Leave enough items for the remaining slots
            let end = n + 1 - (k - path.len());
            (start..end).collect()
        },
        |path: &[usize], _: &[Vec<usize>]| path.len() == k);
    picks.into_iter()
        .map(|pick| pick.into_iter().map(|i| items[i].clone()).collect())
        .collect()
}

/// Draw `number` items without putting them back.
/// Unless `strict_order`, a reordering of an earlier draw is skipped.
pub fn urn<T: Clone + Ord>(items: &[T], number: usize, strict_order: bool, max_solutions: Option<usize>) -> Vec<Vec<T>> {
    let stages: Vec<Stage<T>> = vec![
        collector::max_solutions(max_solutions),
        collector::max_items(Some(number)),
        collector::unique(true),
    ];
    let checks: Vec<Check<T>> = vec![
        Box::new(validator::sample(number)),
        Box::new(validator::strict_order(strict_order)),
    ];
    search(collect(items.to_vec(), stages), validate(checks))
}
