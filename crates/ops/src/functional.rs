//! Higher-order list operators
//!
//! `map`, `zip_with` and `reduce` return functions so they can be specialised
//! once and applied many times.

use crate::operators;

/// Lift a unary function to slices.
pub fn map<F>(f: F) -> impl Fn(&[f64]) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    move |xs: &[f64]| xs.iter().map(|&x| f(x)).collect::<Vec<_>>()
}

/// Lift a binary function to pairs of slices.
///
/// Pairs are formed up to the length of the shorter slice.
pub fn zip_with<F>(f: F) -> impl Fn(&[f64], &[f64]) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    move |xs: &[f64], ys: &[f64]| xs.iter().zip(ys).map(|(&x, &y)| f(x, y)).collect::<Vec<_>>()
}

/// Fold a slice from the left, starting at `start`.
pub fn reduce<F>(f: F, start: f64) -> impl Fn(&[f64]) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    move |xs: &[f64]| xs.iter().fold(start, |acc, &x| f(acc, x))
}

pub fn neg_list(xs: &[f64]) -> Vec<f64> {
    map(operators::neg)(xs)
}

pub fn add_lists(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    zip_with(operators::add)(xs, ys)
}

/// Sum of a slice; `0` when empty.
pub fn sum(xs: &[f64]) -> f64 {
    reduce(operators::add, 0.0)(xs)
}

/// Product of a slice; `1` when empty.
pub fn prod(xs: &[f64]) -> f64 {
    reduce(operators::mul, 1.0)(xs)
}
