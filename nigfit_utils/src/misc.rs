use std::cmp::Ordering;

/// Indices that would sort `xs` in ascending order.
///
/// NaN sorts after every other value. The sort is stable, so ties keep their
/// original order.
pub fn argsort(xs: &[f64]) -> Vec<usize> {
    let mut ixs: Vec<usize> = (0..xs.len()).collect();
    ixs.sort_by(|&a, &b| nan_last_cmp(xs[a], xs[b]));
    ixs
}

/// Sort a slice of floats in place, NaN last
pub fn sort_floats(xs: &mut [f64]) {
    xs.sort_by(|a, b| nan_last_cmp(*a, *b));
}

#[inline]
fn nan_last_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// The largest absolute value in `xs`. Zero for an empty slice.
#[inline]
pub fn inf_norm(xs: &[f64]) -> f64 {
    xs.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}
