/// The mean of a vector of f64
pub fn mean(xs: &[f64]) -> f64 {
    let n: f64 = xs.len() as f64;
    xs.iter().fold(0.0, |acc, x| x + acc) / n
}

/// Mean and population standard deviation in one pass over the mean
pub fn mean_std(xs: &[f64]) -> (f64, f64) {
    let n: f64 = xs.len() as f64;
    let m = mean(xs);
    let v = xs.iter().fold(0.0, |acc, x| (x - m).mul_add(x - m, acc));
    (m, (v / n).sqrt())
}

/// Sum of squared differences between paired elements of `xs` and `ys`.
///
/// Pairs past the end of the shorter slice are ignored.
pub fn sum_sq_diff(xs: &[f64], ys: &[f64]) -> f64 {
    xs.iter()
        .zip(ys.iter())
        .fold(0.0, |acc, (x, y)| (x - y).mul_add(x - y, acc))
}
