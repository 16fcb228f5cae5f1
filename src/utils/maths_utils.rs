use argminmax::ArgMinMax;

/// Largest value in a non-empty slice. NaNs are skipped by `argminmax`.
pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

/// Smallest value in a non-empty slice.
pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

pub fn get_min_max(vec: &[f64]) -> (f64, f64) {
    (get_min(vec), get_max(vec))
}

/// Arithmetic mean of a window. Plain summation, no compensation.
pub fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Population standard deviation (ddof = 0) of `window` about a mean the caller
/// already has, so the band maths reuses the moving-average value instead of
/// recomputing it.
pub fn population_std_dev_about(window: &[f64], mean: f64) -> f64 {
    let sum_sq: f64 = window.iter().map(|x| (x - mean) * (x - mean)).sum();
    (sum_sq / window.len() as f64).sqrt()
}
