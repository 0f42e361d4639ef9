//! Descriptive statistics over plain slices.

use crate::Real;

/// Arithmetic mean; zero for an empty slice.
pub fn mean(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Real>() / values.len() as Real
}

/// Population variance (divides by `n`); zero for an empty slice.
pub fn variance(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<Real>() / values.len() as Real
}

/// `steps` evenly spaced values over `[start, stop]`, endpoints included.
///
/// `steps == 1` yields `[start]`; `steps == 0` yields an empty vector.
pub fn linspace(start: Real, stop: Real, steps: usize) -> Vec<Real> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (steps - 1) as Real;
            (0..steps)
                .map(|i| {
                    if i == steps - 1 {
                        stop
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        }
    }
}
