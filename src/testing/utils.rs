/// Arithmetic mean of a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Centered sums of squares and cross products `(Sxx, Syy, Sxy)` for equal-length slices.
pub fn centered_cross_products(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    (sxx, syy, sxy)
}
