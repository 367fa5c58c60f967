/// Slope and intercept of an unweighted straight-line fit. `None` when
/// the inputs differ in length, are empty or all share one x value.
pub fn simple_linear_regression(x_data: &[f64], y_data: &[f64]) -> Option<(f64, f64)> {
    if x_data.len() != y_data.len() || x_data.is_empty() {
        return None;
    }

    let n = x_data.len() as f64;
    let sum_x: f64 = x_data.iter().sum();
    let sum_y: f64 = y_data.iter().sum();
    let sum_xy: f64 = x_data.iter().zip(y_data.iter()).map(|(x, y)| x * y).sum();
    let sum_x_squared: f64 = x_data.iter().map(|x| x.powi(2)).sum();

    let denominator = n * sum_x_squared - sum_x.powi(2);
    if denominator.abs() < f64::EPSILON * n * sum_x_squared.max(1.0) {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Some((slope, intercept))
}

/// Regression of `ln y` against `transform(x)`, for points with positive `y`.
pub fn log_regression<F: Fn(f64) -> f64>(
    x_data: &[f64],
    y_data: &[f64],
    transform: F,
) -> Option<(f64, f64)> {
    let (x, y): (Vec<f64>, Vec<f64>) = x_data
        .iter()
        .zip(y_data)
        .filter(|&(_, &y)| y > 0.0)
        .map(|(&x, &y)| (transform(x), y.ln()))
        .filter(|(x, _)| x.is_finite())
        .unzip();
    if x.len() < 2 {
        return None;
    }
    simple_linear_regression(&x, &y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line() {
        let (slope, intercept) =
            simple_linear_regression(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(simple_linear_regression(&[], &[]).is_none());
        assert!(simple_linear_regression(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert!(simple_linear_regression(&[1.0], &[2.0, 3.0]).is_none());
    }

    #[test]
    fn test_log_regression_of_power_law() {
        let x = [10.0, 20.0, 40.0];
        let y: Vec<f64> = x.iter().map(|x: &f64| 5.0 * x.powf(-3.0)).collect();
        let (slope, intercept) = log_regression(&x, &y, f64::ln).unwrap();
        assert!((slope + 3.0).abs() < 1e-9);
        assert!((intercept.exp() - 5.0).abs() < 1e-6);
    }
}
