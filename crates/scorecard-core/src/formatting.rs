/// Format a stroke count in points, e.g. `54p`, or `-` when absent.
///
/// # Examples
///
/// ```
/// use scorecard_core::formatting::format_points;
///
/// assert_eq!(format_points(Some(54)), "54p");
/// assert_eq!(format_points(None), "-");
/// ```
pub fn format_points(value: Option<u32>) -> String {
    match value {
        Some(v) => format!("{}p", v),
        None => "-".to_string(),
    }
}

/// Format a fractional stroke value in points with `decimals` places.
///
/// # Examples
///
/// ```
/// use scorecard_core::formatting::format_decimal_points;
///
/// assert_eq!(format_decimal_points(Some(55.333), 2), "55.33p");
/// assert_eq!(format_decimal_points(Some(-1.5), 2), "-1.50p");
/// assert_eq!(format_decimal_points(None, 2), "-");
/// ```
pub fn format_decimal_points(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.prec$}p", v, prec = decimals),
        None => "-".to_string(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use scorecard_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}
