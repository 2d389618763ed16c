/// `num` values from `start` to `stop` inclusive, equally spaced.
///
/// Values are computed as `start + i * step` and the last one is pinned to `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// `num` values from `start` to `stop` inclusive, equally spaced in log space.
///
/// When both endpoints are negative the progression is built over their
/// magnitudes and negated, so the sign is preserved and the sequence stays
/// monotonic. Returns `None` if either endpoint is zero or they differ in sign.
pub fn geomspace(start: f64, stop: f64, num: usize) -> Option<Vec<f64>> {
    if start == 0.0 || stop == 0.0 || start.signum() != stop.signum() {
        return None;
    }

    let sign = if start < 0.0 { -1.0 } else { 1.0 };
    let (start, stop) = (start / sign, stop / sign);

    let mut values: Vec<f64> = linspace(start.log10(), stop.log10(), num)
        .into_iter()
        .map(|exponent| 10f64.powf(exponent))
        .collect();

    if num > 0 {
        values[0] = start;
    }
    if num > 1 {
        values[num - 1] = stop;
    }

    Some(values.into_iter().map(|v| v * sign).collect())
}
