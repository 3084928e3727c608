/// Percentage change from `start_value` to `end_value`, `None` when the start is zero
pub fn calc_return_pct(start_value: f64, end_value: f64) -> Option<f64> {
    if start_value != 0.0 {
        return Some((end_value - start_value) / start_value * 100.0);
    }

    None
}
