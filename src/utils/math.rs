/// Rounds the exact decimal value of `value`, ties to even, at the given number of decimal places
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse::<f64>().unwrap_or(value)
}
