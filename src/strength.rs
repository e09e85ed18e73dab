//! Offline brute-force resistance estimate for a plaintext password.

use serde::Serialize;

/// Guess rate the estimate assumes: one billion hashes per second.
pub const GUESSES_PER_SECOND: f64 = 1_000_000_000.0;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3600.0;
const DAY: f64 = 86_400.0;
const YEAR: f64 = 31_536_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthReport {
    pub length: usize,
    pub charset_size: u32,
    /// `charset_size ^ length`, as a float since it overflows any integer quickly.
    pub combinations: f64,
    pub time_to_crack: String,
    pub strength: &'static str,
    /// 1 (very weak) to 6 (very strong).
    pub score: u8,
    pub has_lower: bool,
    pub has_upper: bool,
    pub has_digit: bool,
    pub has_symbol: bool,
}

pub fn analyze_strength(password: &str) -> StrengthReport {
    let length = password.chars().count();
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| c.is_ascii_punctuation());

    let charset_size = [(has_lower, 26), (has_upper, 26), (has_digit, 10), (has_symbol, 32)]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum::<u32>();

    let combinations = f64::from(charset_size).powi(length.min(i32::MAX as usize) as i32);
    let seconds = combinations / GUESSES_PER_SECOND;

    let (time_to_crack, strength, score) = if seconds < 1.0 {
        ("Instantly".to_string(), "Very Weak", 1)
    } else if seconds < MINUTE {
        (format!("{seconds:.2} seconds"), "Weak", 2)
    } else if seconds < HOUR {
        (format!("{:.2} minutes", seconds / MINUTE), "Moderate", 3)
    } else if seconds < DAY {
        (format!("{:.2} hours", seconds / HOUR), "Good", 4)
    } else if seconds < YEAR {
        (format!("{:.2} days", seconds / DAY), "Strong", 5)
    } else {
        let years = seconds / YEAR;
        let time = if years > 1_000_000.0 {
            format!("{} years", scientific(years))
        } else {
            format!("{years:.2} years")
        };
        (time, "Very Strong", 6)
    };

    StrengthReport {
        length,
        charset_size,
        combinations,
        time_to_crack,
        strength,
        score,
        has_lower,
        has_upper,
        has_digit,
        has_symbol,
    }
}

/// Two-decimal scientific notation with a signed, zero-padded exponent
/// (`1.23e+15`, `4.00e-03`).
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.2e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
            }
            Err(_) => formatted,
        },
        None => formatted,
    }
}
