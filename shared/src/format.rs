use crate::metric::MetricMode;

const SI_SUFFIXES: [&str; 4] = ["", "k", "M", "G"];

/// One decimal place, never "-0.0".
pub fn format_rate(value: f64) -> String {
    let out = format!("{value:.1}");
    if out == "-0.0" { "0.0".to_string() } else { out }
}

/// Three significant digits with an SI suffix, trailing zeros trimmed
/// (120000 -> "120k", 1234567 -> "1.23M", 1500 -> "1.5k").
pub fn abbreviate_count(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let mut magnitude = value.abs();
    let mut suffix = 0;
    while magnitude >= 1_000.0 && suffix + 1 < SI_SUFFIXES.len() {
        magnitude /= 1_000.0;
        suffix += 1;
    }

    let mut digits = significant(magnitude);
    // 999.95k rounds up to 1000k; promote it to the next suffix.
    if digits.parse::<f64>().unwrap_or(0.0) >= 1_000.0 && suffix + 1 < SI_SUFFIXES.len() {
        magnitude /= 1_000.0;
        suffix += 1;
        digits = significant(magnitude);
    }
    format!("{sign}{digits}{}", SI_SUFFIXES[suffix])
}

fn significant(magnitude: f64) -> String {
    let int_digits = if magnitude < 1.0 {
        1
    } else {
        magnitude.log10().floor() as i32 + 1
    };
    let precision = (3 - int_digits).max(0) as usize;
    let text = format!("{magnitude:.precision$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Hover text for a country shape.
pub fn tooltip_text(name: &str, metric: f64, mode: MetricMode) -> String {
    match mode {
        MetricMode::Rate => format!("{name}: {}/1000 population", format_rate(metric)),
        MetricMode::Flow => format!("{name}: {}", abbreviate_count(metric)),
    }
}
