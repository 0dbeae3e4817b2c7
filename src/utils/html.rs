//! Small text helpers shared by the SVG and HTML renderers.

/// Escape text for safe inclusion in HTML/SVG element content and
/// double-quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a score in [0, 1] as a percentage with two decimals (`0.9752` → `97.52%`).
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a score with three decimals (`0.9669` → `0.967`).
pub fn score(value: f64) -> String {
    format!("{value:.3}")
}
