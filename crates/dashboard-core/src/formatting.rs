use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a fraction in `[0, 1]` as a percentage string.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_percent;
///
/// assert_eq!(format_percent(0.125, 1), "12.5%");
/// assert_eq!(format_percent(0.0, 1), "0.0%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
pub fn format_percent(rate: f64, decimals: usize) -> String {
    let pct = if rate.is_finite() { rate * 100.0 } else { 0.0 };
    format!("{:.prec$}%", pct, prec = decimals)
}

/// Shorten a label that is `limit` display columns or wider.
///
/// Labels narrower than `limit` are returned unchanged; longer ones keep
/// their first `limit - 3` columns followed by `"..."`.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::truncate_label;
///
/// assert_eq!(truncate_label("THEFT", 15), "THEFT");
/// assert_eq!(truncate_label("CRIMINAL DAMAGE", 15), "CRIMINAL DAM...");
/// ```
pub fn truncate_label(label: &str, limit: usize) -> String {
    if label.width() < limit {
        return label.to_string();
    }

    let budget = limit.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
