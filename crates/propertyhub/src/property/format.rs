/// en-US currency with no minor units: `250000.0` -> `"$250,000"`.
///
/// Rounds half away from zero.
pub(crate) fn format_price(price: f64) -> String {
    let rounded = price.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.unsigned_abs()))
}

/// Grouped whole square feet: `1500.9` -> `"1,500 sq ft"`. Truncates toward zero.
pub(crate) fn format_area(area: f64) -> String {
    let whole = area.trunc() as i64;
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}{} sq ft", group_thousands(whole.unsigned_abs()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
