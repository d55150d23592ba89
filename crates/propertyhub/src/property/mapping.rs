use std::collections::HashMap;
use std::sync::OnceLock;

static PROPERTY_TYPE_LABELS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Display label for a backend property type.
///
/// Known types are matched case-insensitively; anything else keeps its
/// original casing with the first character upper-cased.
pub(crate) fn humanize_property_type(raw: &str) -> String {
    match property_type_labels().get(raw.to_lowercase().as_str()) {
        Some(label) => (*label).to_string(),
        None => capitalize_first(raw),
    }
}

fn property_type_labels() -> &'static HashMap<&'static str, &'static str> {
    PROPERTY_TYPE_LABELS.get_or_init(|| {
        HashMap::from([
            ("house", "House"),
            ("apartment", "Apartment"),
            ("condo", "Condo"),
            ("townhouse", "Townhouse"),
            ("villa", "Villa"),
            ("land", "Land"),
            ("commercial", "Commercial"),
        ])
    })
}

fn capitalize_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
