use serde::Deserialize;
use serde_json::Value;

use super::domain::{BackendProperty, FrontendProperty};
use super::format::{format_area, format_price};
use super::mapping::humanize_property_type;

/// Image shown for listings that were published without photos.
pub const FALLBACK_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=No+Image";

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("property record is absent or not an object")]
    NotARecord,
    #[error("property record has no `_id`")]
    MissingId,
    #[error("property {id} has no location with both city and state")]
    MissingLocation { id: String },
    #[error("property {id} is malformed: {source}")]
    Malformed {
        id: String,
        source: serde_json::Error,
    },
    #[error("record {index} of batch could not be transformed: {source}")]
    Batch {
        index: usize,
        source: Box<TransformError>,
    },
}

/// Shapes a typed backend record for display. `viewer_id` drives `is_favorite`.
pub fn transform(record: &BackendProperty, viewer_id: Option<&str>) -> FrontendProperty {
    FrontendProperty {
        id: record.id.clone(),
        title: record.title.clone(),
        price: format_price(record.price),
        location: format!("{}, {}", record.location.city, record.location.state),
        bedrooms: record.bedrooms,
        bathrooms: record.bathrooms,
        area: format_area(record.area),
        image: primary_image(record).to_string(),
        is_favorite: is_favorite(record, viewer_id),
        property_type: humanize_property_type(&record.property_type),
    }
}

/// Validates and transforms a raw API record.
pub fn transform_value(
    value: &Value,
    viewer_id: Option<&str>,
) -> Result<FrontendProperty, TransformError> {
    let object = value.as_object().ok_or(TransformError::NotARecord)?;

    let id = match object.get("_id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => return Err(TransformError::MissingId),
    };

    let has_location = object
        .get("location")
        .and_then(Value::as_object)
        .is_some_and(|location| {
            location.get("city").is_some_and(Value::is_string)
                && location.get("state").is_some_and(Value::is_string)
        });
    if !has_location {
        return Err(TransformError::MissingLocation { id: id.clone() });
    }

    let record = BackendProperty::deserialize(value).map_err(|source| TransformError::Malformed {
        id: id.clone(),
        source,
    })?;

    Ok(transform(&record, viewer_id))
}

/// Transforms every record in order. The first failing record aborts the batch.
pub fn transform_all(
    records: &[Value],
    viewer_id: Option<&str>,
) -> Result<Vec<FrontendProperty>, TransformError> {
    records
        .iter()
        .enumerate()
        .map(|(index, value)| {
            transform_value(value, viewer_id).map_err(|err| TransformError::Batch {
                index,
                source: Box::new(err),
            })
        })
        .collect()
}

fn primary_image(record: &BackendProperty) -> &str {
    record
        .images
        .as_deref()
        .and_then(|images| images.first())
        .map(String::as_str)
        .unwrap_or(FALLBACK_IMAGE_URL)
}

fn is_favorite(record: &BackendProperty, viewer_id: Option<&str>) -> bool {
    match (viewer_id, record.favorites.as_deref()) {
        (Some(viewer), Some(favorites)) if !viewer.is_empty() => {
            favorites.iter().any(|id| id == viewer)
        }
        _ => false,
    }
}
