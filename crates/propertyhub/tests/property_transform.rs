use propertyhub::property::{
    transform, transform_all, BackendProperty, FrontendProperty, TransformError,
    FALLBACK_IMAGE_URL,
};
use serde_json::{json, Value};

fn listing(id: &str, property_type: &str) -> Value {
    json!({
        "_id": id,
        "title": format!("Listing {id}"),
        "price": 1_249_999.5,
        "location": {
            "address": "1 Main St",
            "city": "Austin",
            "state": "TX",
            "zipCode": "73301",
            "coordinates": { "lat": 30.27, "lng": -97.74 }
        },
        "images": ["https://cdn.example.com/front.jpg"],
        "bedrooms": 4,
        "bathrooms": 3,
        "area": 2_450.75,
        "propertyType": property_type,
        "status": "active",
        "favorites": ["buyer-7"],
        "createdAt": "2025-09-01T00:00:00Z"
    })
}

#[test]
fn batch_preserves_order_and_length() {
    let records = vec![listing("a", "condo"), listing("b", "Villa")];

    let transformed = transform_all(&records, Some("buyer-7")).expect("batch transforms");

    assert_eq!(transformed.len(), 2);
    assert_eq!(transformed[0].id, "a");
    assert_eq!(transformed[0].property_type, "Condo");
    assert_eq!(transformed[1].id, "b");
    assert_eq!(transformed[1].property_type, "Villa");
    assert!(transformed.iter().all(|property| property.is_favorite));
}

#[test]
fn full_record_is_shaped_for_display() {
    let transformed = transform_all(&[listing("a", "yurt")], None).expect("transforms");

    assert_eq!(
        transformed,
        vec![FrontendProperty {
            id: "a".to_string(),
            title: "Listing a".to_string(),
            price: "$1,250,000".to_string(),
            location: "Austin, TX".to_string(),
            bedrooms: 4,
            bathrooms: 3,
            area: "2,450 sq ft".to_string(),
            image: "https://cdn.example.com/front.jpg".to_string(),
            is_favorite: false,
            property_type: "Yurt".to_string(),
        }]
    );
}

#[test]
fn transform_is_deterministic() {
    let record: BackendProperty =
        serde_json::from_value(listing("a", "land")).expect("typed record");

    assert_eq!(
        transform(&record, Some("buyer-7")),
        transform(&record, Some("buyer-7"))
    );
}

#[test]
fn empty_batch_is_empty() {
    assert!(transform_all(&[], None).expect("empty batch").is_empty());
}

#[test]
fn batch_error_names_the_failing_record() {
    let mut broken = listing("b", "house");
    broken.as_object_mut().expect("object").remove("location");

    let err = transform_all(&[listing("a", "house"), broken], None).expect_err("batch fails");
    assert_eq!(
        err.to_string(),
        "record 1 of batch could not be transformed: property b has no location with both city and state"
    );
    assert!(matches!(err, TransformError::Batch { index: 1, .. }));
}

#[test]
fn serializes_with_frontend_field_names() {
    let transformed = transform_all(&[listing("a", "house")], Some("nobody")).expect("transforms");
    let value = serde_json::to_value(&transformed[0]).expect("serializes");

    assert_eq!(value["isFavorite"], false);
    assert_eq!(value["type"], "House");
    assert_ne!(value["image"], FALLBACK_IMAGE_URL);
}
