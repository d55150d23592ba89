//! Adapts listings API records into the shape rendered by listing screens.

pub mod domain;
mod format;
mod mapping;
mod transform;

pub use domain::{BackendProperty, Coordinates, FrontendProperty, PropertyLocation};
pub use transform::{transform, transform_all, transform_value, TransformError, FALLBACK_IMAGE_URL};
