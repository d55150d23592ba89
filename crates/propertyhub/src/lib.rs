//! Client-side core of the marketplace app: the signed-in session, mirrored to
//! on-device storage, and the shaping of listings API records for display.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod property;
pub mod session;
pub mod storage;
pub mod telemetry;
