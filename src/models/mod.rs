//! This module contains the data models for the Herald application.

mod alert;

pub use alert::{ATTRIBUTE_NAMES, AlertEvent, REQUIRED_ATTRIBUTES};
