//! Marker types tagging [`DateTimeOf`] values.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// An entity was created.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// An entity was modified.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Something stops being valid.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
