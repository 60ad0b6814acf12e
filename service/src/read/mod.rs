//! Read entities definitions.

pub mod hotel;
