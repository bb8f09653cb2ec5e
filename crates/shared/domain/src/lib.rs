//! # Domain Models
//!
//! Pure data types shared by every crate of the records platform: the layered
//! configuration, API constants, and the feature slice registry.
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;
