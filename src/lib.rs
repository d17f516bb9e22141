//! Cardfolio - Library for reconciling a card collection with scanned card images
//!
//! This library provides functionality to:
//! - Parse a collection inventory export into a keyed index
//! - Attribute multicolor cards to balanced single-color buckets
//! - Select and lay out gallery sheets per color, group and ownership
//! - Composite the sheets and save them as PNG and WebP

pub mod assign;
pub mod cli;
pub mod compose;
pub mod config;
pub mod gallery;
pub mod inventory;
pub mod key;
pub mod layout;
pub mod models;
pub mod output;
