//! Foundation types for ARK (Asset Reconciliation Kit).
//!
//! This crate provides the validated field types that make up an asset
//! identity, plus the immutable catalog configuration passed explicitly to
//! the codec and the reconciliation engine. Every other ARK crate depends
//! on `ark-types`.
//!
//! # Key Types
//!
//! - [`AppId`] — application identifier, domain 1–9
//! - [`VariantId`] — resource variant identifier, domain 0–9
//! - [`OwnerId`] — strictly positive owner identifier
//! - [`CreatedAt`] — creation timestamp, capped at ten decimal digits
//! - [`AssetId`] — the four-field identity tuple encoded into tokens
//! - [`Catalog`] — application and variant maps built once at startup

pub mod catalog;
pub mod error;
pub mod identity;
pub mod temporal;

pub use catalog::{AppCatalog, Catalog, VariantCatalog, VariantSpec};
pub use error::TypeError;
pub use identity::{AppId, AssetId, OwnerId, VariantId};
pub use temporal::CreatedAt;
