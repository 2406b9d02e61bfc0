//! Core infrastructure for tugrewrite.
//!
//! This crate provides the language-agnostic substrate every tree and recipe
//! builds on:
//! - Tree identifiers
//! - The side-channel marker store and the built-in marker types
//! - Source-file metadata (checksum, charset, file attributes)
//! - The derived-view cache cell
//! - Run configuration with precedence tracking
//! - Error types

pub mod cache;
pub mod config;
pub mod error;
pub mod id;
pub mod marker;
pub mod source;

pub use cache::DerivedCache;
pub use config::{ConfigSource, ConfigValue, ResolvedRunConfig, RunConfig, RunOverrides};
pub use error::{RewriteError, RewriteResult, ShapeError};
pub use id::TreeId;
pub use marker::{Marker, MarkupLevel, Markers, Markup, RecipesThatMadeChanges, SearchResult};
pub use source::{Checksum, FileAttributes, SourceMetadata};
