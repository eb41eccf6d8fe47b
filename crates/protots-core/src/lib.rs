//! # protots-core
//!
//! A library for translating compiled Protocol Buffer descriptor sets into
//! TypeScript declaration trees and source text.
//!
//! This crate provides the core functionality for:
//! - Indexing every message and enum of a descriptor set by fully-qualified path
//! - Synthesizing typed declarations for messages, enums, oneofs, and services
//! - Rendering the synthesized declaration tree into TypeScript source
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`index`]: Global type index over the full input set
//! - [`synth`]: Per-file declaration synthesis (aliasing, type mapping, messages, services)
//! - [`decl`]: The synthesized declaration tree
//! - [`render`]: Declaration tree to TypeScript text
//! - [`plugin`]: The protoc code generator request/response boundary
//! - [`error`]: Error types and handling
//!
//! Processing is two-phase: the index is built once over all files, then
//! files are synthesized one at a time, each under a fresh import-alias
//! session.
//!
//! ## Example
//!
//! ```
//! use protots_core::{render, Generator, Options};
//! use prost_types::{DescriptorProto, FileDescriptorProto};
//!
//! let file = FileDescriptorProto {
//!     name: Some("greeter.proto".to_string()),
//!     package: Some("greeter".to_string()),
//!     message_type: vec![DescriptorProto {
//!         name: Some("Hello".to_string()),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let generator = Generator::new(std::slice::from_ref(&file), Options::default(), None)?;
//! for unit in generator.generate()? {
//!     println!("{}", render::render_unit(&unit));
//! }
//! # Ok::<(), protots_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod decl;
pub mod error;
pub mod index;
pub mod options;
pub mod plugin;
pub mod render;
pub mod synth;

#[cfg(test)]
mod testutil;

// Re-export primary types for convenience
pub use decl::{Declaration, DeclarationUnit, TypeExpr};
pub use error::{Error, Result};
pub use index::TypeIndex;
pub use options::Options;
pub use synth::Generator;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
