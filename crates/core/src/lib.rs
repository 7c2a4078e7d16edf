//! Field-selector engine.
//!
//! Parses textual field selectors such as `sku`, `provider.id`,
//! `seller.{id|code|name}`, and `provider.{id|logo.{x|y}}` into
//! deduplicated [`FieldInfo`] trees, enforcing a global field budget, a
//! nesting-depth cap, a per-segment length cap, and an optional
//! allow-list.
//!
//! The interesting entry points:
//!
//! - [`resolve`] parses and validates a batch of selector strings
//! - [`FieldOptions`] carries the limits and the allow-list
//! - [`FieldError`] enumerates every recoverable failure, comparable
//!   with `==`

mod collector;
mod parser;
mod scanner;

pub mod error;
pub mod info;
pub mod options;
pub mod resolve;

pub use error::FieldError;
pub use info::FieldInfo;
pub use options::FieldOptions;
pub use resolve::resolve;
