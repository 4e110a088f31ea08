//! Configuration layering
//!
//! Builds a configuration from:
//! 1. A baseline default structure
//! 2. Override files (`.toml` / `.json`), singly or from a directory
//! 3. Inline overrides
//!
//! Later layers take precedence. Each layer is merged onto everything
//! before it with [`merge`](defmerge_core::merge).

mod effective;
mod source;

pub use effective::{LayerError, LayeredConfig, Layers};
pub use source::{LayerOrigin, LayerSource};
