//! Deep merge of an override value onto a default value.
//!
//! `merge(value, default)` keeps whatever `value` supplies and fills the gaps
//! from `default`, recursively:
//! - `Null` in `value` forces `Null`, whatever the default holds
//! - `Absent` in `value` takes the default as-is
//! - two arrays concatenate, default elements first
//! - two records merge key-wise, shared keys recursing
//! - anything else (scalars, opaque leaves, shape mismatches): value wins
//!
//! [`DeepMerge`] carries the same rule table over statically typed data.

mod convert;
mod merge;
mod opaque;
mod typed;
mod value;

pub use convert::ConvertError;
pub use merge::{merge, merge_layers, merge_ref};
pub use opaque::Opaque;
pub use typed::{DeepMerge, Nullable};
pub use value::{Record, Shape, Value};
