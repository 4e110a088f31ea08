//! Deep merge of override values onto default structures.
//!
//! The merge itself lives in `defmerge-core` and is re-exported here. The
//! [`layers`] module applies it to configuration: a baseline default
//! structure plus override sources loaded from disk or supplied inline.

pub mod layers;

pub use defmerge_core::{
    impl_deep_merge, merge, merge_layers, merge_ref, ConvertError, DeepMerge, Nullable, Opaque,
    Record, Shape, Value,
};
pub use layers::{LayerError, LayerOrigin, LayerSource, LayeredConfig, Layers};
