//! Statically typed merge
//!
//! [`DeepMerge`] applies the same rules as [`merge`](crate::merge) to plain
//! Rust data: `Option::None` plays the part of `Absent`, [`Nullable::Null`]
//! the part of `Null`, `Vec` concatenates, maps and structs
//! merge key-wise, everything else is a leaf where the value wins.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone};

use crate::merge::merge;
use crate::opaque::Opaque;
use crate::value::Value;

/// Merge `self` (the override) onto `default`.
pub trait DeepMerge: Sized {
    fn deep_merge(self, default: Self) -> Self;
}

/// A typed value that may be explicitly nulled.
///
/// `Option<Nullable<T>>` distinguishes "not supplied", "forced empty" and a
/// real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    Null,
    Set(T),
}

impl<T> Nullable<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Null => Nullable::Null,
            Nullable::Set(value) => Nullable::Set(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Null => None,
            Nullable::Set(value) => Some(value),
        }
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable::Set(value)
    }
}

impl<T: DeepMerge> DeepMerge for Nullable<T> {
    fn deep_merge(self, default: Self) -> Self {
        match (self, default) {
            (Nullable::Null, _) => Nullable::Null,
            (Nullable::Set(value), Nullable::Set(base)) => Nullable::Set(value.deep_merge(base)),
            (value, Nullable::Null) => value,
        }
    }
}

impl<T: DeepMerge> DeepMerge for Option<T> {
    fn deep_merge(self, default: Self) -> Self {
        match (self, default) {
            (None, default) => default,
            (Some(value), Some(base)) => Some(value.deep_merge(base)),
            (value, None) => value,
        }
    }
}

impl<T> DeepMerge for Vec<T> {
    fn deep_merge(self, mut default: Self) -> Self {
        default.extend(self);
        default
    }
}

impl<K: Ord, T: DeepMerge> DeepMerge for BTreeMap<K, T> {
    fn deep_merge(mut self, default: Self) -> Self {
        let mut merged = BTreeMap::new();
        for (key, base) in default {
            let entry = match self.remove(&key) {
                Some(value) => value.deep_merge(base),
                None => base,
            };
            merged.insert(key, entry);
        }
        merged.extend(self);
        merged
    }
}

impl<K, T, S> DeepMerge for HashMap<K, T, S>
where
    K: Eq + Hash,
    T: DeepMerge,
    S: BuildHasher + Default,
{
    fn deep_merge(mut self, default: Self) -> Self {
        let mut merged = HashMap::with_capacity_and_hasher(default.len(), S::default());
        for (key, base) in default {
            let entry = match self.remove(&key) {
                Some(value) => value.deep_merge(base),
                None => base,
            };
            merged.insert(key, entry);
        }
        merged.extend(self);
        merged
    }
}

impl DeepMerge for Value {
    fn deep_merge(self, default: Self) -> Self {
        merge(self, default)
    }
}

impl<Tz: TimeZone> DeepMerge for DateTime<Tz> {
    fn deep_merge(self, _default: Self) -> Self {
        self
    }
}

macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DeepMerge for $ty {
                fn deep_merge(self, _default: Self) -> Self {
                    self
                }
            }
        )*
    };
}

leaf!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, PathBuf, Duration, Opaque,
);

/// Implement [`DeepMerge`] for a plain struct by merging it field-wise.
///
/// Every listed field must itself implement `DeepMerge`.
///
/// ```
/// use defmerge_core::{impl_deep_merge, DeepMerge};
///
/// #[derive(Debug, PartialEq)]
/// struct Cache {
///     mode: Option<String>,
///     paths: Vec<String>,
/// }
///
/// impl_deep_merge!(Cache { mode, paths });
///
/// let merged = Cache { mode: None, paths: vec!["b".into()] }
///     .deep_merge(Cache { mode: Some("off".into()), paths: vec!["a".into()] });
/// assert_eq!(merged.mode.as_deref(), Some("off"));
/// assert_eq!(merged.paths, vec!["a".to_string(), "b".to_string()]);
/// ```
#[macro_export]
macro_rules! impl_deep_merge {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::DeepMerge for $ty {
            fn deep_merge(self, default: Self) -> Self {
                Self {
                    $($field: $crate::DeepMerge::deep_merge(self.$field, default.$field),)*
                }
            }
        }
    };
}
