#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// An insertion-ordered map over the compact hash table.
///
/// This module provides `Dict`, which wraps the `HashTable` and provides a
/// dictionary interface (put, pop, pop_item, set_default, update, ordered
/// views) with configurable hashers.
pub mod dict;

/// Error types for fallible dictionary operations.
pub mod error;

pub mod hash_table;

/// The perturbation probe sequence used by the table engine.
pub mod probe;

pub use dict::Dict;
pub use dict::Entry;
pub use error::DictError;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by [`Dict::new`] and friends.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by [`Dict::new`] and friends.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// Placeholder when no hasher feature is enabled. It has no values,
        /// so maps must be built with [`Dict::with_hasher`].
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

/// Creates a [`Dict`] from `key => value` pairs, in order.
///
/// # Examples
///
/// ```rust
/// use compact_dict::dict;
///
/// let dict = dict! {
///     "D" => 1,
///     "G" => 2,
///     "V" => 3,
/// };
/// assert_eq!(dict.keys(), ["D", "G", "V"]);
/// ```
#[macro_export]
macro_rules! dict {
    (@unit $key:expr) => {
        ()
    };
    (@count $($key:expr),*) => {
        <[()]>::len(&[$($crate::dict!(@unit $key)),*])
    };
    () => {
        $crate::Dict::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut dict = $crate::Dict::with_capacity($crate::dict!(@count $($key),+));
        $(
            dict.put($key, $value);
        )+
        dict
    }};
}
