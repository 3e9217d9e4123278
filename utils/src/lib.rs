//! Shared utilities for fanout.
//!
//! Plain data transformations that handlers are typically built from. None of
//! these functions know about chunking or concurrency:
//!
//! - **`text`**: case changes, character-set trimming, segment lookup, `{0}` templates
//! - **`keys`**: renaming, removing and keeping keys on JSON objects

pub mod keys;
pub mod text;

pub use keys::{keep_keys, keep_keys_in_all, remove_keys, rename_keys};
pub use text::{change_case, format_template, is_blank, sub_value, trim_chars};
