//! Naming resolver: identifiers, tags, hierarchy paths, derived class names.

pub mod identifier;
pub mod pattern;
pub mod tokenizer;

pub use identifier::{legal_name, resolve, Identifier, NameError, HIERARCHY_DELIMITER, TAG_DELIMITER};
pub use pattern::{unpack_names, MAX_RANGE_LEN};
