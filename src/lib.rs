//! orthos
//!
//! An embedded spell engine over Hunspell-format dictionary pairs:
//! affix-aware lookup, compound words, suggestions and morphology.

mod aff;
mod compound;
mod condition;
mod deadline;
mod dic;
mod dictionary;
mod flags;
mod lookup;
mod morph;
mod ngram;
mod phonet;
mod replist;
mod suggest;
mod trie;

pub use dictionary::{Dictionary, InitializeError};
pub use lookup::LookupError;
