// File: src/core/mod.rs

pub mod aggregate;
pub mod lexicon;
pub mod ngram;
pub mod source;
