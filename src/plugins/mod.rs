//! Helpers that sit beside the validation pipeline.

pub mod search;
