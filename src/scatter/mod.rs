//! Procedural scatter generation.
//!
//! Each generator opens one [`crate::SeededStream`] from its seed and pulls values in the
//! fixed per-element order documented on the generator. That order is part of the content
//! contract: inserting or removing a pull reshuffles every later element, so any change to
//! it must ship with a seed bump.

pub(crate) mod envelope;
pub(crate) mod generators;
