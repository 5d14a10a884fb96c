//! # Rulelog CLI Library
//!
//! Runs rule sets over fact files, answers patterns through an inference
//! view and inspects RDFS taxonomies from the command line.

pub mod commands;

pub use commands::*;
