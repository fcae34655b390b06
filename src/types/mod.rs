//! Core types for the answer pipeline.

pub mod citation;
pub mod trace;

pub use citation::*;
pub use trace::*;
