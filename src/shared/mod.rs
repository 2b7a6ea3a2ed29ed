//! Utilities shared by the argument parser, the predicate engine and the
//! command runner

pub mod glob;
pub mod os;

pub use glob::Wildcard;
