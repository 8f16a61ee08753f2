//! Core math modules.

pub mod poisson;
