//! Store operations used by import and export
//!
//! Every function takes a plain connection so the same code runs inside an
//! import transaction (`&mut *tx`) and on a pooled connection.

pub mod comics;
pub mod pages;
pub mod units;
