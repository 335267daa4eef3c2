//! Test Helper Utilities
//!
//! Shared utilities for testing poprako-interchange

#![allow(dead_code)]

pub mod db_utils;
pub mod projects;

pub use db_utils::{
    count_units, create_test_db, fetch_units, install_failing_trigger, seed_comic, seed_unit,
    SeedUnit,
};
pub use projects::{labelplus, LABELPLUS_HEADER};
