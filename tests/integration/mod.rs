//! Integration Tests Module
//!
//! End-to-end report runs against seeded on-disk stores.

pub mod accession_report;
pub mod failure_modes;
pub mod gap_check;
pub mod multi_collection;
pub mod parallel_fill;
pub mod tag_proportion;
