//! DICOM metadata date-bucket audit reports
//!

pub mod analysis;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod types;
pub mod utils;
