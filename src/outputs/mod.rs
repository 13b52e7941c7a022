//! Output generation for the assembled dataset.
//!
//! The pipeline itself ends at a [`crate::models::Dataset`] value; what the
//! binary does with it lives here. Currently one format:
//!
//! - [`json`]: writes the dataset as a JSON file for API/analysis consumption
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── rankings_2023-06-15_2023-12-21.json
//! ```
//!
//! The filename spans the earliest and latest snapshot date present, so
//! successive runs over different selections never clobber each other.

pub mod json;
