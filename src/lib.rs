//! # data-story
//!
//! Rule-based exploratory data analysis: profile a table, turn the profile
//! into a short ordered list of narrative insights, and build the chart that
//! goes with each one.
//!
//! ```
//! use data_story::data::loader::load_csv_reader;
//! use data_story::insight::{generate_insights, InsightKind};
//! use data_story::profile::profile;
//!
//! let csv = "age,city\n25,Paris\n,London\n31,Paris\n";
//! let dataset = load_csv_reader(csv.as_bytes()).unwrap();
//! let profile = profile(&dataset);
//! let insights = generate_insights(&dataset, &profile);
//!
//! assert_eq!(profile.numeric_columns, vec!["age"]);
//! assert_eq!(insights[0].kind, InsightKind::Overview);
//! ```

pub mod ai;
pub mod chart;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod insight;
pub mod logging;
pub mod profile;
pub mod report;
pub mod stats;
