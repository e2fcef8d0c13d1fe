//! Filtering and presentation mapping for crypts.
//!
//! Both stages are pure: the filter engine selects an order-preserving
//! subsequence of a cycle's records, and the mapper turns the survivors into
//! display-ready rows.

pub mod filter;
pub mod mapper;

pub use filter::apply_filters;
pub use mapper::{map_record, map_records};
