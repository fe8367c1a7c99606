#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod context;
pub mod filter;

pub use context::{RequestContext, RequestContextBuilder};
pub use filter::{EqFilter, Filter, FilterValue, InFilter, Record, properties};
