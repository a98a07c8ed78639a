//! Integration flows across `lotto-generation` and `lotto-runtime`.

pub mod fixtures;

mod concurrency;
mod http_flows;
mod pipeline_flows;
