//! # Lotto Forge Test Suite
//!
//! Cross-crate tests that drive the pipeline the way the runtime does.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs        # Shared builders
//!     ├── pipeline_flows.rs  # Generate / persist / notify / record flows
//!     ├── http_flows.rs      # Same flows through the HTTP router
//!     └── concurrency.rs     # Concurrent batches and draw recording
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lotto-tests
//! cargo test -p lotto-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p lotto-tests
//! ```

pub mod integration;
