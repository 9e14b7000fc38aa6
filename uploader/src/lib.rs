//! Direct-to-storage upload page

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Command line options
pub mod cli;

/// Upload page rendering
pub mod page;

/// Container, CORS and URL provisioning pipeline
pub mod provision;

/// Single-handler HTTP server for the upload page
pub mod server;

/// S3-compatible storage operations
pub mod storage;

/// Shared configuration and error types
pub mod types;
