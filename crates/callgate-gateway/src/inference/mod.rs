//! File upload -> ML inference proxy.
//!
//! Stateless: one multipart POST per upload, no retries, upstream JSON passed
//! back verbatim.

pub mod client;
pub mod handler;

pub use client::{InferenceClient, Upload};
pub use handler::upload;
