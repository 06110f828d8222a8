//! Library side of the `protocol-ingest` binary.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
