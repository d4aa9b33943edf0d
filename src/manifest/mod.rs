//! Manifest interception subsystem.
//!
//! # Data Flow
//! ```text
//! Manifest request (.m3u8 / .mpd)
//!     → origin fetch (full body, no streaming)
//!     → rewriter.rs (validate header, upgrade version, inject steering)
//!     → response with origin headers and recomputed content-length
//! ```

pub mod rewriter;

pub use rewriter::{ManifestError, ManifestRewriter, HEADER_MARKER};
