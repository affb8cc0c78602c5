#![deny(clippy::unwrap_used)]
#![allow(
    clippy::similar_names,
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::while_float,
    clippy::too_many_lines,
    clippy::too_many_arguments,
    clippy::match_wildcard_for_single_variants,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::too_long_first_doc_paragraph,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]

//! Divisive hierarchical color quantization: reduces an image's colors to a
//! small palette and maps every pixel to its nearest entry.
//!
//! The pipeline, see [`quantize_and_map`] for the full entry point:
//! 1. [`dedup`] collapses a pixel grid into unique colors with frequency
//!    weights (optionally decimated for speed).
//! 2. [`bitreduce`] drops each channel to a few significant bits before
//!    clustering, trading color precision for a tighter search space.
//! 3. [`cluster`] repeatedly splits the widest-variance cluster along its
//!    dominant axis, refining each split with local two-centroid k-means.
//! 4. [`palette`] rounds the final cluster means back to full precision.
//! 5. [`nearest`] maps every original, full-precision pixel to its nearest
//!    palette entry.

pub mod bitreduce;
pub mod cluster;
pub mod color;
pub mod config;
pub mod dedup;
pub mod error;
pub mod membership;
pub mod nearest;
pub mod orchestrator;
pub mod palette;
pub mod stats;
pub mod weights;

pub use color::Color;
pub use config::QuantizeConfig;
pub use error::Error;
pub use nearest::{NearestMapper, map_pixels};
pub use orchestrator::{QuantizeResult, quantize_and_map};
pub use palette::Palette;
pub use weights::Weights;
