//! NNUE (Efficiently Updatable Neural Network) evaluation.
//!
//! Architecture: (768 -> 256) x 2 perspectives -> 1, `SCReLU` activation,
//! incremental accumulator updates gated on a king-zone boundary check
//! (see [`network::feature_index`]).

pub mod network;
mod simd;

pub use network::{feature_index, king_zone_mirror, NnueAccumulator, NnueNetwork, HIDDEN_SIZE, INPUT_SIZE};

/// Feature-weight quantization factor.
pub const QA: i32 = 255;
/// Output-weight quantization factor.
pub const QB: i32 = 64;
/// Evaluation scale factor (centipawns per unit network output).
pub const SCALE: i32 = 400;
