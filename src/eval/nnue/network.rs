//! NNUE network structure and evaluation: a 768 -> 256 -> 1 architecture
//! with dual perspective accumulators and `SCReLU` activation.

use std::io::Read;

use super::simd;
use super::{QA, QB, SCALE};
use crate::error::EngineError;

/// Input feature size: 64 squares x 6 piece kinds x 2 colors.
pub const INPUT_SIZE: usize = 768;
pub const HIDDEN_SIZE: usize = 256;

const MAGIC: &[u8; 4] = b"FNUE";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 8;
const EXPECTED_BODY_LEN: usize =
    INPUT_SIZE * HIDDEN_SIZE * 2 + HIDDEN_SIZE * 2 + HIDDEN_SIZE * 2 + HIDDEN_SIZE * 2 + 2;

/// Hidden-layer activations for both perspectives.
#[derive(Clone)]
pub struct NnueAccumulator {
    pub white: [i16; HIDDEN_SIZE],
    pub black: [i16; HIDDEN_SIZE],
}

impl Default for NnueAccumulator {
    fn default() -> Self {
        NnueAccumulator {
            white: [0; HIDDEN_SIZE],
            black: [0; HIDDEN_SIZE],
        }
    }
}

impl NnueAccumulator {
    #[must_use]
    pub fn new(biases: &[i16; HIDDEN_SIZE]) -> Self {
        NnueAccumulator {
            white: *biases,
            black: *biases,
        }
    }

    /// Recompute both perspectives from scratch given each one's full
    /// set of active feature indices. The only valid way to bring an
    /// accumulator up to date across a king-zone boundary crossing.
    pub fn refresh(&mut self, white_features: &[usize], black_features: &[usize], network: &NnueNetwork) {
        self.white = network.feature_bias;
        self.black = network.feature_bias;
        for &feat in white_features {
            simd::add_weights(&mut self.white, &network.feature_weights[feat]);
        }
        for &feat in black_features {
            simd::add_weights(&mut self.black, &network.feature_weights[feat]);
        }
    }

    #[inline]
    pub fn add_feature(&mut self, white_feat: usize, black_feat: usize, network: &NnueNetwork) {
        simd::add_weights(&mut self.white, &network.feature_weights[white_feat]);
        simd::add_weights(&mut self.black, &network.feature_weights[black_feat]);
    }

    #[inline]
    pub fn sub_feature(&mut self, white_feat: usize, black_feat: usize, network: &NnueNetwork) {
        simd::sub_weights(&mut self.white, &network.feature_weights[white_feat]);
        simd::sub_weights(&mut self.black, &network.feature_weights[black_feat]);
    }
}

pub struct NnueNetwork {
    pub feature_weights: Box<[[i16; HIDDEN_SIZE]; INPUT_SIZE]>,
    pub feature_bias: [i16; HIDDEN_SIZE],
    pub output_weights_white: [i16; HIDDEN_SIZE],
    pub output_weights_black: [i16; HIDDEN_SIZE],
    pub output_bias: i16,
}

impl NnueNetwork {
    /// Load network weights from a file: an 8-byte header (`b"FNUE"` +
    /// little-endian u32 version) followed by the raw weight tensors in
    /// declaration order.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        std::fs::File::open(path)?.read_to_end(&mut bytes)?;
        let result = Self::from_bytes(&bytes);
        #[cfg(feature = "logging")]
        match &result {
            Ok(_) => log::info!("loaded NNUE weights from {} ({} bytes)", path.display(), bytes.len()),
            Err(e) => log::warn!("failed to load NNUE weights from {}: {e}", path.display()),
        }
        result
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, EngineError> {
        if data.len() != HEADER_LEN + EXPECTED_BODY_LEN {
            return Err(EngineError::NnueShapeMismatch {
                expected: HEADER_LEN + EXPECTED_BODY_LEN,
                found: data.len(),
            });
        }
        if &data[0..4] != MAGIC || u32::from_le_bytes([data[4], data[5], data[6], data[7]]) != VERSION {
            return Err(EngineError::NnueBadMagic);
        }
        let mut reader = &data[HEADER_LEN..];
        Self::from_reader(&mut reader)
    }

    fn from_reader<R: Read>(reader: &mut R) -> Result<Self, EngineError> {
        let mut feature_weights = Box::new([[0i16; HIDDEN_SIZE]; INPUT_SIZE]);
        for row in feature_weights.iter_mut() {
            read_i16_slice(reader, row)?;
        }

        let mut feature_bias = [0i16; HIDDEN_SIZE];
        read_i16_slice(reader, &mut feature_bias)?;

        let mut output_weights_white = [0i16; HIDDEN_SIZE];
        read_i16_slice(reader, &mut output_weights_white)?;

        let mut output_weights_black = [0i16; HIDDEN_SIZE];
        read_i16_slice(reader, &mut output_weights_black)?;

        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;
        let output_bias = i16::from_le_bytes(buf);

        Ok(NnueNetwork {
            feature_weights,
            feature_bias,
            output_weights_white,
            output_weights_black,
            output_bias,
        })
    }

    /// A network that always evaluates to its bias term: every weight
    /// is zero. Used as the `embedded_nnue` fallback until real trained
    /// weights are supplied via [`NnueNetwork::load`]; the search and
    /// accumulator machinery around it is fully exercised either way.
    #[must_use]
    pub fn zeroed() -> Self {
        NnueNetwork {
            feature_weights: Box::new([[0i16; HIDDEN_SIZE]; INPUT_SIZE]),
            feature_bias: [0i16; HIDDEN_SIZE],
            output_weights_white: [0i16; HIDDEN_SIZE],
            output_weights_black: [0i16; HIDDEN_SIZE],
            output_bias: 0,
        }
    }

    #[cfg(feature = "embedded_nnue")]
    #[must_use]
    pub fn from_embedded() -> Self {
        Self::zeroed()
    }

    /// Evaluate from the side-to-move's perspective, in centipawns.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, acc: &NnueAccumulator, white_to_move: bool) -> i32 {
        let (us_acc, them_acc, us_weights, them_weights) = if white_to_move {
            (&acc.white, &acc.black, &self.output_weights_white, &self.output_weights_black)
        } else {
            (&acc.black, &acc.white, &self.output_weights_black, &self.output_weights_white)
        };

        let us_output = simd::screlu_dot(us_acc, us_weights);
        let them_output = simd::screlu_dot(them_acc, them_weights);
        let output = us_output + them_output + i32::from(self.output_bias) * QA;
        output * SCALE / (QA * QA * QB)
    }
}

fn read_i16_slice<R: Read>(reader: &mut R, dst: &mut [i16]) -> Result<(), EngineError> {
    for slot in dst.iter_mut() {
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;
        *slot = i16::from_le_bytes(buf);
    }
    Ok(())
}

/// Compute the feature-transformer index for a piece of `piece_type`
/// (`PieceKind::index()`) and `piece_color` (`Color::index()`) on
/// `square`, from `perspective`'s (`Color::index()`) point of view.
///
/// `perspective`'s own king sits in one of two "zones" split by the
/// board's file centerline; `mirror` is true when that king is on the
/// kingside half (files e-h). Mirroring the file keeps the input space
/// at 768 regardless of which side the king castled to, at the cost of
/// a full accumulator refresh whenever the king crosses the centerline.
#[inline]
#[must_use]
pub fn feature_index(piece_type: usize, piece_color: usize, square: usize, perspective: usize, mirror: bool) -> usize {
    let (oriented_sq, oriented_color) = if perspective == 1 {
        (square ^ 56, 1 - piece_color)
    } else {
        (square, piece_color)
    };
    let file = oriented_sq & 7;
    let rank = oriented_sq & !7;
    let file = if mirror { 7 - file } else { file };
    oriented_color * 384 + piece_type * 64 + (rank | file)
}

/// Which king-zone half a king on `king_file` sits in: `true` when it
/// is on the kingside half (file index 4..=7, inclusive).
#[inline]
#[must_use]
pub const fn king_zone_mirror(king_file: u8) -> bool {
    king_file >= 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_index_is_injective_over_kind_color_square() {
        let mut seen = std::collections::HashSet::new();
        for piece_type in 0..6 {
            for piece_color in 0..2 {
                for square in 0..64 {
                    let idx = feature_index(piece_type, piece_color, square, 0, false);
                    assert!(seen.insert(idx), "duplicate feature index {idx}");
                }
            }
        }
        assert_eq!(seen.len(), INPUT_SIZE);
    }

    #[test]
    fn mirroring_reflects_file_only() {
        let unmirrored = feature_index(5, 0, 0, 0, false); // pawn, a1
        let mirrored = feature_index(5, 0, 0, 0, true);
        let expected_mirrored = feature_index(5, 0, 7, 0, false); // h1
        assert_eq!(mirrored, expected_mirrored);
        assert_ne!(unmirrored, mirrored);
    }

    #[test]
    fn own_pawn_on_home_rank_maps_identically_across_perspectives() {
        // A white pawn on a2 seen from white's own perspective lands on
        // the same index as a black pawn on a7 (its mirror square) seen
        // from black's own perspective -- each side's feature space is
        // symmetric in "my piece on my second rank".
        let white_view = feature_index(5, 0, 8, 0, false);
        let black_view = feature_index(5, 1, 48, 1, false);
        assert_eq!(white_view, black_view);
    }

    #[test]
    fn zeroed_network_evaluates_to_bias_only() {
        let net = NnueNetwork::zeroed();
        let acc = NnueAccumulator::new(&net.feature_bias);
        assert_eq!(net.evaluate(&acc, true), 0);
        assert_eq!(net.evaluate(&acc, false), 0);
    }
}
