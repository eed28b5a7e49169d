//! Seed assembly from quadrant labels and border marks.
//!
//! Output layout (40 lowercase hex digits):
//!
//! ```text
//! | rotation bits (2) | border bits (2) | block 0 (4) | ... | block 8 (4) |
//! ```
//!
//! Each block packs its four 5-bit symbols into four nibbles. Two symbols
//! contribute their low four bits directly; their high bit is folded in as
//! `+8` on one of the other two symbols. Which symbol lands where depends on
//! the block's rotation flag, read from the prefix of quadrant 0.

use crate::classify::CellLabel;
use crate::config::AssembleOptions;
use crate::error::{DecodeError, DecodeInput, InvalidLabelError, InvalidLabelKind};
use crate::geometry::{N_BLOCKS, N_BORDER, N_QUADRANTS};

/// Four output nibbles of one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecodedBlock {
    /// Rotation flag taken from quadrant 0.
    pub rotated: bool,
    /// Nibbles in output order, each in `0..=15`.
    pub nibbles: [u8; 4],
}

impl DecodedBlock {
    pub fn hex(&self) -> String {
        self.nibbles.iter().map(|&n| hex_digit(n)).collect()
    }
}

/// Decoded seed of one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecodeResult {
    /// Rotation flags of blocks 1..=8, block 1 in the most significant bit.
    pub rotation_bits: u8,
    /// Border marks 0..=7, index 0 in the most significant bit.
    pub border_bits: u8,
    /// Per-block nibbles in block order.
    pub blocks: [DecodedBlock; N_BLOCKS],
}

impl DecodeResult {
    /// The 40-digit lowercase hex seed.
    pub fn seed(&self) -> String {
        let mut out = format!("{:02x}{:02x}", self.rotation_bits, self.border_bits);
        for block in &self.blocks {
            out.push_str(&block.hex());
        }
        out
    }

    /// Seed with a `0x` prefix.
    pub fn prefixed(&self) -> String {
        format!("0x{}", self.seed())
    }

    /// Rotation bitstream as `'0'`/`'1'` characters.
    pub fn rotation_bitstring(&self) -> String {
        format!("{:08b}", self.rotation_bits)
    }

    /// Border bitstream as `'0'`/`'1'` characters.
    pub fn border_bitstring(&self) -> String {
        format!("{:08b}", self.border_bits)
    }
}

impl std::fmt::Display for DecodeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.seed())
    }
}

fn hex_digit(n: u8) -> char {
    char::from_digit(u32::from(n & 0x0f), 16).unwrap_or('0')
}

/// Pack up to eight flags into a byte, first flag as the most significant bit.
pub fn pack_bits(flags: impl IntoIterator<Item = bool>) -> u8 {
    flags
        .into_iter()
        .take(8)
        .enumerate()
        .fold(0u8, |acc, (i, f)| acc | (u8::from(f) << (7 - i)))
}

fn carry(v: i32) -> i32 {
    if v >= 16 {
        8
    } else {
        0
    }
}

/// Decode the four quadrant labels of one block.
///
/// Errors carry the offending quadrant but leave the block index at 0;
/// [`assemble`] fills it in.
pub fn decode_block(
    labels: &[CellLabel; N_QUADRANTS],
    options: &AssembleOptions,
) -> Result<DecodedBlock, InvalidLabelError> {
    let mut v = [0i32; N_QUADRANTS];
    let mut flags = [false; N_QUADRANTS];
    for (q, label) in labels.iter().enumerate() {
        v[q] = label.checked_value().map_err(|e| e.at(0, q))?;
        flags[q] = options.labels.is_rotated(label.prefix).ok_or_else(|| {
            InvalidLabelError::detached(InvalidLabelKind::UnknownPrefix(label.prefix)).at(0, q)
        })?;
    }

    let rotated = flags[0];
    let raw = if rotated {
        [v[0] + carry(v[1]), v[3] + carry(v[2]), v[1] % 16, v[2] % 16]
    } else {
        [v[1] + carry(v[0]), v[2] + carry(v[3]), v[0] % 16, v[3] % 16]
    };

    let mut nibbles = [0u8; 4];
    for (slot, (&value, out)) in raw.iter().zip(nibbles.iter_mut()).enumerate() {
        *out = u8::try_from(value)
            .ok()
            .filter(|n| *n <= 0x0f)
            .ok_or_else(|| {
                InvalidLabelError::detached(InvalidLabelKind::NibbleOverflow { slot, value })
            })?;
    }

    Ok(DecodedBlock { rotated, nibbles })
}

/// Assemble the seed from 9 blocks of quadrant labels and 8 border marks.
///
/// Block 0's rotation flag selects its own nibble layout but is not part of
/// the rotation bitstream. With [`CodeVersion::V1`](crate::CodeVersion::V1)
/// the border marks are ignored and encode as zero.
pub fn assemble(
    blocks: &[[CellLabel; N_QUADRANTS]],
    border_marks: &[bool],
    options: &AssembleOptions,
) -> Result<DecodeResult, DecodeError> {
    if blocks.len() != N_BLOCKS {
        return Err(DecodeError::IncompleteInput {
            input: DecodeInput::CellLabels,
            expected: N_BLOCKS * N_QUADRANTS,
            got: blocks.len() * N_QUADRANTS,
        });
    }
    let has_border = options.version.has_border_ring();
    if has_border && border_marks.len() != N_BORDER {
        return Err(DecodeError::IncompleteInput {
            input: DecodeInput::BorderMarks,
            expected: N_BORDER,
            got: border_marks.len(),
        });
    }

    let mut decoded = [DecodedBlock::default(); N_BLOCKS];
    for (b, (labels, out)) in blocks.iter().zip(decoded.iter_mut()).enumerate() {
        *out = decode_block(labels, options).map_err(|e| e.in_block(b))?;
        tracing::debug!(
            "block {}: labels [{}, {}, {}, {}] rotated={} -> {}",
            b,
            labels[0],
            labels[1],
            labels[2],
            labels[3],
            out.rotated,
            out.hex()
        );
    }

    let rotation_bits = pack_bits(decoded[1..].iter().map(|d| d.rotated));
    let border_bits = if has_border {
        pack_bits(border_marks.iter().copied())
    } else {
        0
    };

    Ok(DecodeResult {
        rotation_bits,
        border_bits,
        blocks: decoded,
    })
}
