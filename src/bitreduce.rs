use crate::color::Color;
use crate::error::Error;

/// Reduces each channel of every pixel to `n` significant bits by shifting it
/// right by `8 - n`, leaving a value in `0..2^n` in the channel's original
/// byte slot.
///
/// Because the shift amount is the same across all three channels here
/// (there is a single `n` for the whole pixel, unlike the upstream reference
/// which allows an independent depth per channel), the whole 24-bit word can
/// be masked and shifted in one operation instead of extracting and
/// recombining three bytes: masking each byte down to its top `n` bits first
/// keeps the subsequent whole-word shift from bleeding bits across channel
/// boundaries, so the result is identical to shifting each channel alone.
pub fn reduce_bits(pixels: &[Color], n: u8) -> Result<Vec<Color>, Error> {
    validate_bit_depth(n)?;
    let shift = 8 - n;
    Ok(pixels.iter().map(|&p| reduce_one(p, shift)).collect())
}

/// In-place variant of [`reduce_bits`].
pub fn reduce_bits_in_place(pixels: &mut [Color], n: u8) -> Result<(), Error> {
    validate_bit_depth(n)?;
    let shift = 8 - n;
    for p in pixels {
        *p = reduce_one(*p, shift);
    }
    Ok(())
}

fn reduce_one(p: Color, shift: u8) -> Color {
    if shift == 0 {
        return p;
    }
    let byte_mask: u32 = (0xFFu32 >> shift) << shift;
    let word_mask = (byte_mask << 16) | (byte_mask << 8) | byte_mask;
    Color::from((u32::from(p) & word_mask) >> shift)
}

fn validate_bit_depth(n: u8) -> Result<(), Error> {
    if n == 0 || n > 8 {
        return Err(Error::InvalidBitDepth { n });
    }
    Ok(())
}
