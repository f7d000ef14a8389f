//! Bit regrouping between 8-bit bytes and 5-bit symbols.

use crate::errors::CodecError;

/// Regroup `data` from `from`-bit values into `to`-bit values, MSB first.
///
/// With `pad`, leftover bits are zero-filled into a final group. Without it,
/// leftover bits must be fewer than `from` and all zero.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, CodecError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value: u32 = (1 << to) - 1;
    let mut out = Vec::with_capacity((data.len() * from as usize).div_ceil(to as usize));

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return Err(CodecError::InvalidPadding);
        }
        acc = (acc << from) | value;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return Err(CodecError::InvalidPadding);
    }

    Ok(out)
}
