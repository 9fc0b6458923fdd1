//! IEEE 754 half-precision (binary16) pack/unpack.
//!
//! A 32-bit float is re-biased from exponent bias 127 to 15 and its mantissa
//! truncated to 10 bits with round-to-nearest. Exponent overflow saturates to
//! infinity; NaN keeps a nonzero mantissa payload. The unpack direction maps
//! the binary16 exponent field back, including the infinity/NaN exponent, so
//! specials survive a round trip.

/// Packs a 32-bit float into its nearest binary16 representation.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn quantize(value: f32) -> u16 {
    let bits = value.to_bits() as i32;

    let sign = (bits >> 16) & 0x8000;
    let mut exponent = ((bits >> 23) & 0xFF) - (127 - 15);
    let mut mantissa = bits & 0x007F_FFFF;

    if exponent <= 0 {
        // Subnormal in half precision. Below 2^-24 everything rounds to
        // signed zero.
        if exponent < -10 {
            return sign as u16;
        }

        mantissa |= 0x0080_0000;

        let shift = 14 - exponent;
        let round = (1 << (shift - 1)) - 1;
        let odd = (mantissa >> shift) & 1;
        mantissa = (mantissa + round + odd) >> shift;

        return (sign | mantissa) as u16;
    }

    if exponent == 0xFF - (127 - 15) {
        if mantissa == 0 {
            // Infinity
            return (sign | 0x7C00) as u16;
        }

        // NaN: keep a nonzero payload even if truncation clears it
        mantissa >>= 13;
        return (sign | 0x7C00 | mantissa | i32::from(mantissa == 0)) as u16;
    }

    // Normal number: round-to-nearest on the 13 dropped mantissa bits
    mantissa = mantissa + 0x0FFF + ((mantissa >> 13) & 1);

    if mantissa & 0x0080_0000 != 0 {
        mantissa = 0;
        exponent += 1;
    }

    if exponent > 30 {
        // Overflow saturates to infinity
        return (sign | 0x7C00) as u16;
    }

    (sign | (exponent << 10) | (mantissa >> 13)) as u16
}

/// Unpacks a binary16 value into the 32-bit float it represents.
#[must_use]
pub fn dequantize(value: u16) -> f32 {
    let sign = (u32::from(value) & 0x8000) << 16;
    let mut mantissa = u32::from(value & 0x03FF);
    let half_exponent = (u32::from(value) >> 10) & 0x1F;

    let result = if half_exponent == 0 {
        if mantissa == 0 {
            // Signed zero
            sign
        } else {
            // Subnormal: renormalize by shifting the mantissa up until its
            // implicit bit appears
            let mut exponent = -14i32;
            while mantissa & 0x0400 == 0 {
                exponent -= 1;
                mantissa <<= 1;
            }
            mantissa &= 0x03FF;

            #[allow(clippy::cast_sign_loss)]
            let biased = (exponent + 127) as u32;
            sign | (biased << 23) | (mantissa << 13)
        }
    } else if half_exponent == 0x1F {
        // Infinity / NaN
        sign | 0x7F80_0000 | (mantissa << 13)
    } else {
        sign | ((half_exponent + 127 - 15) << 23) | (mantissa << 13)
    };

    f32::from_bits(result)
}
