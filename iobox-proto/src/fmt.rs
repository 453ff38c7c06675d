//! No-std compatible number formatting and scaling for protocol serialization.
//!
//! These functions write formatted numbers directly to byte buffers without
//! requiring heap allocation or the standard library.

/// Write a u8 as an unsigned decimal string.
///
/// Returns the number of bytes written (1-3 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 3` (max size: "255").
#[inline]
pub fn write_u8(buf: &mut [u8], value: u8) -> usize {
    write_u16(buf, value as u16)
}

/// Write a u16 as an unsigned decimal string.
///
/// Returns the number of bytes written (1-5 bytes).
///
/// # Panics
///
/// Panics if the buffer cannot hold the digits.
#[inline]
pub fn write_u16(buf: &mut [u8], value: u16) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    // Write digits in reverse order to temporary buffer
    let mut temp = [0u8; 5];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
    }

    for i in 0..len {
        buf[i] = temp[len - 1 - i];
    }

    len
}

/// Scale a 0..1 fraction to a rounded percentage in 0..=100.
///
/// Values outside the range are clamped; NaN maps to 0.
#[inline]
#[must_use]
pub fn fraction_to_percent(value: f32) -> u8 {
    if !(value > 0.0) {
        return 0;
    }
    if value >= 1.0 {
        return 100;
    }
    // Non-negative here, so truncation after +0.5 rounds half up
    (value * 100.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u8() {
        let mut buf = [0u8; 3];

        let len = write_u8(&mut buf, 0);
        assert_eq!(&buf[..len], b"0");

        let len = write_u8(&mut buf, 7);
        assert_eq!(&buf[..len], b"7");

        let len = write_u8(&mut buf, 99);
        assert_eq!(&buf[..len], b"99");

        let len = write_u8(&mut buf, 255);
        assert_eq!(&buf[..len], b"255");
    }

    #[test]
    fn test_write_u16() {
        let mut buf = [0u8; 5];

        let len = write_u16(&mut buf, 500);
        assert_eq!(&buf[..len], b"500");

        let len = write_u16(&mut buf, 65535);
        assert_eq!(&buf[..len], b"65535");

        let len = write_u16(&mut buf, 1000);
        assert_eq!(&buf[..len], b"1000");
    }

    #[test]
    fn test_fraction_to_percent() {
        assert_eq!(fraction_to_percent(1.0), 100);
        assert_eq!(fraction_to_percent(0.0), 0);
        assert_eq!(fraction_to_percent(0.5), 50);
        assert_eq!(fraction_to_percent(0.333), 33);
        assert_eq!(fraction_to_percent(0.676), 68);
        assert_eq!(fraction_to_percent(1.7), 100);
        assert_eq!(fraction_to_percent(-0.2), 0);
        assert_eq!(fraction_to_percent(f32::NAN), 0);
    }
}
