//! Little-endian field readers for BIFF8 record bodies

use crate::error::{XlsError, XlsResult};

/// Take `N` bytes at `offset`, advancing it
#[inline]
fn take<const N: usize>(data: &[u8], offset: &mut usize) -> XlsResult<[u8; N]> {
    let bytes: [u8; N] = offset
        .checked_add(N)
        .and_then(|end| data.get(*offset..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            XlsError::Parse(format!(
                "unexpected end of data at offset {}, need {} bytes, have {}",
                *offset,
                N,
                data.len().saturating_sub(*offset)
            ))
        })?;
    *offset += N;
    Ok(bytes)
}

#[inline]
pub fn read_u8(data: &[u8], offset: &mut usize) -> XlsResult<u8> {
    take::<1>(data, offset).map(|b| b[0])
}

#[inline]
pub fn read_u16(data: &[u8], offset: &mut usize) -> XlsResult<u16> {
    take(data, offset).map(u16::from_le_bytes)
}

#[inline]
pub fn read_u32(data: &[u8], offset: &mut usize) -> XlsResult<u32> {
    take(data, offset).map(u32::from_le_bytes)
}

#[inline]
pub fn read_f64(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    take(data, offset).map(f64::from_le_bytes)
}

/// Read 8 raw bytes (the FORMULA result field)
#[inline]
pub fn read_bytes8(data: &[u8], offset: &mut usize) -> XlsResult<[u8; 8]> {
    take(data, offset)
}

/// Decode an RK number.
///
/// Bit 0 divides the result by 100. Bit 1 selects a signed 30-bit integer
/// in bits 2..31; otherwise bits 2..31 are the high 30 bits of an f64 whose
/// remaining bits are zero.
#[inline]
pub fn decode_rk(rk: u32) -> f64 {
    let value = if rk & 0x02 != 0 {
        ((rk as i32) >> 2) as f64
    } else {
        f64::from_bits(((rk & 0xFFFF_FFFC) as u64) << 32)
    };

    if rk & 0x01 != 0 {
        value / 100.0
    } else {
        value
    }
}

#[inline]
pub fn read_rk(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    read_u32(data, offset).map(decode_rk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rk_integers() {
        assert_eq!(decode_rk((42u32 << 2) | 0x02), 42.0);
        assert_eq!(decode_rk(((-5i32 << 2) as u32) | 0x02), -5.0);
        assert_eq!(decode_rk(0x00000002), 0.0);
        assert_eq!(decode_rk(0xFFFFFE72), -100.0);
    }

    #[test]
    fn test_decode_rk_div100() {
        assert_eq!(decode_rk((4200u32 << 2) | 0x03), 42.0);
        assert!((decode_rk(0x000004EB) - 3.14).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_rk_float() {
        let upper = ((1.5f64.to_bits() >> 32) as u32) & 0xFFFF_FFFC;
        assert_eq!(decode_rk(upper), 1.5);
    }

    #[test]
    fn test_readers_advance_and_bound_check() {
        let data = [0x34, 0x12, 0xAA];
        let mut off = 0;
        assert_eq!(read_u16(&data, &mut off).unwrap(), 0x1234);
        assert_eq!(off, 2);
        assert!(read_u16(&data, &mut off).is_err());
        assert_eq!(off, 2);
        assert_eq!(read_u8(&data, &mut off).unwrap(), 0xAA);
    }

    #[test]
    fn test_read_f64() {
        let bytes = (-2.75f64).to_le_bytes();
        let mut off = 0;
        assert_eq!(read_f64(&bytes, &mut off).unwrap(), -2.75);
        assert_eq!(off, 8);
    }
}
