//! Utility types for binary encoding.
//!
//! Provides strict hex conversion, zarith variable-length integers, and the
//! `ByteReader` / `ByteWriter` cursor types used by the operation forger.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// Hex
// ---------------------------------------------------------------------------

/// Decode a hex string into bytes.
///
/// Accepts upper- or lower-case digits. Rejects odd lengths and any
/// non-hex character.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    if s.len() % 2 != 0 {
        return Err(PrimitivesError::InvalidHex(format!("odd length {}", s.len())));
    }
    Ok(hex::decode(s)?)
}

/// Encode bytes as a zero-padded lower-case hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string and interpret the bytes as UTF-8 text.
pub fn decode_string(s: &str) -> Result<String, PrimitivesError> {
    let bytes = hex_to_bytes(s)?;
    String::from_utf8(bytes).map_err(|e| PrimitivesError::Other(e.to_string()))
}

// ---------------------------------------------------------------------------
// Zarith
// ---------------------------------------------------------------------------

/// Encode an arbitrary-precision natural number as zarith bytes.
///
/// Seven bits per byte, least significant group first; the high bit of
/// every byte except the last is set.
pub fn zarith_encode_nat(value: &BigUint) -> Vec<u8> {
    let mut out = Vec::new();
    let mut n = value.clone();
    let mask = BigUint::from(0x7fu8);
    loop {
        let group = (&n & &mask).to_u8().unwrap_or(0);
        n >>= 7;
        if n.is_zero() {
            out.push(group);
            return out;
        }
        out.push(group | 0x80);
    }
}

/// Encode an arbitrary-precision signed integer as zarith bytes.
///
/// The first byte carries the sign in bit 6 and the six low bits of the
/// magnitude; following bytes carry seven bits each.
pub fn zarith_encode_int(value: &BigInt) -> Vec<u8> {
    let negative = value.sign() == Sign::Minus;
    let mut n = value.magnitude().clone();
    let mut first = (&n & BigUint::from(0x3fu8)).to_u8().unwrap_or(0);
    if negative {
        first |= 0x40;
    }
    n >>= 6;
    if n.is_zero() {
        return vec![first];
    }
    let mut out = vec![first | 0x80];
    out.extend(zarith_encode_nat(&n));
    out
}

/// Decode a zarith natural from the start of a hex string.
///
/// # Returns
/// `(value, bytes_consumed)`.
pub fn zarith_decode(hex_str: &str) -> Result<(BigUint, usize), PrimitivesError> {
    let bytes = hex_to_bytes(hex_str)?;
    let mut reader = ByteReader::new(&bytes);
    let value = reader.read_zarith_nat()?;
    Ok((value, reader.position()))
}

/// Decode a zarith signed integer from the start of a hex string.
///
/// # Returns
/// `(value, bytes_consumed)`.
pub fn zarith_decode_int(hex_str: &str) -> Result<(BigInt, usize), PrimitivesError> {
    let bytes = hex_to_bytes(hex_str)?;
    let mut reader = ByteReader::new(&bytes);
    let value = reader.read_zarith_int()?;
    Ok((value, reader.position()))
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor-based reader over forged operation bytes.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if self.pos + n > self.data.len() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte and advance the position.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a big-endian u32 and advance the position by 4 bytes.
    pub fn read_u32_be(&mut self) -> Result<u32, PrimitivesError> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read a `u32` big-endian length prefix followed by that many bytes.
    pub fn read_dynamic(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_u32_be()? as usize;
        self.read_bytes(len)
    }

    /// Read a zarith natural number.
    pub fn read_zarith_nat(&mut self) -> Result<BigUint, PrimitivesError> {
        let mut value = BigUint::zero();
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            value |= BigUint::from(byte & 0x7f) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
    }

    /// Read a zarith natural number that must fit in a `u64`.
    pub fn read_zarith_u64(&mut self) -> Result<u64, PrimitivesError> {
        self.read_zarith_nat()?
            .to_u64()
            .ok_or_else(|| PrimitivesError::Other("zarith value exceeds u64".to_string()))
    }

    /// Read a zarith signed integer.
    pub fn read_zarith_int(&mut self) -> Result<BigInt, PrimitivesError> {
        let first = self.read_u8()?;
        let negative = first & 0x40 != 0;
        let mut magnitude = BigUint::from(first & 0x3f);
        if first & 0x80 != 0 {
            magnitude |= self.read_zarith_nat()? << 6u32;
        }
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok(BigInt::from_biguint(sign, magnitude))
    }

    /// Return the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for forged operation bytes.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    /// Append raw bytes to the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a big-endian u32 (4 bytes) to the buffer.
    pub fn write_u32_be(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append `bytes` preceded by their length as a big-endian u32.
    pub fn write_dynamic(&mut self, bytes: &[u8]) {
        self.write_u32_be(bytes.len() as u32);
        self.write_bytes(bytes);
    }

    /// Append a zarith natural number.
    pub fn write_zarith_nat(&mut self, value: &BigUint) {
        self.buf.extend(zarith_encode_nat(value));
    }

    /// Append a `u64` as a zarith natural number.
    pub fn write_zarith_u64(&mut self, value: u64) {
        self.write_zarith_nat(&BigUint::from(value));
    }

    /// Append a zarith signed integer.
    pub fn write_zarith_int(&mut self, value: &BigInt) {
        self.buf.extend(zarith_encode_int(value));
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
