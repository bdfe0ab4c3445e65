//! Primitive binary codecs.
use {
    super::BinaryCodec,
    crate::{
        error::{invalid_utf8_encoding, malformed_varint, Result},
        io::BinaryBuffer,
        len::{SeqLen, VarIntLen},
    },
    core::marker::PhantomData,
};

macro_rules! impl_fixed {
    ($(#[$doc:meta] $codec:ident => $ty:ty, $write:ident, $read:ident;)+) => {
        $(
            #[$doc]
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
            pub struct $codec;

            impl BinaryCodec for $codec {
                type Value = $ty;

                #[inline(always)]
                fn write(&self, buffer: &mut BinaryBuffer, value: &$ty) -> Result<()> {
                    buffer.$write(*value);
                    Ok(())
                }

                #[inline(always)]
                fn read(&self, buffer: &mut BinaryBuffer) -> Result<$ty> {
                    buffer.$read()
                }
            }
        )+
    };
}

impl_fixed! {
    /// A single byte, `0` or `1`. Any other byte fails to read.
    Boolean => bool, write_boolean, read_boolean;
    /// A single unsigned byte.
    Byte => u8, write_byte, read_byte;
    /// Big-endian `i16`.
    Short => i16, write_short, read_short;
    /// Big-endian `i32`.
    Int => i32, write_int, read_int;
    /// Big-endian `i64`.
    Long => i64, write_long, read_long;
    /// Big-endian IEEE-754 `f32`.
    Float => f32, write_float, read_float;
    /// Big-endian IEEE-754 `f64`.
    Double => f64, write_double, read_double;
}

/// Five 7-bit groups cover all 32 bits.
const VARINT_MAX_BITS: u32 = 35;

/// An `i32` written as an unsigned LEB128 sequence of its two's complement bits.
///
/// Each byte carries 7 payload bits, least significant group first, with the
/// continuation bit `0x80` set on every byte but the last. Negative values always
/// take the full 5 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VarInt;

impl BinaryCodec for VarInt {
    type Value = i32;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &i32) -> Result<()> {
        let mut bits = *value as u32;
        while bits >= 0x80 {
            buffer.write_byte((bits as u8 & 0x7F) | 0x80);
            bits >>= 7;
        }
        buffer.write_byte(bits as u8);
        Ok(())
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<i32> {
        let mut bits = 0u32;
        let mut position = 0;
        while position < VARINT_MAX_BITS {
            let byte = buffer.read_byte()?;
            bits |= u32::from(byte & 0x7F) << position;
            if byte & 0x80 == 0 {
                return Ok(bits as i32);
            }
            position += 7;
        }
        Err(malformed_varint())
    }
}

/// A length-prefixed byte array.
pub struct Bytes<L = VarIntLen>(PhantomData<L>);

/// UTF-8 text prefixed with its byte length (not its character count).
pub struct Str<L = VarIntLen>(PhantomData<L>);

/// The full contents of another [`BinaryBuffer`], length-prefixed.
///
/// Reads produce a fresh buffer with its read cursor at the start.
pub struct Buffer<L = VarIntLen>(PhantomData<L>);

macro_rules! impl_len_prefixed_ctor {
    ($($codec:ident),+) => {
        $(
            impl $codec {
                pub const fn new() -> Self {
                    Self(PhantomData)
                }
            }

            impl<L> $codec<L> {
                pub const fn with_len() -> Self {
                    Self(PhantomData)
                }
            }

            impl Default for $codec {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<L> Clone for $codec<L> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<L> Copy for $codec<L> {}
        )+
    };
}

impl_len_prefixed_ctor!(Bytes, Str, Buffer);

impl<L: SeqLen> BinaryCodec for Bytes<L> {
    type Value = Vec<u8>;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &Vec<u8>) -> Result<()> {
        L::write_len(buffer, value.len())?;
        buffer.write_bytes(value);
        Ok(())
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Vec<u8>> {
        let len = L::read_len_cautious::<u8>(buffer)?;
        buffer.read_bytes(len).map(<[u8]>::to_vec)
    }
}

impl<L: SeqLen> BinaryCodec for Str<L> {
    type Value = String;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &String) -> Result<()> {
        L::write_len(buffer, value.len())?;
        buffer.write_bytes(value.as_bytes());
        Ok(())
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<String> {
        let len = L::read_len_cautious::<u8>(buffer)?;
        let bytes = buffer.read_bytes(len)?;
        core::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(invalid_utf8_encoding)
    }
}

impl<L: SeqLen> BinaryCodec for Buffer<L> {
    type Value = BinaryBuffer;

    fn write(&self, buffer: &mut BinaryBuffer, value: &BinaryBuffer) -> Result<()> {
        L::write_len(buffer, value.len())?;
        buffer.write_bytes(value.as_slice());
        Ok(())
    }

    fn read(&self, buffer: &mut BinaryBuffer) -> Result<BinaryBuffer> {
        let len = L::read_len_cautious::<u8>(buffer)?;
        buffer.read_bytes(len).map(BinaryBuffer::from_bytes)
    }
}

/// Unprefixed bytes: writes them as-is and reads everything that remains.
///
/// Only meaningful as the last value of a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawBytes;

impl BinaryCodec for RawBytes {
    type Value = Vec<u8>;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &Vec<u8>) -> Result<()> {
        buffer.write_bytes(value);
        Ok(())
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Vec<u8>> {
        Ok(buffer.read_remaining().to_vec())
    }
}
