//! Support for heterogenous sequence length encoding.
use crate::{
    binary::{BinaryCodec, VarInt},
    error::{length_overflow, negative_length, preallocation_size_limit, Result},
    io::BinaryBuffer,
};

/// Behavior to support heterogenous sequence length encoding.
///
/// Every length-prefixed binary codec (strings, byte arrays, lists, maps) is generic
/// over its length encoding, defaulting to [`VarIntLen`].
pub trait SeqLen {
    /// Read the length of a sequence from the buffer.
    fn read_len(buffer: &mut BinaryBuffer) -> Result<usize>;
    /// Read the length of a sequence of `T` from the buffer, potentially
    /// returning an error if some length condition is not met
    /// (e.g., preallocation limits).
    #[inline(always)]
    fn read_len_cautious<T>(buffer: &mut BinaryBuffer) -> Result<usize> {
        Self::read_len(buffer)
    }
    /// Write the length of a sequence to the buffer.
    fn write_len(buffer: &mut BinaryBuffer, len: usize) -> Result<()>;
}

const DEFAULT_MAX_PREALLOCATION: usize = 4 << 20; // 4 MiB

#[inline(always)]
fn check_preallocation<T>(len: usize, max_size: usize) -> Result<usize> {
    let needed = len.saturating_mul(size_of::<T>());
    if needed > max_size {
        return Err(preallocation_size_limit(needed, max_size));
    }
    Ok(len)
}

#[inline(always)]
fn checked_prefix(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| length_overflow(len))
}

#[inline(always)]
fn non_negative(len: i32) -> Result<usize> {
    usize::try_from(len).map_err(|_| negative_length(len))
}

/// [`SeqLen`] implementation writing lengths as a [`VarInt`].
///
/// The `MAX_SIZE` constant is a limit on the maximum preallocation size
/// (in bytes) for heap allocated structures. This is a safety precaution
/// against malicious input causing OOM. The default is 4 MiB.
pub struct VarIntLen<const MAX_SIZE: usize = DEFAULT_MAX_PREALLOCATION>;

impl<const MAX_SIZE: usize> SeqLen for VarIntLen<MAX_SIZE> {
    #[inline(always)]
    fn read_len(buffer: &mut BinaryBuffer) -> Result<usize> {
        non_negative(VarInt.read(buffer)?)
    }

    #[inline(always)]
    fn read_len_cautious<T>(buffer: &mut BinaryBuffer) -> Result<usize> {
        check_preallocation::<T>(Self::read_len(buffer)?, MAX_SIZE)
    }

    #[inline(always)]
    fn write_len(buffer: &mut BinaryBuffer, len: usize) -> Result<()> {
        VarInt.write(buffer, &checked_prefix(len)?)
    }
}

/// [`SeqLen`] implementation writing lengths as a fixed 4-byte big-endian integer.
pub struct FixedIntLen<const MAX_SIZE: usize = DEFAULT_MAX_PREALLOCATION>;

impl<const MAX_SIZE: usize> SeqLen for FixedIntLen<MAX_SIZE> {
    #[inline(always)]
    fn read_len(buffer: &mut BinaryBuffer) -> Result<usize> {
        non_negative(buffer.read_int()?)
    }

    #[inline(always)]
    fn read_len_cautious<T>(buffer: &mut BinaryBuffer) -> Result<usize> {
        check_preallocation::<T>(Self::read_len(buffer)?, MAX_SIZE)
    }

    #[inline(always)]
    fn write_len(buffer: &mut BinaryBuffer, len: usize) -> Result<()> {
        buffer.write_int(checked_prefix(len)?);
        Ok(())
    }
}
