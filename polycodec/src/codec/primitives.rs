//! Primitive codecs, each bound to one pair of [`Transcoder`] methods.
use {
    super::{Codec, Transcode},
    crate::{
        enumerant::Enumerant,
        error::{invalid_value, Result},
        transcoder::Transcoder,
    },
    core::marker::PhantomData,
};

macro_rules! impl_primitive {
    ($(#[$doc:meta] $codec:ident => $ty:ty, $encode:ident, $decode:ident, |$v:ident| $arg:expr;)+) => {
        $(
            #[$doc]
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
            pub struct $codec;

            impl Codec for $codec {
                type Value = $ty;
            }

            impl<D> Transcode<D> for $codec {
                #[inline]
                fn encode(&self, transcoder: &dyn Transcoder<D>, $v: &$ty) -> Result<D> {
                    Ok(transcoder.$encode($arg))
                }

                #[inline]
                fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<$ty> {
                    transcoder.$decode(data)
                }
            }
        )+
    };
}

impl_primitive! {
    /// `bool`.
    Bool => bool, encode_bool, decode_bool, |v| *v;
    /// `u8`.
    Byte => u8, encode_byte, decode_byte, |v| *v;
    /// `i16`.
    Short => i16, encode_short, decode_short, |v| *v;
    /// `i32`.
    Int => i32, encode_int, decode_int, |v| *v;
    /// `i64`.
    Long => i64, encode_long, decode_long, |v| *v;
    /// `f32`.
    Float => f32, encode_float, decode_float, |v| *v;
    /// `f64`.
    Double => f64, encode_double, decode_double, |v| *v;
    /// UTF-8 [`String`].
    Str => String, encode_string, decode_string, |v| v;
    /// `Vec<u8>`, through the transcoder's byte array support.
    ByteArray => Vec<u8>, encode_byte_array, decode_byte_array, |v| v;
    /// `Vec<i32>`, through the transcoder's int array support.
    IntArray => Vec<i32>, encode_int_array, decode_int_array, |v| v;
    /// `Vec<i64>`, through the transcoder's long array support.
    LongArray => Vec<i64>, encode_long_array, decode_long_array, |v| v;
}

/// An [`Enumerant`] encoded as its name.
pub struct EnumCodec<E>(PhantomData<fn() -> E>);

impl<E> EnumCodec<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumCodec<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EnumCodec<E> {}

impl<E: Enumerant> Codec for EnumCodec<E> {
    type Value = E;
}

impl<D, E: Enumerant> Transcode<D> for EnumCodec<E> {
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &E) -> Result<D> {
        Ok(transcoder.encode_string(value.name()))
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<E> {
        let name = transcoder.decode_string(data)?;
        E::from_name(&name).ok_or_else(|| {
            invalid_value(format!(
                "unknown {} `{name}`",
                core::any::type_name::<E>()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            enumerant,
            error::Error,
            proptest_config::proptest_cfg,
            transcoder::value::{Value, ValueTranscoder},
        },
        proptest::prelude::*,
    };

    const TR: ValueTranscoder = ValueTranscoder;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    enumerant!(Level { Low, High });

    fn roundtrip<C: Transcode<Value>>(codec: C, value: C::Value) -> C::Value {
        let data = codec.encode(&TR, &value).unwrap();
        codec.decode(&TR, &data).unwrap()
    }

    #[test]
    fn enum_uses_names() {
        let codec = EnumCodec::<Level>::new();
        assert_eq!(
            codec.encode(&TR, &Level::High).unwrap(),
            Value::String("High".into())
        );
        assert_eq!(roundtrip(codec, Level::Low), Level::Low);
        assert!(matches!(
            codec.decode(&TR, &Value::String("Medium".into())),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn arrays() {
        assert_eq!(roundtrip(ByteArray, vec![0, 1, 255]), vec![0, 1, 255]);
        assert_eq!(roundtrip(IntArray, vec![i32::MIN, 0, i32::MAX]), vec![i32::MIN, 0, i32::MAX]);
        assert_eq!(roundtrip(LongArray, Vec::new()), Vec::<i64>::new());
    }

    #[test]
    fn strings() {
        for text in ["", "ascii", "grüße", "日本語"] {
            assert_eq!(roundtrip(Str, text.to_string()), text);
        }
    }

    #[test]
    fn non_finite_floats_keep_their_bits() {
        assert_eq!(roundtrip(Float, f32::INFINITY), f32::INFINITY);
        assert_eq!(roundtrip(Double, f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert_eq!(roundtrip(Double, f64::NAN).to_bits(), f64::NAN.to_bits());
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn primitives_roundtrip(
            b in any::<bool>(),
            byte in any::<u8>(),
            s in any::<i16>(),
            i in any::<i32>(),
            l in any::<i64>(),
            f in any::<f32>(),
            d in any::<f64>(),
        ) {
            prop_assert_eq!(roundtrip(Bool, b), b);
            prop_assert_eq!(roundtrip(Byte, byte), byte);
            prop_assert_eq!(roundtrip(Short, s), s);
            prop_assert_eq!(roundtrip(Int, i), i);
            prop_assert_eq!(roundtrip(Long, l), l);
            prop_assert_eq!(roundtrip(Float, f).to_bits(), f.to_bits());
            prop_assert_eq!(roundtrip(Double, d).to_bits(), d.to_bits());
        }
    }
}
