//! Format-agnostic codecs.
//!
//! A codec here never sees bytes. It drives a [`Transcoder`] to build or take
//! apart the transcoder's own data type `D`, so the same codec description can
//! target any format with a transcoder.
//!
//! The contract is split in two. [`Codec`] names the value type and carries the
//! combinators, [`Transcode<D>`] does the actual work against one data type `D`.
//!
//! # Example
//!
//! ```
//! use polycodec::{
//!     codec::{named, structure, Codec, Int, Str, Transcode},
//!     transcoder::value::{Value, ValueTranscoder},
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: i32,
//!     tags: Vec<String>,
//! }
//!
//! let codec = structure(
//!     (
//!         named("host", Str, |s: &Server| &s.host),
//!         named("port", Int.or_default(8080), |s: &Server| &s.port),
//!         named("tags", Str.list(), |s: &Server| &s.tags),
//!     ),
//!     |(host, port, tags)| Server { host, port, tags },
//! );
//!
//! let server = Server { host: "localhost".into(), port: 80, tags: vec![] };
//! let data: Value = codec.encode(&ValueTranscoder, &server).unwrap();
//! assert_eq!(codec.decode(&ValueTranscoder, &data).unwrap(), server);
//! ```
use {
    crate::{
        error::Result,
        transcoder::{MapBuilder, Transcoder, VirtualMap},
        union::{StructUnion, Variant},
    },
    core::marker::PhantomData,
    std::{hash::Hash, rc::Rc, sync::Arc},
};

mod containers;
mod primitives;
mod recursive;
mod structs;

pub use {
    containers::{List, Map, Optional, OrDefault, Transform},
    primitives::{Bool, Byte, ByteArray, Double, EnumCodec, Float, Int, IntArray, Long, LongArray, Short, Str},
    recursive::{forward_ref, recursive, ForwardRef, Recursive, RecursiveRef},
    structs::{
        inline, named, structure, FieldSet, Inline, MapCodec, Named, StructCodec, StructField,
        TranscodeField, TranscodeFields,
    },
};

/// A type-erased codec for the data type `D`, as returned by [`Codec::boxed`].
pub type BoxedCodec<D, T> = Box<dyn Transcode<D, Value = T> + Send + Sync>;

/// A type-erased struct codec for the data type `D`, as returned by [`Codec::boxed_map`].
pub type BoxedMapCodec<D, T> = Box<dyn MapCodec<D, Value = T> + Send + Sync>;

/// The value type of a codec, and the combinators that wrap it.
pub trait Codec {
    type Value;

    /// The value a struct field using this codec takes when its key is absent.
    ///
    /// `None` makes the field required.
    #[inline]
    fn absent(&self) -> Option<Self::Value> {
        None
    }

    /// Encode absence as null and read anything undecodable as `None`.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Substitute `default` for an absent or undecodable value.
    fn or_default(self, default: Self::Value) -> OrDefault<Self>
    where
        Self: Sized,
    {
        OrDefault::new(self, default)
    }

    /// Expose the stored value as `S`: encoding applies `from`, decoding applies `to`.
    fn transform<S, ToFn, FromFn>(self, to: ToFn, from: FromFn) -> Transform<Self, S, ToFn, FromFn>
    where
        Self: Sized,
        ToFn: Fn(Self::Value) -> S,
        FromFn: Fn(&S) -> Self::Value,
    {
        Transform::new(self, to, from)
    }

    fn list(self) -> List<Self>
    where
        Self: Sized,
    {
        List::new(self)
    }

    /// A map keyed by `self`'s values. Keys must encode to something the
    /// transcoder can read back as a string.
    fn map_to<V>(self, values: V) -> Map<Self, V>
    where
        Self: Sized,
        Self::Value: Hash + Eq,
        V: Codec,
    {
        Map::new(self, values)
    }

    /// Use `self` as the discriminator codec of a struct union, stored under `key_field`
    /// next to the variant's own fields.
    fn union<T, KeyFn, Factory>(
        self,
        key_field: &'static str,
        key_fn: KeyFn,
        factory: Factory,
    ) -> StructUnion<Self, T, KeyFn, Factory>
    where
        Self: Sized,
        KeyFn: Fn(&T) -> Self::Value,
    {
        StructUnion::new(key_field, self, key_fn, factory)
    }

    /// Lift a codec for one variant into a codec for the enclosing type `T`.
    fn variant<T, Up, Down>(self, up: Up, down: Down) -> Variant<Self, T, Up, Down>
    where
        Self: Sized,
        Up: Fn(Self::Value) -> T,
        Down: Fn(&T) -> Option<&Self::Value>,
    {
        Variant::new(self, up, down)
    }

    fn boxed<D>(self) -> BoxedCodec<D, Self::Value>
    where
        Self: Transcode<D> + Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }

    fn boxed_map<D>(self) -> BoxedMapCodec<D, Self::Value>
    where
        Self: MapCodec<D> + Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

/// Codecs that convert their value to and from the data type `D`.
pub trait Transcode<D>: Codec {
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &Self::Value) -> Result<D>;

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<Self::Value>;
}

macro_rules! impl_deref_codec {
    ($($ptr:ty),+) => {
        $(
            impl<C: Codec + ?Sized> Codec for $ptr {
                type Value = C::Value;

                #[inline(always)]
                fn absent(&self) -> Option<Self::Value> {
                    (**self).absent()
                }
            }

            impl<D, C: Transcode<D> + ?Sized> Transcode<D> for $ptr {
                #[inline(always)]
                fn encode(&self, transcoder: &dyn Transcoder<D>, value: &Self::Value) -> Result<D> {
                    (**self).encode(transcoder, value)
                }

                #[inline(always)]
                fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<Self::Value> {
                    (**self).decode(transcoder, data)
                }
            }

            impl<D, C: MapCodec<D> + ?Sized> MapCodec<D> for $ptr {
                #[inline(always)]
                fn encode_to_map(
                    &self,
                    transcoder: &dyn Transcoder<D>,
                    value: &Self::Value,
                    map: &mut dyn MapBuilder<D>,
                ) -> Result<()> {
                    (**self).encode_to_map(transcoder, value, map)
                }

                #[inline(always)]
                fn decode_from_map(
                    &self,
                    transcoder: &dyn Transcoder<D>,
                    map: &dyn VirtualMap<D>,
                ) -> Result<Self::Value> {
                    (**self).decode_from_map(transcoder, map)
                }
            }
        )+
    };
}

impl_deref_codec!(&C, Box<C>, Rc<C>, Arc<C>);

/// Marker for combinators whose exposed value type is not named by their codec.
pub(crate) type Exposes<S> = PhantomData<fn() -> S>;

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::Error,
            proptest_config::proptest_cfg,
            transcoder::value::{Value, ValueTranscoder},
        },
        indexmap::IndexMap,
        proptest::prelude::*,
    };

    const TR: ValueTranscoder = ValueTranscoder;

    fn roundtrip<C: Transcode<Value>>(codec: &C, value: &C::Value) -> C::Value {
        let data = codec.encode(&TR, value).unwrap();
        codec.decode(&TR, &data).unwrap()
    }

    #[test]
    fn optional_encodes_absence_as_null() {
        let codec = Int.optional();
        assert_eq!(codec.encode(&TR, &None).unwrap(), Value::Null);
        assert_eq!(codec.encode(&TR, &Some(3)).unwrap(), Value::Int(3));
        assert_eq!(roundtrip(&codec, &Some(3)), Some(3));
        assert_eq!(roundtrip(&codec, &None), None);
    }

    #[test]
    fn optional_reads_wrong_shape_as_absent() {
        let codec = Int.optional();
        assert_eq!(codec.decode(&TR, &Value::String("x".into())).unwrap(), None);
    }

    #[test]
    fn default_substitutes_on_failure() {
        let codec = Str.or_default("anon".to_string());
        assert_eq!(codec.decode(&TR, &Value::Int(1)).unwrap(), "anon");
        assert_eq!(codec.decode(&TR, &Value::String("x".into())).unwrap(), "x");
        assert_eq!(codec.absent(), Some("anon".to_string()));
    }

    #[test]
    fn required_codecs_have_no_absent_value() {
        assert_eq!(Int.absent(), None);
        assert_eq!(Int.list().absent(), None);
        assert_eq!(Int.optional().absent(), Some(None));
    }

    #[test]
    fn transform_roundtrip() {
        let codec = Long.transform(
            |millis: i64| core::time::Duration::from_millis(millis as u64),
            |d: &core::time::Duration| d.as_millis() as i64,
        );
        let data = codec.encode(&TR, &core::time::Duration::from_secs(2)).unwrap();
        assert_eq!(data, Value::Long(2000));
        assert_eq!(
            codec.decode(&TR, &data).unwrap(),
            core::time::Duration::from_secs(2)
        );
    }

    #[test]
    fn list_propagates_element_errors() {
        let codec = Int.list();
        let data = Value::List(vec![Value::Int(1), Value::String("2".into())]);
        assert!(matches!(
            codec.decode(&TR, &data),
            Err(Error::ShapeMismatch { expected: "int", .. })
        ));
        assert!(roundtrip(&codec, &Vec::new()).is_empty());
    }

    #[test]
    fn map_with_non_string_keys() {
        let codec = Int.map_to(Str);
        let map: IndexMap<i32, String> = [(1, "one".into()), (2, "two".into())].into();
        // Int keys only survive as strings if the transcoder can read them as such.
        assert!(codec.encode(&TR, &map).is_err());

        let codec = Str.map_to(Int.list());
        let map: IndexMap<String, Vec<i32>> =
            [("a".into(), vec![1, 2]), ("b".into(), vec![])].into();
        assert_eq!(roundtrip(&codec, &map), map);
    }

    #[test]
    fn boxed_codecs_share_a_type() {
        let codecs: Vec<BoxedCodec<Value, i32>> = vec![Int.boxed(), Int.or_default(0).boxed()];
        for codec in &codecs {
            assert_eq!(roundtrip(codec, &5), 5);
        }
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn nested_containers_roundtrip(
            value in proptest::collection::vec(proptest::option::of(any::<i64>()), 0..16),
        ) {
            let codec = Long.optional().list();
            prop_assert_eq!(roundtrip(&codec, &value), value);
        }

        #[test]
        fn string_map_roundtrip(
            entries in proptest::collection::vec((any::<String>(), any::<bool>()), 0..16),
        ) {
            let map: IndexMap<String, bool> = entries.into_iter().collect();
            let codec = Str.map_to(Bool);
            prop_assert_eq!(roundtrip(&codec, &map), map);
        }
    }
}
