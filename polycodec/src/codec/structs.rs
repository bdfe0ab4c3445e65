//! Struct codecs: compound values as string-keyed maps.
//!
//! A struct codec is a tuple of field descriptors plus a constructor. A [`Named`]
//! field is stored under its own key. An [`Inline`] field is itself a struct codec
//! whose entries are merged into the enclosing map instead of being nested.
//!
//! Fields are encoded in declaration order. On decode they are looked up by key, so
//! the order of entries in the data does not matter. A missing key decodes to the
//! field codec's [`absent`](Codec::absent) value if it has one (optional and
//! defaulted codecs do), and fails with [`Error::MissingField`](crate::Error::MissingField)
//! otherwise.
use {
    super::{Codec, Exposes, Transcode},
    crate::{
        error::{missing_field, Result},
        transcoder::{MapBuilder, Transcoder, VirtualMap},
    },
    core::marker::PhantomData,
};

/// Codecs that read and write their value as entries of an enclosing map.
pub trait MapCodec<D>: Transcode<D> {
    /// Put the entries for `value` into `map`.
    fn encode_to_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &Self::Value,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()>;

    /// Assemble a value from the entries of `map`, ignoring keys it does not know.
    fn decode_from_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<Self::Value>;
}

/// One field descriptor of a struct over `R`.
pub trait StructField<R> {
    type Value;
}

/// A [`StructField`] that can be read from and written to a map of `D`.
pub trait TranscodeField<D, R>: StructField<R> {
    fn encode_field(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &R,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()>;

    fn decode_field(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<Self::Value>;
}

/// A field stored under its own key.
#[derive(Clone, Copy)]
pub struct Named<C, G> {
    name: &'static str,
    codec: C,
    getter: G,
}

/// A field stored under `name`, encoded with `codec`, read out of an `R` by `getter`.
#[inline]
pub fn named<R, C, G>(name: &'static str, codec: C, getter: G) -> Named<C, G>
where
    C: Codec,
    G: Fn(&R) -> &C::Value,
{
    Named {
        name,
        codec,
        getter,
    }
}

impl<R, C, G> StructField<R> for Named<C, G>
where
    C: Codec,
    G: Fn(&R) -> &C::Value,
{
    type Value = C::Value;
}

impl<D, R, C, G> TranscodeField<D, R> for Named<C, G>
where
    C: Transcode<D>,
    G: Fn(&R) -> &C::Value,
{
    #[inline]
    fn encode_field(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &R,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        let data = self.codec.encode(transcoder, (self.getter)(value))?;
        map.put(self.name, data);
        Ok(())
    }

    fn decode_field(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<C::Value> {
        match map.get(self.name) {
            Some(data) => self.codec.decode(transcoder, data),
            None => self
                .codec
                .absent()
                .ok_or_else(|| missing_field(self.name)),
        }
    }
}

/// A field whose own entries are flattened into the enclosing map.
#[derive(Clone, Copy)]
pub struct Inline<C, G> {
    codec: C,
    getter: G,
}

/// A field flattened into the enclosing map by the struct codec `codec`.
///
/// Wrap `codec` in [`optional`](Codec::optional) or [`or_default`](Codec::or_default)
/// to tolerate the inlined entries being absent.
#[inline]
pub fn inline<R, C, G>(codec: C, getter: G) -> Inline<C, G>
where
    C: Codec,
    G: Fn(&R) -> &C::Value,
{
    Inline { codec, getter }
}

impl<R, C, G> StructField<R> for Inline<C, G>
where
    C: Codec,
    G: Fn(&R) -> &C::Value,
{
    type Value = C::Value;
}

impl<D, R, C, G> TranscodeField<D, R> for Inline<C, G>
where
    C: MapCodec<D>,
    G: Fn(&R) -> &C::Value,
{
    #[inline]
    fn encode_field(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &R,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        self.codec
            .encode_to_map(transcoder, (self.getter)(value), map)
    }

    #[inline]
    fn decode_field(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<C::Value> {
        self.codec.decode_from_map(transcoder, map)
    }
}

/// A tuple of [`StructField`]s over the same struct type `R`.
pub trait FieldSet<R> {
    /// The decoded field values, in declaration order.
    type Values;
}

/// A [`FieldSet`] that can be read from and written to a map of `D`.
pub trait TranscodeFields<D, R>: FieldSet<R> {
    fn encode_fields(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &R,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()>;

    fn decode_fields(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<Self::Values>;
}

macro_rules! impl_field_set {
    ($($F:ident $idx:tt),*) => {
        impl<R, $($F: StructField<R>),*> FieldSet<R> for ($($F,)*) {
            type Values = ($($F::Value,)*);
        }

        impl<D, R, $($F: TranscodeField<D, R>),*> TranscodeFields<D, R> for ($($F,)*) {
            #[inline]
            #[allow(unused_variables)]
            fn encode_fields(
                &self,
                transcoder: &dyn Transcoder<D>,
                value: &R,
                map: &mut dyn MapBuilder<D>,
            ) -> Result<()> {
                $(self.$idx.encode_field(transcoder, value, map)?;)*
                Ok(())
            }

            #[inline]
            #[allow(unused_variables, clippy::unused_unit)]
            fn decode_fields(
                &self,
                transcoder: &dyn Transcoder<D>,
                map: &dyn VirtualMap<D>,
            ) -> Result<Self::Values> {
                Ok(($(self.$idx.decode_field(transcoder, map)?,)*))
            }
        }
    };
}

impl_field_set!();
impl_field_set!(F0 0);
impl_field_set!(F0 0, F1 1);
impl_field_set!(F0 0, F1 1, F2 2);
impl_field_set!(F0 0, F1 1, F2 2, F3 3);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9, F10 10);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9, F10 10, F11 11);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9, F10 10, F11 11, F12 12);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9, F10 10, F11 11, F12 12, F13 13);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9, F10 10, F11 11, F12 12, F13 13, F14 14);
impl_field_set!(F0 0, F1 1, F2 2, F3 3, F4 4, F5 5, F6 6, F7 7, F8 8, F9 9, F10 10, F11 11, F12 12, F13 13, F14 14, F15 15);

/// Codec for `R` assembled from named and inline fields.
pub struct StructCodec<F, Ctor, R> {
    fields: F,
    construct: Ctor,
    _exposes: Exposes<R>,
}

/// Build a struct codec for `R` from a tuple of [`named`] and [`inline`] fields and a
/// constructor taking the decoded values as a tuple.
#[inline]
pub fn structure<R, F, Ctor>(fields: F, construct: Ctor) -> StructCodec<F, Ctor, R>
where
    F: FieldSet<R>,
    Ctor: Fn(F::Values) -> R,
{
    StructCodec {
        fields,
        construct,
        _exposes: PhantomData,
    }
}

impl<R, F, Ctor> Codec for StructCodec<F, Ctor, R>
where
    F: FieldSet<R>,
    Ctor: Fn(F::Values) -> R,
{
    type Value = R;
}

impl<D, R, F, Ctor> Transcode<D> for StructCodec<F, Ctor, R>
where
    F: TranscodeFields<D, R>,
    Ctor: Fn(F::Values) -> R,
{
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &R) -> Result<D> {
        let mut map = transcoder.encode_map();
        self.fields.encode_fields(transcoder, value, &mut *map)?;
        Ok(map.build())
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<R> {
        let map = transcoder.decode_map(data)?;
        self.decode_from_map(transcoder, &*map)
    }
}

impl<D, R, F, Ctor> MapCodec<D> for StructCodec<F, Ctor, R>
where
    F: TranscodeFields<D, R>,
    Ctor: Fn(F::Values) -> R,
{
    #[inline]
    fn encode_to_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &R,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        self.fields.encode_fields(transcoder, value, map)
    }

    #[inline]
    fn decode_from_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<R> {
        self.fields
            .decode_fields(transcoder, map)
            .map(&self.construct)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            codec::{Int, Long, Str},
            error::Error,
            proptest_config::proptest_cfg,
            transcoder::value::{Value, ValueTranscoder},
        },
        indexmap::IndexMap,
        proptest::prelude::*,
    };

    const TR: ValueTranscoder = ValueTranscoder;

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        id: i64,
        owner: String,
        nickname: Option<String>,
        limit: i32,
    }

    fn account_codec() -> impl MapCodec<Value, Value = Account> {
        structure(
            (
                named("id", Long, |a: &Account| &a.id),
                named("owner", Str, |a: &Account| &a.owner),
                named("nickname", Str.optional(), |a: &Account| &a.nickname),
                named("limit", Int.or_default(100), |a: &Account| &a.limit),
            ),
            |(id, owner, nickname, limit)| Account {
                id,
                owner,
                nickname,
                limit,
            },
        )
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<IndexMap<_, _>>(),
        )
    }

    #[test]
    fn encodes_fields_in_declaration_order() {
        let account = Account {
            id: 7,
            owner: "ada".into(),
            nickname: None,
            limit: 5,
        };
        let data = account_codec().encode(&TR, &account).unwrap();
        assert_eq!(
            data,
            map(&[
                ("id", Value::Long(7)),
                ("owner", Value::String("ada".into())),
                ("nickname", Value::Null),
                ("limit", Value::Int(5)),
            ])
        );
    }

    #[test]
    fn decodes_fields_in_any_order() {
        let data = map(&[
            ("limit", Value::Int(1)),
            ("owner", Value::String("bob".into())),
            ("id", Value::Long(2)),
            ("unknown", Value::Bool(true)),
        ]);
        assert_eq!(
            account_codec().decode(&TR, &data).unwrap(),
            Account {
                id: 2,
                owner: "bob".into(),
                nickname: None,
                limit: 1,
            }
        );
    }

    #[test]
    fn missing_optional_and_default_fields() {
        let data = map(&[("id", Value::Long(3)), ("owner", Value::String("c".into()))]);
        let account = account_codec().decode(&TR, &data).unwrap();
        assert_eq!(account.nickname, None);
        assert_eq!(account.limit, 100);
    }

    #[test]
    fn malformed_default_field_falls_back() {
        let data = map(&[
            ("id", Value::Long(3)),
            ("owner", Value::String("c".into())),
            ("nickname", Value::Int(9)),
            ("limit", Value::String("lots".into())),
        ]);
        let account = account_codec().decode(&TR, &data).unwrap();
        assert_eq!(account.nickname, None);
        assert_eq!(account.limit, 100);
    }

    #[test]
    fn missing_required_field() {
        let data = map(&[("id", Value::Long(3))]);
        assert_eq!(
            account_codec().decode(&TR, &data),
            Err(Error::MissingField("owner".into()))
        );
    }

    #[test]
    fn malformed_required_field_propagates() {
        let data = map(&[("id", Value::String("3".into())), ("owner", Value::Null)]);
        assert!(matches!(
            account_codec().decode(&TR, &data),
            Err(Error::ShapeMismatch { expected: "long", .. })
        ));
        assert!(account_codec().decode(&TR, &Value::List(vec![])).is_err());
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Audited {
        account: Account,
        revision: i32,
    }

    #[test]
    fn inline_fields_are_flattened() {
        let codec = structure(
            (
                inline(account_codec(), |a: &Audited| &a.account),
                named("revision", Int, |a: &Audited| &a.revision),
            ),
            |(account, revision)| Audited { account, revision },
        );
        let audited = Audited {
            account: Account {
                id: 1,
                owner: "o".into(),
                nickname: Some("n".into()),
                limit: 2,
            },
            revision: 4,
        };
        let data = codec.encode(&TR, &audited).unwrap();
        let keys: Vec<_> = data.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["id", "owner", "nickname", "limit", "revision"]);
        assert_eq!(codec.decode(&TR, &data).unwrap(), audited);
    }

    #[test]
    fn optional_inline_contributes_nothing_when_absent() {
        #[derive(Debug, PartialEq)]
        struct Wrapper {
            account: Option<Account>,
            tag: String,
        }
        let codec = structure(
            (
                inline(account_codec().optional(), |w: &Wrapper| &w.account),
                named("tag", Str, |w: &Wrapper| &w.tag),
            ),
            |(account, tag)| Wrapper { account, tag },
        );
        let wrapper = Wrapper {
            account: None,
            tag: "t".into(),
        };
        let data = codec.encode(&TR, &wrapper).unwrap();
        assert_eq!(data, map(&[("tag", Value::String("t".into()))]));
        assert_eq!(codec.decode(&TR, &data).unwrap(), wrapper);
    }

    #[test]
    fn empty_struct() {
        #[derive(Debug, PartialEq)]
        struct Marker;
        let codec = structure((), |()| Marker);
        let data = codec.encode(&TR, &Marker).unwrap();
        assert_eq!(data, Value::Map(IndexMap::new()));
        assert_eq!(codec.decode(&TR, &data).unwrap(), Marker);
    }

    fn strat_account() -> impl Strategy<Value = Account> {
        (
            any::<i64>(),
            any::<String>(),
            proptest::option::of(any::<String>()),
            any::<i32>(),
        )
            .prop_map(|(id, owner, nickname, limit)| Account {
                id,
                owner,
                nickname,
                limit,
            })
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn struct_roundtrip(account in strat_account()) {
            let codec = account_codec();
            let data = codec.encode(&TR, &account).unwrap();
            prop_assert_eq!(codec.decode(&TR, &data).unwrap(), account);
        }
    }
}
