//! Format-agnostic combinators wrapping other codecs.
use {
    super::{Codec, Exposes, MapCodec, Transcode},
    crate::{
        error::{Error, Result},
        transcoder::{MapBuilder, Transcoder, VirtualMap},
    },
    core::{hash::Hash, marker::PhantomData},
    indexmap::IndexMap,
    tracing::debug,
};

/// An [`Option`] encoded as null when absent.
///
/// Decoding never fails: anything the inner codec cannot decode, including null,
/// reads as `None`. As a struct field, a missing key also reads as `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Optional<C> {
    inner: C,
}

impl<C> Optional<C> {
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Codec> Codec for Optional<C> {
    type Value = Option<C::Value>;

    #[inline]
    fn absent(&self) -> Option<Self::Value> {
        Some(None)
    }
}

impl<D, C: Transcode<D>> Transcode<D> for Optional<C> {
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &Self::Value) -> Result<D> {
        match value {
            Some(value) => self.inner.encode(transcoder, value),
            None => Ok(transcoder.encode_null()),
        }
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<Self::Value> {
        match self.inner.decode(transcoder, data) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                debug!(%error, "reading undecodable optional value as absent");
                Ok(None)
            }
        }
    }
}

/// Inlined, an absent value contributes no fields and a failing inner struct
/// reads as `None`.
impl<D, C: MapCodec<D>> MapCodec<D> for Optional<C> {
    fn encode_to_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &Self::Value,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        match value {
            Some(value) => self.inner.encode_to_map(transcoder, value, map),
            None => Ok(()),
        }
    }

    fn decode_from_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<Self::Value> {
        match self.inner.decode_from_map(transcoder, map) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                debug!(%error, "reading undecodable inline struct as absent");
                Ok(None)
            }
        }
    }
}

/// A value with a fallback, used when the value is missing or cannot be decoded.
pub struct OrDefault<C: Codec> {
    inner: C,
    default: C::Value,
}

impl<C: Codec> OrDefault<C> {
    pub const fn new(inner: C, default: C::Value) -> Self {
        Self { inner, default }
    }

    fn fallback(&self, error: &Error) -> C::Value
    where
        C::Value: Clone,
    {
        debug!(%error, "substituting default value");
        self.default.clone()
    }
}

impl<C> Codec for OrDefault<C>
where
    C: Codec,
    C::Value: Clone,
{
    type Value = C::Value;

    #[inline]
    fn absent(&self) -> Option<Self::Value> {
        Some(self.default.clone())
    }
}

impl<D, C> Transcode<D> for OrDefault<C>
where
    C: Transcode<D>,
    C::Value: Clone,
{
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &Self::Value) -> Result<D> {
        self.inner.encode(transcoder, value)
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<Self::Value> {
        Ok(self
            .inner
            .decode(transcoder, data)
            .unwrap_or_else(|error| self.fallback(&error)))
    }
}

impl<D, C> MapCodec<D> for OrDefault<C>
where
    C: MapCodec<D>,
    C::Value: Clone,
{
    #[inline]
    fn encode_to_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &Self::Value,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        self.inner.encode_to_map(transcoder, value, map)
    }

    fn decode_from_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        map: &dyn VirtualMap<D>,
    ) -> Result<Self::Value> {
        Ok(self
            .inner
            .decode_from_map(transcoder, map)
            .unwrap_or_else(|error| self.fallback(&error)))
    }
}

/// Maps a stored representation `C::Value` to an exposed type `S`.
pub struct Transform<C, S, ToFn, FromFn> {
    inner: C,
    to: ToFn,
    from: FromFn,
    _exposes: Exposes<S>,
}

impl<C, S, ToFn, FromFn> Transform<C, S, ToFn, FromFn> {
    pub const fn new(inner: C, to: ToFn, from: FromFn) -> Self {
        Self {
            inner,
            to,
            from,
            _exposes: PhantomData,
        }
    }
}

impl<C, S, ToFn, FromFn> Codec for Transform<C, S, ToFn, FromFn>
where
    C: Codec,
    ToFn: Fn(C::Value) -> S,
    FromFn: Fn(&S) -> C::Value,
{
    type Value = S;

    #[inline]
    fn absent(&self) -> Option<S> {
        self.inner.absent().map(&self.to)
    }
}

impl<D, C, S, ToFn, FromFn> Transcode<D> for Transform<C, S, ToFn, FromFn>
where
    C: Transcode<D>,
    ToFn: Fn(C::Value) -> S,
    FromFn: Fn(&S) -> C::Value,
{
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &S) -> Result<D> {
        self.inner.encode(transcoder, &(self.from)(value))
    }

    #[inline]
    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<S> {
        self.inner.decode(transcoder, data).map(&self.to)
    }
}

/// A [`Vec`] encoded through the transcoder's list builder.
#[derive(Clone, Copy, Debug, Default)]
pub struct List<C> {
    inner: C,
}

impl<C> List<C> {
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Codec> Codec for List<C> {
    type Value = Vec<C::Value>;
}

impl<D, C: Transcode<D>> Transcode<D> for List<C> {
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &Self::Value) -> Result<D> {
        let mut list = transcoder.encode_list(value.len());
        for element in value {
            list.push(self.inner.encode(transcoder, element)?);
        }
        Ok(list.build())
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<Self::Value> {
        transcoder
            .decode_list(data)?
            .into_iter()
            .map(|element| self.inner.decode(transcoder, element))
            .collect()
    }
}

/// An insertion-ordered map encoded through the transcoder's map builder.
///
/// Every key is encoded with the key codec and then read back as a string, so key
/// codecs must produce something the transcoder can decode as a string. On decode,
/// each string key is re-encoded and decoded with the key codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct Map<K, V> {
    keys: K,
    values: V,
}

impl<K, V> Map<K, V> {
    pub const fn new(keys: K, values: V) -> Self {
        Self { keys, values }
    }
}

impl<K, V> Codec for Map<K, V>
where
    K: Codec,
    K::Value: Hash + Eq,
    V: Codec,
{
    type Value = IndexMap<K::Value, V::Value>;
}

impl<D, K, V> Transcode<D> for Map<K, V>
where
    K: Transcode<D>,
    K::Value: Hash + Eq,
    V: Transcode<D>,
{
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &Self::Value) -> Result<D> {
        let mut map = transcoder.encode_map();
        for (key, value) in value {
            let key = transcoder.decode_string(&self.keys.encode(transcoder, key)?)?;
            map.put(&key, self.values.encode(transcoder, value)?);
        }
        Ok(map.build())
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<Self::Value> {
        let map = transcoder.decode_map(data)?;
        let keys = map.keys();
        let mut decoded = IndexMap::with_capacity(keys.len());
        for key in keys {
            let Some(value) = map.get(key) else {
                continue;
            };
            let key_data = transcoder.encode_string(key);
            decoded.insert(
                self.keys.decode(transcoder, &key_data)?,
                self.values.decode(transcoder, value)?,
            );
        }
        Ok(decoded)
    }
}
