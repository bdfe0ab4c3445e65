//! Discriminated unions for both codec families.
//!
//! A union computes a discriminator from a value, stores it, and lets a factory
//! pick the codec for the rest of the value from the discriminator. Binary unions
//! write the discriminator before the payload. Struct unions store it as an entry
//! of the same map as the variant's own fields.
//!
//! A factory returning `None` fails with [`Error::UnionDispatchFailure`] on both
//! encode and decode, so a tampered or unknown discriminator never decodes as some
//! other variant.
//!
//! [`Variant`] adapts a codec for one Rust enum variant's payload into a codec for
//! the whole enum, which is what union factories usually return.
use {
    crate::{
        binary::{BinaryCodec, Exposes},
        codec::{Codec, MapCodec, Transcode},
        error::{missing_field, union_dispatch_failure, Error, Result},
        io::BinaryBuffer,
        transcoder::{MapBuilder, Transcoder, VirtualMap},
    },
    core::{fmt::Debug, marker::PhantomData},
    tracing::debug,
};

#[inline]
fn dispatch<K: Debug + ?Sized, C>(key: &K, codec: Option<C>) -> Result<C> {
    codec.ok_or_else(|| {
        debug!(?key, "no union variant for discriminator");
        union_dispatch_failure(key)
    })
}

/// Binary union: the discriminator, then the payload written by the variant codec.
pub struct Union<K, T, KeyFn, Factory> {
    keys: K,
    key_fn: KeyFn,
    factory: Factory,
    _exposes: Exposes<T>,
}

impl<K, T, KeyFn, Factory> Union<K, T, KeyFn, Factory> {
    pub const fn new(keys: K, key_fn: KeyFn, factory: Factory) -> Self {
        Self {
            keys,
            key_fn,
            factory,
            _exposes: PhantomData,
        }
    }
}

impl<K, T, KeyFn, Factory, C> BinaryCodec for Union<K, T, KeyFn, Factory>
where
    K: BinaryCodec,
    K::Value: Debug,
    KeyFn: Fn(&T) -> K::Value,
    Factory: Fn(&K::Value) -> Option<C>,
    C: BinaryCodec<Value = T>,
{
    type Value = T;

    fn write(&self, buffer: &mut BinaryBuffer, value: &T) -> Result<()> {
        let key = (self.key_fn)(value);
        let codec = dispatch(&key, (self.factory)(&key))?;
        self.keys.write(buffer, &key)?;
        codec.write(buffer, value)
    }

    fn read(&self, buffer: &mut BinaryBuffer) -> Result<T> {
        let key = self.keys.read(buffer)?;
        dispatch(&key, (self.factory)(&key))?.read(buffer)
    }
}

/// Struct union: the discriminator is stored under `key_field`, next to the fields
/// of the struct codec selected for it.
///
/// Variant struct codecs must not use `key_field` themselves.
pub struct StructUnion<K, T, KeyFn, Factory> {
    key_field: &'static str,
    keys: K,
    key_fn: KeyFn,
    factory: Factory,
    _exposes: Exposes<T>,
}

impl<K, T, KeyFn, Factory> StructUnion<K, T, KeyFn, Factory> {
    pub const fn new(key_field: &'static str, keys: K, key_fn: KeyFn, factory: Factory) -> Self {
        Self {
            key_field,
            keys,
            key_fn,
            factory,
            _exposes: PhantomData,
        }
    }

    pub fn key_field(&self) -> &'static str {
        self.key_field
    }
}

impl<K, T, KeyFn, Factory> Codec for StructUnion<K, T, KeyFn, Factory>
where
    K: Codec,
    KeyFn: Fn(&T) -> K::Value,
{
    type Value = T;
}

impl<D, K, T, KeyFn, Factory, C> MapCodec<D> for StructUnion<K, T, KeyFn, Factory>
where
    K: Transcode<D>,
    K::Value: Debug,
    KeyFn: Fn(&T) -> K::Value,
    Factory: Fn(&K::Value) -> Option<C>,
    C: MapCodec<D, Value = T>,
{
    fn encode_to_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &T,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        let key = (self.key_fn)(value);
        let codec = dispatch(&key, (self.factory)(&key))?;
        map.put(self.key_field, self.keys.encode(transcoder, &key)?);
        codec.encode_to_map(transcoder, value, map)
    }

    fn decode_from_map(&self, transcoder: &dyn Transcoder<D>, map: &dyn VirtualMap<D>) -> Result<T> {
        let data = map
            .get(self.key_field)
            .ok_or_else(|| missing_field(self.key_field))?;
        let key = self.keys.decode(transcoder, data)?;
        dispatch(&key, (self.factory)(&key))?.decode_from_map(transcoder, map)
    }
}

impl<D, K, T, KeyFn, Factory, C> Transcode<D> for StructUnion<K, T, KeyFn, Factory>
where
    K: Transcode<D>,
    K::Value: Debug,
    KeyFn: Fn(&T) -> K::Value,
    Factory: Fn(&K::Value) -> Option<C>,
    C: MapCodec<D, Value = T>,
{
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &T) -> Result<D> {
        let mut map = transcoder.encode_map();
        self.encode_to_map(transcoder, value, &mut *map)?;
        Ok(map.build())
    }

    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<T> {
        let map = transcoder.decode_map(data)?;
        self.decode_from_map(transcoder, &*map)
    }
}

/// A codec for the payload `C::Value` of one variant of `T`, lifted to `T`.
///
/// `up` wraps a payload into `T`, `down` borrows the payload back out and returns
/// `None` for any other variant. Encoding another variant fails with
/// [`Error::UnionDispatchFailure`].
pub struct Variant<C, T, Up, Down> {
    inner: C,
    up: Up,
    down: Down,
    _exposes: Exposes<T>,
}

impl<C, T, Up, Down> Variant<C, T, Up, Down> {
    pub const fn new(inner: C, up: Up, down: Down) -> Self {
        Self {
            inner,
            up,
            down,
            _exposes: PhantomData,
        }
    }
}

#[cold]
fn wrong_variant<T>() -> Error {
    union_dispatch_failure(core::any::type_name::<T>())
}

impl<C, T, Up, Down> BinaryCodec for Variant<C, T, Up, Down>
where
    C: BinaryCodec,
    Up: Fn(C::Value) -> T,
    Down: Fn(&T) -> Option<&C::Value>,
{
    type Value = T;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &T) -> Result<()> {
        let payload = (self.down)(value).ok_or_else(wrong_variant::<T>)?;
        self.inner.write(buffer, payload)
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<T> {
        self.inner.read(buffer).map(&self.up)
    }
}

impl<C, T, Up, Down> Codec for Variant<C, T, Up, Down>
where
    C: Codec,
    Up: Fn(C::Value) -> T,
    Down: Fn(&T) -> Option<&C::Value>,
{
    type Value = T;

    fn absent(&self) -> Option<T> {
        self.inner.absent().map(&self.up)
    }
}

impl<D, C, T, Up, Down> Transcode<D> for Variant<C, T, Up, Down>
where
    C: Transcode<D>,
    Up: Fn(C::Value) -> T,
    Down: Fn(&T) -> Option<&C::Value>,
{
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &T) -> Result<D> {
        let payload = (self.down)(value).ok_or_else(wrong_variant::<T>)?;
        self.inner.encode(transcoder, payload)
    }

    #[inline]
    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<T> {
        self.inner.decode(transcoder, data).map(&self.up)
    }
}

impl<D, C, T, Up, Down> MapCodec<D> for Variant<C, T, Up, Down>
where
    C: MapCodec<D>,
    Up: Fn(C::Value) -> T,
    Down: Fn(&T) -> Option<&C::Value>,
{
    #[inline]
    fn encode_to_map(
        &self,
        transcoder: &dyn Transcoder<D>,
        value: &T,
        map: &mut dyn MapBuilder<D>,
    ) -> Result<()> {
        let payload = (self.down)(value).ok_or_else(wrong_variant::<T>)?;
        self.inner.encode_to_map(transcoder, payload, map)
    }

    #[inline]
    fn decode_from_map(&self, transcoder: &dyn Transcoder<D>, map: &dyn VirtualMap<D>) -> Result<T> {
        self.inner.decode_from_map(transcoder, map).map(&self.up)
    }
}
