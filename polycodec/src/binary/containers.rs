//! Binary combinators wrapping other codecs: presence, defaults, transforms,
//! sequences, maps and enumerations.
use {
    super::{BinaryCodec, Exposes, VarInt},
    crate::{
        enumerant::Enumerant,
        error::{invalid_ordinal, Error, Result},
        io::BinaryBuffer,
        len::{SeqLen, VarIntLen},
    },
    core::{hash::Hash, marker::PhantomData},
    indexmap::IndexMap,
    tracing::debug,
};

/// An [`Option`] written as a boolean presence flag followed by the value iff present.
#[derive(Clone, Copy, Debug, Default)]
pub struct Optional<C> {
    inner: C,
}

impl<C> Optional<C> {
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: BinaryCodec> BinaryCodec for Optional<C> {
    type Value = Option<C::Value>;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &Self::Value) -> Result<()> {
        buffer.write_boolean(value.is_some());
        if let Some(value) = value {
            self.inner.write(buffer, value)?;
        }
        Ok(())
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Self::Value> {
        if buffer.read_boolean()? {
            self.inner.read(buffer).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// A value with a fallback.
///
/// No presence marker is written. On read, if the message ends before the value is
/// complete, the read cursor is rewound to where the value started and the default
/// is returned. Any other read error means the data is corrupt and is propagated.
pub struct OrDefault<C: BinaryCodec> {
    inner: C,
    default: C::Value,
}

impl<C: BinaryCodec> OrDefault<C> {
    pub const fn new(inner: C, default: C::Value) -> Self {
        Self { inner, default }
    }

    pub fn default_value(&self) -> &C::Value {
        &self.default
    }
}

impl<C> BinaryCodec for OrDefault<C>
where
    C: BinaryCodec,
    C::Value: Clone,
{
    type Value = C::Value;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &Self::Value) -> Result<()> {
        self.inner.write(buffer, value)
    }

    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Self::Value> {
        let start = buffer.reader_index();
        match self.inner.read(buffer) {
            Err(error @ Error::EndOfData { .. }) => {
                debug!(%error, offset = start, "substituting default value");
                buffer.set_reader_index(start);
                Ok(self.default.clone())
            }
            result => result,
        }
    }
}

/// Maps a stored representation `C::Value` to an exposed type `S`.
///
/// `to` and `from` must be total and inverse-consistent.
pub struct Transform<C, S, ToFn, FromFn> {
    inner: C,
    to: ToFn,
    from: FromFn,
    _exposes: Exposes<S>,
}

impl<C, S, ToFn, FromFn> Transform<C, S, ToFn, FromFn>
where
    C: BinaryCodec,
    ToFn: Fn(C::Value) -> S,
    FromFn: Fn(&S) -> C::Value,
{
    pub const fn new(inner: C, to: ToFn, from: FromFn) -> Self {
        Self {
            inner,
            to,
            from,
            _exposes: PhantomData,
        }
    }
}

impl<C, S, ToFn, FromFn> BinaryCodec for Transform<C, S, ToFn, FromFn>
where
    C: BinaryCodec,
    ToFn: Fn(C::Value) -> S,
    FromFn: Fn(&S) -> C::Value,
{
    type Value = S;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &S) -> Result<()> {
        self.inner.write(buffer, &(self.from)(value))
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<S> {
        self.inner.read(buffer).map(&self.to)
    }
}

/// A [`Vec`] with a customizable length encoding.
#[derive(Clone, Copy, Debug)]
pub struct List<C, L = VarIntLen> {
    inner: C,
    _len: PhantomData<L>,
}

impl<C> List<C> {
    pub const fn new(inner: C) -> Self {
        Self::with_len(inner)
    }
}

impl<C, L> List<C, L> {
    pub const fn with_len(inner: C) -> Self {
        Self {
            inner,
            _len: PhantomData,
        }
    }
}

impl<C: BinaryCodec, L: SeqLen> BinaryCodec for List<C, L> {
    type Value = Vec<C::Value>;

    fn write(&self, buffer: &mut BinaryBuffer, value: &Self::Value) -> Result<()> {
        L::write_len(buffer, value.len())?;
        for item in value {
            self.inner.write(buffer, item)?;
        }
        Ok(())
    }

    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Self::Value> {
        let len = L::read_len_cautious::<C::Value>(buffer)?;
        let mut items = Vec::with_capacity(len.min(buffer.remaining()));
        for _ in 0..len {
            items.push(self.inner.read(buffer)?);
        }
        Ok(items)
    }
}

/// An insertion-ordered map written as a length followed by `(key, value)` pairs.
///
/// On read, a duplicated key keeps its first position and its last value.
#[derive(Clone, Copy, Debug)]
pub struct Map<K, V, L = VarIntLen> {
    keys: K,
    values: V,
    _len: PhantomData<L>,
}

impl<K, V> Map<K, V> {
    pub const fn new(keys: K, values: V) -> Self {
        Self::with_len(keys, values)
    }
}

impl<K, V, L> Map<K, V, L> {
    pub const fn with_len(keys: K, values: V) -> Self {
        Self {
            keys,
            values,
            _len: PhantomData,
        }
    }
}

impl<K, V, L> BinaryCodec for Map<K, V, L>
where
    K: BinaryCodec,
    K::Value: Hash + Eq,
    V: BinaryCodec,
    L: SeqLen,
{
    type Value = IndexMap<K::Value, V::Value>;

    fn write(&self, buffer: &mut BinaryBuffer, value: &Self::Value) -> Result<()> {
        L::write_len(buffer, value.len())?;
        for (k, v) in value {
            self.keys.write(buffer, k)?;
            self.values.write(buffer, v)?;
        }
        Ok(())
    }

    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Self::Value> {
        let len = L::read_len_cautious::<(K::Value, V::Value)>(buffer)?;
        let mut map = IndexMap::with_capacity(len.min(buffer.remaining()));
        for _ in 0..len {
            let key = self.keys.read(buffer)?;
            let value = self.values.read(buffer)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// An [`Enumerant`] written as the [`VarInt`] of its zero-based declaration index.
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

impl<E: Enumerant> BinaryCodec for EnumCodec<E> {
    type Value = E;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &E) -> Result<()> {
        let count = E::VARIANTS.len();
        let ordinal = value
            .ordinal()
            .and_then(|ordinal| i32::try_from(ordinal).ok())
            .ok_or_else(|| invalid_ordinal(-1, count))?;
        VarInt.write(buffer, &ordinal)
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<E> {
        let ordinal = VarInt.read(buffer)?;
        usize::try_from(ordinal)
            .ok()
            .and_then(E::from_ordinal)
            .ok_or_else(|| invalid_ordinal(ordinal.into(), E::VARIANTS.len()))
    }
}
