//! Binary codecs: typed read/write against a [`BinaryBuffer`].
//!
//! Codecs are plain values. Primitive codecs are unit structs, and combinators wrap
//! other codecs without mutating them, so a composed codec can live in a `static`
//! and be shared across threads.
//!
//! # Example
//!
//! ```
//! use polycodec::binary::{field, product, BinaryCodec, Int, Str};
//!
//! #[derive(Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     nicknames: Vec<String>,
//! }
//!
//! let codec = product(
//!     (
//!         field(Str::new(), |p: &Person| &p.name),
//!         field(Int, |p: &Person| &p.age),
//!         field(Str::new().list(), |p: &Person| &p.nicknames),
//!     ),
//!     |(name, age, nicknames)| Person { name, age, nicknames },
//! );
//!
//! let person = Person { name: "Ada".into(), age: 36, nicknames: vec!["countess".into()] };
//! let bytes = codec.serialize(&person).unwrap();
//! assert_eq!(codec.deserialize(&bytes).unwrap(), person);
//! ```
use {
    crate::{error::Result, io::BinaryBuffer, len::VarIntLen},
    core::marker::PhantomData,
    std::{hash::Hash, rc::Rc, sync::Arc},
};

mod containers;
mod primitives;
mod product;
mod recursive;

pub use {
    crate::union::{Union, Variant},
    containers::{EnumCodec, List, Map, Optional, OrDefault, Transform},
    primitives::{Boolean, Buffer, Byte, Bytes, Double, Float, Int, Long, RawBytes, Short, Str, VarInt},
    product::{field, product, Field, Fields, Product},
    recursive::{recursive, Recursive, RecursiveRef},
};

/// A type-erased binary codec, as returned by [`BinaryCodec::boxed`].
pub type BoxedCodec<T> = Box<dyn BinaryCodec<Value = T> + Send + Sync>;

/// Codecs that can write a value to, and read it back from, a [`BinaryBuffer`].
///
/// Every composite codec reads by reversing its own write steps in the same order.
pub trait BinaryCodec {
    type Value;

    /// Write `value` at the buffer's write cursor.
    fn write(&self, buffer: &mut BinaryBuffer, value: &Self::Value) -> Result<()>;

    /// Read a value at the buffer's read cursor.
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<Self::Value>;

    /// Write `value` into a fresh byte vector.
    fn serialize(&self, value: &Self::Value) -> Result<Vec<u8>> {
        let mut buffer = BinaryBuffer::new();
        self.write(&mut buffer, value)?;
        Ok(buffer.into_vec())
    }

    /// Read a value from the start of `bytes`. Trailing bytes are ignored.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Value> {
        self.read(&mut BinaryBuffer::from_bytes(bytes))
    }

    /// Prefix the value with a presence flag, reading absence as `None`.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Substitute `default` when the value cannot be read.
    fn or_default(self, default: Self::Value) -> OrDefault<Self>
    where
        Self: Sized,
    {
        OrDefault::new(self, default)
    }

    /// Expose the stored value as `S`: writes apply `from`, reads apply `to`.
    fn transform<S, ToFn, FromFn>(self, to: ToFn, from: FromFn) -> Transform<Self, S, ToFn, FromFn>
    where
        Self: Sized,
        ToFn: Fn(Self::Value) -> S,
        FromFn: Fn(&S) -> Self::Value,
    {
        Transform::new(self, to, from)
    }

    /// A [`VarInt`]-prefixed list of values.
    fn list(self) -> List<Self, VarIntLen>
    where
        Self: Sized,
    {
        List::new(self)
    }

    /// A [`VarInt`]-prefixed map using `self` for keys and `values` for values.
    fn map_to<V>(self, values: V) -> Map<Self, V, VarIntLen>
    where
        Self: Sized,
        Self::Value: Hash + Eq,
        V: BinaryCodec,
    {
        Map::new(self, values)
    }

    /// Use `self` as the discriminator codec of a union over `T`.
    ///
    /// `key_fn` computes the discriminator of a value, `factory` resolves the
    /// discriminator to the codec for that variant.
    fn union<T, KeyFn, Factory, C>(self, key_fn: KeyFn, factory: Factory) -> Union<Self, T, KeyFn, Factory>
    where
        Self: Sized,
        KeyFn: Fn(&T) -> Self::Value,
        Factory: Fn(&Self::Value) -> Option<C>,
        C: BinaryCodec<Value = T>,
    {
        Union::new(self, key_fn, factory)
    }

    /// Lift a codec for one variant `V` into a codec for the enclosing type `T`.
    ///
    /// Writing a `T` that `down` does not recognize fails with
    /// [`Error::UnionDispatchFailure`](crate::Error::UnionDispatchFailure).
    fn variant<T, Up, Down>(self, up: Up, down: Down) -> Variant<Self, T, Up, Down>
    where
        Self: Sized,
        Up: Fn(Self::Value) -> T,
        Down: Fn(&T) -> Option<&Self::Value>,
    {
        Variant::new(self, up, down)
    }

    /// Erase the codec's type.
    fn boxed(self) -> BoxedCodec<Self::Value>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

macro_rules! impl_deref_codec {
    ($($ptr:ty),+) => {
        $(
            impl<C: BinaryCodec + ?Sized> BinaryCodec for $ptr {
                type Value = C::Value;

                #[inline(always)]
                fn write(&self, buffer: &mut BinaryBuffer, value: &Self::Value) -> Result<()> {
                    (**self).write(buffer, value)
                }

                #[inline(always)]
                fn read(&self, buffer: &mut BinaryBuffer) -> Result<Self::Value> {
                    (**self).read(buffer)
                }
            }
        )+
    };
}

impl_deref_codec!(&C, Box<C>, Rc<C>, Arc<C>);

/// Marker for combinators whose exposed value type is not named by their codec.
pub(crate) type Exposes<S> = PhantomData<fn() -> S>;
