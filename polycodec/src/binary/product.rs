//! Positional struct assembly for binary codecs.
//!
//! A [`Product`] is a tuple of [`Field`]s plus a constructor. Each field pairs a
//! codec with a getter borrowing that field out of the assembled value. Fields are
//! written in tuple order and read back in the same order, and the constructor
//! receives the decoded values as a tuple.
use {
    super::{BinaryCodec, Exposes},
    crate::{error::Result, io::BinaryBuffer},
    core::marker::PhantomData,
};

/// One positional field of a [`Product`].
#[derive(Clone, Copy)]
pub struct Field<C, G> {
    codec: C,
    getter: G,
}

/// Pair `codec` with the getter that borrows its value out of an `R`.
#[inline]
pub fn field<R, C, G>(codec: C, getter: G) -> Field<C, G>
where
    C: BinaryCodec,
    G: Fn(&R) -> &C::Value,
{
    Field { codec, getter }
}

/// A tuple of [`Field`]s over the same assembled type `R`.
pub trait Fields<R> {
    /// The decoded field values, in declaration order.
    type Values;

    fn write_fields(&self, buffer: &mut BinaryBuffer, value: &R) -> Result<()>;

    fn read_fields(&self, buffer: &mut BinaryBuffer) -> Result<Self::Values>;
}

macro_rules! impl_fields {
    ($($C:ident $G:ident $idx:tt),*) => {
        impl<R, $($C, $G),*> Fields<R> for ($(Field<$C, $G>,)*)
        where
            $($C: BinaryCodec, $G: Fn(&R) -> &$C::Value,)*
        {
            type Values = ($($C::Value,)*);

            #[inline]
            #[allow(unused_variables)]
            fn write_fields(&self, buffer: &mut BinaryBuffer, value: &R) -> Result<()> {
                $(self.$idx.codec.write(buffer, (self.$idx.getter)(value))?;)*
                Ok(())
            }

            #[inline]
            #[allow(unused_variables, clippy::unused_unit)]
            fn read_fields(&self, buffer: &mut BinaryBuffer) -> Result<Self::Values> {
                Ok(($(self.$idx.codec.read(buffer)?,)*))
            }
        }
    };
}

impl_fields!();
impl_fields!(C0 G0 0);
impl_fields!(C0 G0 0, C1 G1 1);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9, C10 G10 10);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9, C10 G10 10, C11 G11 11);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9, C10 G10 10, C11 G11 11, C12 G12 12);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9, C10 G10 10, C11 G11 11, C12 G12 12, C13 G13 13);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9, C10 G10 10, C11 G11 11, C12 G12 12, C13 G13 13, C14 G14 14);
impl_fields!(C0 G0 0, C1 G1 1, C2 G2 2, C3 G3 3, C4 G4 4, C5 G5 5, C6 G6 6, C7 G7 7, C8 G8 8, C9 G9 9, C10 G10 10, C11 G11 11, C12 G12 12, C13 G13 13, C14 G14 14, C15 G15 15);

/// Binary codec for `R` assembled from positional [`Fields`].
pub struct Product<F, Ctor, R> {
    fields: F,
    construct: Ctor,
    _exposes: Exposes<R>,
}

/// Build a codec for `R` from a tuple of [`field`]s and a constructor taking
/// the decoded values as a tuple.
#[inline]
pub fn product<R, F, Ctor>(fields: F, construct: Ctor) -> Product<F, Ctor, R>
where
    F: Fields<R>,
    Ctor: Fn(F::Values) -> R,
{
    Product {
        fields,
        construct,
        _exposes: PhantomData,
    }
}

impl<R, F, Ctor> BinaryCodec for Product<F, Ctor, R>
where
    F: Fields<R>,
    Ctor: Fn(F::Values) -> R,
{
    type Value = R;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &R) -> Result<()> {
        self.fields.write_fields(buffer, value)
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<R> {
        self.fields.read_fields(buffer).map(&self.construct)
    }
}
