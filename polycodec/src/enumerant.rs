//! Field-less enumerations usable by both codec families.

/// A field-less enumeration with a fixed declaration order.
///
/// Binary codecs identify an enumerant by its position in [`VARIANTS`](Self::VARIANTS),
/// format-agnostic codecs by its [`name`](Self::name). Use [`enumerant!`](crate::enumerant!)
/// to implement it.
pub trait Enumerant: Sized + Copy + PartialEq + 'static {
    /// Every enumerant, in declaration order.
    const VARIANTS: &'static [Self];

    fn name(&self) -> &'static str;

    #[inline]
    fn ordinal(&self) -> Option<usize> {
        Self::VARIANTS.iter().position(|variant| variant == self)
    }

    #[inline]
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VARIANTS.get(ordinal).copied()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.name() == name)
    }
}

/// Implement [`Enumerant`] for a field-less enum, listing its variants in
/// declaration order.
///
/// ```
/// use polycodec::{enumerant, Enumerant};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// enumerant!(Color { Red, Green });
///
/// assert_eq!(Color::Green.ordinal(), Some(1));
/// assert_eq!(Color::from_name("Red"), Some(Color::Red));
/// ```
#[macro_export]
macro_rules! enumerant {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Enumerant for $ty {
            const VARIANTS: &'static [Self] = &[$($ty::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)+
                }
            }
        }
    };
}
