//! The virtual data model shared by every format-agnostic codec.
//!
//! A [`Transcoder`] is implemented once per target format and maps a small
//! universal model (null, primitives, lists, string-keyed maps) onto that format's
//! own tree type `D`. Codecs in [`crate::codec`] only ever talk to `D` through this
//! trait, so one codec description works against every transcoder.
use crate::error::Result;

#[cfg(feature = "json")]
pub mod json;
pub mod value;

/// Narrow a double to `f32`. Non-finite values carry over, finite values outside
/// the `f32` range yield `None`.
#[inline]
pub(crate) fn narrow_float(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
}

/// Write view accumulating ordered elements of a list.
pub trait ListBuilder<D> {
    fn push(&mut self, element: D);

    fn build(self: Box<Self>) -> D;
}

/// Write view accumulating `(key, value)` entries of a map.
///
/// Entries keep their insertion order. Putting an existing key replaces its value.
pub trait MapBuilder<D> {
    fn put(&mut self, key: &str, value: D);

    fn build(self: Box<Self>) -> D;
}

/// Read view over a string-keyed map.
pub trait VirtualMap<D> {
    fn keys(&self) -> Vec<&str>;

    fn get(&self, key: &str) -> Option<&D>;

    #[inline]
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// The contract a target format implements.
///
/// Decoding methods fail with [`Error::ShapeMismatch`](crate::Error::ShapeMismatch)
/// when `data` is not of the requested kind. The array helpers have default
/// implementations built on the list and primitive methods.
pub trait Transcoder<D> {
    fn encode_null(&self) -> D;

    fn encode_bool(&self, value: bool) -> D;
    fn decode_bool(&self, data: &D) -> Result<bool>;

    fn encode_byte(&self, value: u8) -> D;
    fn decode_byte(&self, data: &D) -> Result<u8>;

    fn encode_short(&self, value: i16) -> D;
    fn decode_short(&self, data: &D) -> Result<i16>;

    fn encode_int(&self, value: i32) -> D;
    fn decode_int(&self, data: &D) -> Result<i32>;

    fn encode_long(&self, value: i64) -> D;
    fn decode_long(&self, data: &D) -> Result<i64>;

    fn encode_float(&self, value: f32) -> D;
    fn decode_float(&self, data: &D) -> Result<f32>;

    fn encode_double(&self, value: f64) -> D;
    fn decode_double(&self, data: &D) -> Result<f64>;

    fn encode_string(&self, value: &str) -> D;
    fn decode_string(&self, data: &D) -> Result<String>;

    fn encode_byte_array(&self, values: &[u8]) -> D {
        let mut list = self.encode_list(values.len());
        for value in values {
            list.push(self.encode_byte(*value));
        }
        list.build()
    }

    fn decode_byte_array(&self, data: &D) -> Result<Vec<u8>> {
        self.decode_list(data)?
            .into_iter()
            .map(|element| self.decode_byte(element))
            .collect()
    }

    fn encode_int_array(&self, values: &[i32]) -> D {
        let mut list = self.encode_list(values.len());
        for value in values {
            list.push(self.encode_int(*value));
        }
        list.build()
    }

    fn decode_int_array(&self, data: &D) -> Result<Vec<i32>> {
        self.decode_list(data)?
            .into_iter()
            .map(|element| self.decode_int(element))
            .collect()
    }

    fn encode_long_array(&self, values: &[i64]) -> D {
        let mut list = self.encode_list(values.len());
        for value in values {
            list.push(self.encode_long(*value));
        }
        list.build()
    }

    fn decode_long_array(&self, data: &D) -> Result<Vec<i64>> {
        self.decode_list(data)?
            .into_iter()
            .map(|element| self.decode_long(element))
            .collect()
    }

    /// Start a list. `size_hint` is the expected element count.
    fn encode_list(&self, size_hint: usize) -> Box<dyn ListBuilder<D> + '_>;

    /// The elements of a list, in order.
    fn decode_list<'a>(&self, data: &'a D) -> Result<Vec<&'a D>>;

    fn encode_map(&self) -> Box<dyn MapBuilder<D> + '_>;

    fn decode_map<'a>(&self, data: &'a D) -> Result<Box<dyn VirtualMap<D> + 'a>>;
}
