//! A lossless in-memory tree implementing the virtual data model.
use {
    super::{narrow_float, ListBuilder, MapBuilder, Transcoder, VirtualMap},
    crate::error::{shape_mismatch, Result},
    indexmap::IndexMap,
};

/// One node of the in-memory tree. Maps keep insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Name of this value's kind, as used in shape mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    fn integer(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::Int(v) => Some(v.into()),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v.into()),
            Value::Double(v) => Some(v),
            _ => self.integer().map(|v| v as f64),
        }
    }
}

fn integer<T: TryFrom<i64>>(data: &Value, expected: &'static str) -> Result<T> {
    let Some(n) = data.integer() else {
        return Err(shape_mismatch(expected, data.kind()));
    };
    T::try_from(n).map_err(|_| shape_mismatch(expected, format!("{} {n}", data.kind())))
}

/// [`Transcoder`] over [`Value`].
///
/// Integer kinds decode from any integer kind whose value fits the target type.
/// Floating point kinds decode from any numeric kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueTranscoder;

impl Transcoder<Value> for ValueTranscoder {
    fn encode_null(&self) -> Value {
        Value::Null
    }

    fn encode_bool(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn decode_bool(&self, data: &Value) -> Result<bool> {
        match data {
            Value::Bool(value) => Ok(*value),
            other => Err(shape_mismatch("bool", other.kind())),
        }
    }

    fn encode_byte(&self, value: u8) -> Value {
        Value::Byte(value)
    }

    fn decode_byte(&self, data: &Value) -> Result<u8> {
        integer(data, "byte")
    }

    fn encode_short(&self, value: i16) -> Value {
        Value::Short(value)
    }

    fn decode_short(&self, data: &Value) -> Result<i16> {
        integer(data, "short")
    }

    fn encode_int(&self, value: i32) -> Value {
        Value::Int(value)
    }

    fn decode_int(&self, data: &Value) -> Result<i32> {
        integer(data, "int")
    }

    fn encode_long(&self, value: i64) -> Value {
        Value::Long(value)
    }

    fn decode_long(&self, data: &Value) -> Result<i64> {
        integer(data, "long")
    }

    fn encode_float(&self, value: f32) -> Value {
        Value::Float(value)
    }

    fn decode_float(&self, data: &Value) -> Result<f32> {
        match data {
            Value::Float(value) => Ok(*value),
            other => {
                let value = other
                    .number()
                    .ok_or_else(|| shape_mismatch("float", other.kind()))?;
                narrow_float(value)
                    .ok_or_else(|| shape_mismatch("float", format!("{} {value}", other.kind())))
            }
        }
    }

    fn encode_double(&self, value: f64) -> Value {
        Value::Double(value)
    }

    fn decode_double(&self, data: &Value) -> Result<f64> {
        data.number()
            .ok_or_else(|| shape_mismatch("double", data.kind()))
    }

    fn encode_string(&self, value: &str) -> Value {
        Value::String(value.to_owned())
    }

    fn decode_string(&self, data: &Value) -> Result<String> {
        match data {
            Value::String(value) => Ok(value.clone()),
            other => Err(shape_mismatch("string", other.kind())),
        }
    }

    fn encode_list(&self, size_hint: usize) -> Box<dyn ListBuilder<Value> + '_> {
        Box::new(ValueList(Vec::with_capacity(size_hint)))
    }

    fn decode_list<'a>(&self, data: &'a Value) -> Result<Vec<&'a Value>> {
        match data {
            Value::List(list) => Ok(list.iter().collect()),
            other => Err(shape_mismatch("list", other.kind())),
        }
    }

    fn encode_map(&self) -> Box<dyn MapBuilder<Value> + '_> {
        Box::new(ValueMap(IndexMap::new()))
    }

    fn decode_map<'a>(&self, data: &'a Value) -> Result<Box<dyn VirtualMap<Value> + 'a>> {
        match data {
            Value::Map(map) => Ok(Box::new(map)),
            other => Err(shape_mismatch("map", other.kind())),
        }
    }
}

struct ValueList(Vec<Value>);

impl ListBuilder<Value> for ValueList {
    fn push(&mut self, element: Value) {
        self.0.push(element);
    }

    fn build(self: Box<Self>) -> Value {
        Value::List(self.0)
    }
}

struct ValueMap(IndexMap<String, Value>);

impl MapBuilder<Value> for ValueMap {
    fn put(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_owned(), value);
    }

    fn build(self: Box<Self>) -> Value {
        Value::Map(self.0)
    }
}

impl VirtualMap<Value> for &IndexMap<String, Value> {
    fn keys(&self) -> Vec<&str> {
        IndexMap::keys(self).map(String::as_str).collect()
    }

    fn get(&self, key: &str) -> Option<&Value> {
        IndexMap::get(*self, key)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::error::Error};

    const TR: ValueTranscoder = ValueTranscoder;

    #[test]
    fn integers_widen_and_narrow_when_they_fit() {
        assert_eq!(TR.decode_long(&Value::Byte(7)).unwrap(), 7);
        assert_eq!(TR.decode_int(&Value::Long(-5)).unwrap(), -5);
        assert_eq!(TR.decode_byte(&Value::Int(255)).unwrap(), 255);
        assert_eq!(
            TR.decode_byte(&Value::Int(256)),
            Err(Error::ShapeMismatch {
                expected: "byte",
                found: "int 256".into()
            })
        );
        assert!(TR.decode_short(&Value::Long(i64::from(i16::MAX) + 1)).is_err());
    }

    #[test]
    fn floats_accept_any_number() {
        assert_eq!(TR.decode_double(&Value::Int(3)).unwrap(), 3.0);
        assert_eq!(TR.decode_float(&Value::Double(0.5)).unwrap(), 0.5);
        assert!(TR.decode_float(&Value::Float(f32::NAN)).unwrap().is_nan());
        assert!(TR.decode_double(&Value::String("1".into())).is_err());
    }

    #[test]
    fn float_rejects_doubles_out_of_range() {
        assert_eq!(
            TR.decode_float(&Value::Double(1e300)),
            Err(Error::ShapeMismatch {
                expected: "float",
                found: format!("double {}", 1e300),
            })
        );
        assert_eq!(TR.decode_float(&Value::Double(f64::INFINITY)).unwrap(), f32::INFINITY);
        assert_eq!(TR.decode_float(&Value::Double(f64::from(f32::MAX))).unwrap(), f32::MAX);
    }

    #[test]
    fn kinds_do_not_cross() {
        assert_eq!(
            TR.decode_string(&Value::Int(1)),
            Err(Error::ShapeMismatch {
                expected: "string",
                found: "int".into()
            })
        );
        assert!(TR.decode_bool(&Value::Byte(1)).is_err());
        assert!(TR.decode_int(&Value::Null).is_err());
        assert!(TR.decode_list(&Value::Map(IndexMap::new())).is_err());
        assert!(TR.decode_map(&Value::List(Vec::new())).is_err());
    }

    #[test]
    fn map_builder_keeps_insertion_order() {
        let mut builder = TR.encode_map();
        builder.put("z", TR.encode_int(1));
        builder.put("a", TR.encode_int(2));
        builder.put("z", TR.encode_int(3));
        let map = builder.build();

        let view = TR.decode_map(&map).unwrap();
        assert_eq!(view.keys(), vec!["z", "a"]);
        assert_eq!(view.get("z"), Some(&Value::Int(3)));
        assert!(view.has("a"));
        assert!(!view.has("b"));
    }

    #[test]
    fn default_array_helpers() {
        let data = TR.encode_long_array(&[1, -2, 3]);
        assert_eq!(
            data,
            Value::List(vec![Value::Long(1), Value::Long(-2), Value::Long(3)])
        );
        assert_eq!(TR.decode_long_array(&data).unwrap(), vec![1, -2, 3]);
        assert_eq!(TR.decode_int_array(&data).unwrap(), vec![1, -2, 3]);

        let bytes = TR.encode_byte_array(&[0, 255]);
        assert_eq!(TR.decode_byte_array(&bytes).unwrap(), vec![0, 255]);
        assert!(TR.decode_byte_array(&data).is_err());
    }
}
