//! [`Transcoder`] over [`serde_json::Value`].
//!
//! Integers decode from JSON numbers that are integral and in range for the target
//! type. Non-finite floats have no JSON representation and encode as `null`.
use {
    super::{narrow_float, ListBuilder, MapBuilder, Transcoder, VirtualMap},
    crate::error::{shape_mismatch, Result},
    serde_json::{Map, Number, Value},
};

fn kind(data: &Value) -> &'static str {
    match data {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float number",
        Value::Number(_) => "integer number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn integer<T: TryFrom<i64>>(data: &Value, expected: &'static str) -> Result<T> {
    let Some(n) = data.as_i64() else {
        return Err(shape_mismatch(expected, kind(data)));
    };
    T::try_from(n).map_err(|_| shape_mismatch(expected, n.to_string()))
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonTranscoder;

impl Transcoder<Value> for JsonTranscoder {
    fn encode_null(&self) -> Value {
        Value::Null
    }

    fn encode_bool(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn decode_bool(&self, data: &Value) -> Result<bool> {
        data.as_bool()
            .ok_or_else(|| shape_mismatch("bool", kind(data)))
    }

    fn encode_byte(&self, value: u8) -> Value {
        value.into()
    }

    fn decode_byte(&self, data: &Value) -> Result<u8> {
        integer(data, "byte")
    }

    fn encode_short(&self, value: i16) -> Value {
        value.into()
    }

    fn decode_short(&self, data: &Value) -> Result<i16> {
        integer(data, "short")
    }

    fn encode_int(&self, value: i32) -> Value {
        value.into()
    }

    fn decode_int(&self, data: &Value) -> Result<i32> {
        integer(data, "int")
    }

    fn encode_long(&self, value: i64) -> Value {
        value.into()
    }

    fn decode_long(&self, data: &Value) -> Result<i64> {
        integer(data, "long")
    }

    fn encode_float(&self, value: f32) -> Value {
        float(value.into())
    }

    fn decode_float(&self, data: &Value) -> Result<f32> {
        let value = self.decode_double(data)?;
        narrow_float(value).ok_or_else(|| shape_mismatch("float", value.to_string()))
    }

    fn encode_double(&self, value: f64) -> Value {
        float(value)
    }

    fn decode_double(&self, data: &Value) -> Result<f64> {
        data.as_f64()
            .ok_or_else(|| shape_mismatch("double", kind(data)))
    }

    fn encode_string(&self, value: &str) -> Value {
        Value::String(value.to_owned())
    }

    fn decode_string(&self, data: &Value) -> Result<String> {
        data.as_str()
            .map(str::to_owned)
            .ok_or_else(|| shape_mismatch("string", kind(data)))
    }

    fn encode_list(&self, size_hint: usize) -> Box<dyn ListBuilder<Value> + '_> {
        Box::new(JsonArray(Vec::with_capacity(size_hint)))
    }

    fn decode_list<'a>(&self, data: &'a Value) -> Result<Vec<&'a Value>> {
        data.as_array()
            .map(|array| array.iter().collect())
            .ok_or_else(|| shape_mismatch("array", kind(data)))
    }

    fn encode_map(&self) -> Box<dyn MapBuilder<Value> + '_> {
        Box::new(JsonObject(Map::new()))
    }

    fn decode_map<'a>(&self, data: &'a Value) -> Result<Box<dyn VirtualMap<Value> + 'a>> {
        match data {
            Value::Object(object) => Ok(Box::new(object)),
            other => Err(shape_mismatch("object", kind(other))),
        }
    }
}

struct JsonArray(Vec<Value>);

impl ListBuilder<Value> for JsonArray {
    fn push(&mut self, element: Value) {
        self.0.push(element);
    }

    fn build(self: Box<Self>) -> Value {
        Value::Array(self.0)
    }
}

struct JsonObject(Map<String, Value>);

impl MapBuilder<Value> for JsonObject {
    fn put(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_owned(), value);
    }

    fn build(self: Box<Self>) -> Value {
        Value::Object(self.0)
    }
}

impl VirtualMap<Value> for &Map<String, Value> {
    fn keys(&self) -> Vec<&str> {
        Map::keys(self).map(String::as_str).collect()
    }

    fn get(&self, key: &str) -> Option<&Value> {
        Map::get(*self, key)
    }
}
