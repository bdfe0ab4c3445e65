//! polycodec describes how a type is encoded once, as a composition of small codecs,
//! and reuses that description across formats.
//!
//! There are two families of codecs:
//!
//! - [`binary`] codecs read and write a bit-exact wire format on a
//!   [`BinaryBuffer`](io::BinaryBuffer): big-endian fixed-width primitives, LEB128
//!   [`VarInt`](binary::VarInt)s and length-prefixed sequences.
//! - [`codec`] codecs are format-agnostic. They drive a [`Transcoder`](transcoder::Transcoder),
//!   which builds and takes apart some data type `D`, so the same codec works with the
//!   in-memory [`Value`](transcoder::value::Value) tree and with `serde_json::Value`
//!   (behind the `json` feature).
//!
//! Both families share the same vocabulary of combinators: optional values, defaults,
//! transforms, lists, maps, discriminated [`union`]s and recursive codecs.
//!
//! # Quickstart
//!
//! ```
//! use polycodec::binary::{field, product, BinaryCodec, Int, Str};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     label: String,
//!     x: i32,
//!     y: i32,
//! }
//!
//! let codec = product(
//!     (
//!         field(Str::new(), |p: &Point| &p.label),
//!         field(Int, |p: &Point| &p.x),
//!         field(Int, |p: &Point| &p.y),
//!     ),
//!     |(label, x, y)| Point { label, x, y },
//! );
//!
//! let point = Point { label: "a".into(), x: 1, y: -1 };
//! let bytes = codec.serialize(&point).unwrap();
//! assert_eq!(bytes, [1, b'a', 0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff]);
//! assert_eq!(codec.deserialize(&bytes).unwrap(), point);
//! ```
//!
//! Decoding never panics on malformed input; every failure is an [`Error`].
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod binary;
pub mod codec;
mod enumerant;
pub mod error;
pub mod io;
pub mod len;
#[cfg(test)]
mod proptest_config;
pub mod transcoder;
pub mod union;

pub use {
    enumerant::Enumerant,
    error::{Error, Result},
};
