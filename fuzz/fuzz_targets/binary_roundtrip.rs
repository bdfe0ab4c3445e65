#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    polycodec::binary::{
        field, product, recursive, BinaryCodec, Byte, Bytes, Int, Long, RecursiveRef, Str, VarInt,
    },
};

macro_rules! fuzz_roundtrip {
    ($data:expr, $codec:expr) => {{
        let codec = $codec;
        if let Ok(value) = codec.deserialize($data) {
            let serialized = codec.serialize(&value).expect("serialize should succeed");
            let roundtrip = codec
                .deserialize(&serialized)
                .expect("roundtrip deserialize should succeed");
            assert_eq!(value, roundtrip, "roundtrip failed for {}", stringify!($codec));
        }
    }};
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    tag: u8,
    label: String,
    children: Vec<Node>,
}

fuzz_target!(|data: &[u8]| {
    fuzz_roundtrip!(data, VarInt);
    fuzz_roundtrip!(data, VarInt.list());
    fuzz_roundtrip!(data, Str::new());
    fuzz_roundtrip!(data, Bytes::new().optional());
    fuzz_roundtrip!(data, Str::new().map_to(Long));
    fuzz_roundtrip!(
        data,
        product(
            (
                field(Int, |t: &(i32, Option<String>, u8)| &t.0),
                field(Str::new().optional(), |t: &(i32, Option<String>, u8)| &t.1),
                field(Byte.or_default(0), |t: &(i32, Option<String>, u8)| &t.2),
            ),
            |(a, b, c)| (a, b, c),
        )
    );
    fuzz_roundtrip!(
        data,
        recursive(|node: RecursiveRef<Node>| {
            product(
                (
                    field(Byte, |n: &Node| &n.tag),
                    field(Str::new(), |n: &Node| &n.label),
                    field(node.list(), |n: &Node| &n.children),
                ),
                |(tag, label, children)| Node {
                    tag,
                    label,
                    children,
                },
            )
        })
    );
});
