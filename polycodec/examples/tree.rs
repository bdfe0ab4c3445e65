//! Encodes a small directory tree with one binary codec and one format-agnostic
//! codec, then prints both encodings.
//!
//! Run with `RUST_LOG=polycodec=debug` to see codec resolution and fallbacks.
use polycodec::{
    binary::{self, BinaryCodec},
    codec::{self, Codec, Transcode},
    transcoder::json::JsonTranscoder,
    Result,
};

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    size: i64,
    hidden: bool,
    children: Vec<Entry>,
}

fn binary_codec() -> binary::Recursive<Entry> {
    binary::recursive(|entry: binary::RecursiveRef<Entry>| {
        binary::product(
            (
                binary::field(binary::Str::new(), |e: &Entry| &e.name),
                binary::field(binary::Long, |e: &Entry| &e.size),
                binary::field(binary::Boolean.or_default(false), |e: &Entry| &e.hidden),
                binary::field(entry.list(), |e: &Entry| &e.children),
            ),
            |(name, size, hidden, children)| Entry {
                name,
                size,
                hidden,
                children,
            },
        )
    })
}

fn json_codec() -> codec::Recursive<serde_json::Value, Entry> {
    codec::recursive(|entry: codec::RecursiveRef<serde_json::Value, Entry>| {
        codec::structure(
            (
                codec::named("name", codec::Str, |e: &Entry| &e.name),
                codec::named("size", codec::Long.or_default(0), |e: &Entry| &e.size),
                codec::named("hidden", codec::Bool.or_default(false), |e: &Entry| &e.hidden),
                codec::named("children", entry.list().or_default(Vec::new()), |e: &Entry| {
                    &e.children
                }),
            ),
            |(name, size, hidden, children)| Entry {
                name,
                size,
                hidden,
                children,
            },
        )
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let file = |name: &str, size| Entry {
        name: name.into(),
        size,
        hidden: false,
        children: Vec::new(),
    };
    let root = Entry {
        name: "/".into(),
        size: 0,
        hidden: false,
        children: vec![
            Entry {
                name: "src".into(),
                size: 0,
                hidden: false,
                children: vec![file("lib.rs", 1_204), file("union.rs", 9_873)],
            },
            Entry {
                hidden: true,
                ..file(".git", 0)
            },
        ],
    };

    let binary = binary_codec();
    let bytes = binary.serialize(&root)?;
    println!("binary: {} bytes {:02x?}", bytes.len(), bytes);
    assert_eq!(binary.deserialize(&bytes)?, root);

    let json = json_codec();
    let data = json.encode(&JsonTranscoder, &root)?;
    println!("json: {data}");
    assert_eq!(json.decode(&JsonTranscoder, &data)?, root);

    // Missing keys fall back to their defaults.
    let sparse = serde_json::json!({ "name": "empty.txt" });
    println!("sparse: {:?}", json.decode(&JsonTranscoder, &sparse)?);

    Ok(())
}
