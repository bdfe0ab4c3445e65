use {
    indexmap::IndexMap,
    polycodec::{
        binary::{
            field, product, recursive, BinaryCodec, BoxedCodec, Byte, Double, EnumCodec, Int,
            RecursiveRef, Str, VarInt,
        },
        enumerant,
        io::BinaryBuffer,
        Error,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Role {
    Reader,
    Writer,
    Admin,
}

enumerant!(Role { Reader, Writer, Admin });

#[derive(Debug, Clone, PartialEq)]
struct Member {
    name: String,
    role: Role,
    quota: i32,
    alias: Option<String>,
}

fn member_codec() -> impl BinaryCodec<Value = Member> {
    product(
        (
            field(Str::new(), |m: &Member| &m.name),
            field(EnumCodec::<Role>::new(), |m: &Member| &m.role),
            field(Int.or_default(10), |m: &Member| &m.quota),
            field(Str::new().optional(), |m: &Member| &m.alias),
        ),
        |(name, role, quota, alias)| Member {
            name,
            role,
            quota,
            alias,
        },
    )
}

#[test]
fn member_wire_layout() {
    let member = Member {
        name: "ok".into(),
        role: Role::Admin,
        quota: 1,
        alias: None,
    };
    let bytes = member_codec().serialize(&member).unwrap();
    assert_eq!(bytes, [2, b'o', b'k', 2, 0, 0, 0, 1, 0]);
    assert_eq!(member_codec().deserialize(&bytes).unwrap(), member);
}

#[test]
fn unknown_ordinal_is_rejected() {
    assert_eq!(
        member_codec().deserialize(&[0, 3, 0, 0, 0, 1, 0]),
        Err(Error::InvalidOrdinal {
            ordinal: 3,
            count: 3
        })
    );
}

#[test]
fn trailing_defaulted_field_may_be_omitted() {
    let codec = product(
        (
            field(Int, |p: &(i32, i32)| &p.0),
            field(Int.or_default(-1), |p: &(i32, i32)| &p.1),
        ),
        |(a, b)| (a, b),
    );
    assert_eq!(codec.deserialize(&[0, 0, 0, 4]).unwrap(), (4, -1));
    assert_eq!(codec.deserialize(&[0, 0, 0, 4, 0, 0]).unwrap(), (4, -1));
    assert_eq!(codec.deserialize(&[0, 0, 0, 4, 0, 0, 0, 5]).unwrap(), (4, 5));
}

#[test]
fn buffer_bounds() {
    let mut buffer = BinaryBuffer::new();
    assert!(matches!(buffer.read_byte(), Err(Error::EndOfData { .. })));
    buffer.write_short(7);
    assert!(matches!(
        buffer.read_int(),
        Err(Error::EndOfData {
            requested: 4,
            remaining: 2
        })
    ));
    assert_eq!(buffer.read_short().unwrap(), 7);
}

#[test]
fn varint_edge_cases() {
    let cases: &[(i32, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (129, &[0x81, 0x01]),
        (16384, &[0x80, 0x80, 0x01]),
        (i32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x07]),
        (-1, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
        (i32::MIN, &[0x80, 0x80, 0x80, 0x80, 0x08]),
    ];
    for (value, bytes) in cases {
        assert_eq!(VarInt.serialize(value).unwrap(), *bytes, "{value}");
        assert_eq!(VarInt.deserialize(bytes).unwrap(), *value);
    }
    assert_eq!(
        VarInt.deserialize(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
        Err(Error::MalformedVarInt)
    );
}

#[test]
fn list_and_map_preserve_order() {
    let list = Double.list();
    let values = vec![0.5, -2.0, f64::MAX];
    assert_eq!(list.deserialize(&list.serialize(&values).unwrap()).unwrap(), values);
    assert_eq!(list.deserialize(&[0]).unwrap(), Vec::<f64>::new());

    let map = Str::new().map_to(Int.list());
    let mut entries = IndexMap::new();
    entries.insert("z".to_string(), vec![1]);
    entries.insert("a".to_string(), vec![]);
    let decoded = map.deserialize(&map.serialize(&entries).unwrap()).unwrap();
    assert_eq!(decoded.keys().collect::<Vec<_>>(), ["z", "a"]);
    assert_eq!(decoded, entries);
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: String,
    children: Vec<Node>,
}

fn node(name: &str, children: Vec<Node>) -> Node {
    Node {
        name: name.into(),
        children,
    }
}

#[test]
fn recursive_tree_keeps_shape() {
    let codec = recursive(|this: RecursiveRef<Node>| {
        product(
            (
                field(Str::new(), |n: &Node| &n.name),
                field(this.list(), |n: &Node| &n.children),
            ),
            |(name, children)| Node { name, children },
        )
    });
    let tree = node(
        "a",
        vec![
            node("b", vec![node("c", vec![node("d", vec![])]), node("e", vec![])]),
            node("f", vec![]),
        ],
    );
    let decoded = codec.deserialize(&codec.serialize(&tree).unwrap()).unwrap();
    assert_eq!(decoded, tree);
    assert_eq!(decoded.children.len(), 2);
    assert_eq!(decoded.children[0].children.len(), 2);
    assert_eq!(decoded.children[0].children[0].children[0].name, "d");
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Ping(i32),
    Message(String),
}

fn event_codec() -> impl BinaryCodec<Value = Event> {
    Byte.union(
        |event: &Event| match event {
            Event::Ping(_) => 1,
            Event::Message(_) => 2,
        },
        |key: &u8| -> Option<BoxedCodec<Event>> {
            match key {
                1 => Some(
                    Int.variant(Event::Ping, |e: &Event| match e {
                        Event::Ping(n) => Some(n),
                        _ => None,
                    })
                    .boxed(),
                ),
                2 => Some(
                    Str::new()
                        .variant(Event::Message, |e: &Event| match e {
                            Event::Message(text) => Some(text),
                            _ => None,
                        })
                        .boxed(),
                ),
                _ => None,
            }
        },
    )
}

#[test]
fn union_selects_variant_from_discriminator() {
    let codec = event_codec().list();
    let events = vec![Event::Ping(3), Event::Message("hi".into())];
    let bytes = codec.serialize(&events).unwrap();
    assert_eq!(bytes, [2, 1, 0, 0, 0, 3, 2, 2, b'h', b'i']);
    assert_eq!(codec.deserialize(&bytes).unwrap(), events);

    let mut tampered = bytes.clone();
    tampered[1] = 9;
    assert_eq!(
        codec.deserialize(&tampered),
        Err(Error::UnionDispatchFailure("9".into()))
    );
}
