//! Self-referential binary codecs for tree-shaped types.
use {
    super::{BinaryCodec, BoxedCodec},
    crate::{
        error::{detached_recursive, Result},
        io::BinaryBuffer,
    },
    std::sync::{Arc, OnceLock, Weak},
    tracing::debug,
};

type Builder<T> = Box<dyn Fn(RecursiveRef<T>) -> BoxedCodec<T> + Send + Sync>;

struct Inner<T: 'static> {
    builder: Builder<T>,
    delegate: OnceLock<BoxedCodec<T>>,
    this: Weak<Inner<T>>,
}

impl<T: 'static> Inner<T> {
    fn delegate(&self) -> &BoxedCodec<T> {
        self.delegate.get_or_init(|| {
            debug!(
                value = core::any::type_name::<T>(),
                "resolving recursive codec"
            );
            (self.builder)(RecursiveRef {
                inner: self.this.clone(),
            })
        })
    }
}

/// A codec whose definition refers to itself.
///
/// The builder receives a [`RecursiveRef`] standing in for the codec under
/// construction and returns the real definition. It runs once, on first use, and
/// the result is cached for the lifetime of the codec. Clones share the cache.
pub struct Recursive<T: 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: 'static> Clone for Recursive<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Recursive<T> {
    /// A non-owning handle to this codec.
    pub fn downgrade(&self) -> RecursiveRef<T> {
        RecursiveRef {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Build a [`Recursive`] codec from `builder`.
///
/// ```
/// use polycodec::binary::{field, product, recursive, BinaryCodec, RecursiveRef, Str};
///
/// #[derive(Debug, PartialEq)]
/// struct Node {
///     name: String,
///     children: Vec<Node>,
/// }
///
/// let codec = recursive(|node: RecursiveRef<Node>| {
///     product(
///         (
///             field(Str::new(), |n: &Node| &n.name),
///             field(node.list(), |n: &Node| &n.children),
///         ),
///         |(name, children)| Node { name, children },
///     )
/// });
///
/// let tree = Node {
///     name: "root".into(),
///     children: vec![Node { name: "leaf".into(), children: vec![] }],
/// };
/// let bytes = codec.serialize(&tree).unwrap();
/// assert_eq!(codec.deserialize(&bytes).unwrap(), tree);
/// ```
pub fn recursive<T, B, C>(builder: B) -> Recursive<T>
where
    T: 'static,
    B: Fn(RecursiveRef<T>) -> C + Send + Sync + 'static,
    C: BinaryCodec<Value = T> + Send + Sync + 'static,
{
    let builder: Builder<T> = Box::new(move |this| builder(this).boxed());
    Recursive {
        inner: Arc::new_cyclic(|this| Inner {
            builder,
            delegate: OnceLock::new(),
            this: this.clone(),
        }),
    }
}

impl<T: 'static> BinaryCodec for Recursive<T> {
    type Value = T;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &T) -> Result<()> {
        self.inner.delegate().write(buffer, value)
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<T> {
        self.inner.delegate().read(buffer)
    }
}

/// The self-reference handed to a [`recursive`] builder.
///
/// Holds a weak reference so a codec does not keep itself alive. Using it after
/// every [`Recursive`] handle is dropped fails with
/// [`Error::DetachedRecursive`](crate::Error::DetachedRecursive).
pub struct RecursiveRef<T: 'static> {
    inner: Weak<Inner<T>>,
}

impl<T: 'static> Clone for RecursiveRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: 'static> RecursiveRef<T> {
    fn upgrade(&self) -> Result<Arc<Inner<T>>> {
        self.inner.upgrade().ok_or_else(detached_recursive)
    }
}

impl<T: 'static> BinaryCodec for RecursiveRef<T> {
    type Value = T;

    #[inline]
    fn write(&self, buffer: &mut BinaryBuffer, value: &T) -> Result<()> {
        self.upgrade()?.delegate().write(buffer, value)
    }

    #[inline]
    fn read(&self, buffer: &mut BinaryBuffer) -> Result<T> {
        self.upgrade()?.delegate().read(buffer)
    }
}
