//! Lazily resolved codecs: self-referential [`Recursive`] codecs and
//! [`ForwardRef`]s to codecs defined elsewhere.
//!
//! Codecs are generic over the data type, but a resolved delegate is stored type
//! erased, so both are tied to one data type `D`.
use {
    super::{BoxedCodec, Codec, Transcode},
    crate::{
        error::{detached_recursive, Result},
        transcoder::Transcoder,
    },
    std::sync::{Arc, OnceLock, Weak},
    tracing::debug,
};

type Builder<D, T> = Box<dyn Fn(RecursiveRef<D, T>) -> BoxedCodec<D, T> + Send + Sync>;

struct Inner<D: 'static, T: 'static> {
    builder: Builder<D, T>,
    delegate: OnceLock<BoxedCodec<D, T>>,
    this: Weak<Inner<D, T>>,
}

impl<D: 'static, T: 'static> Inner<D, T> {
    fn delegate(&self) -> &BoxedCodec<D, T> {
        self.delegate.get_or_init(|| {
            debug!(
                value = core::any::type_name::<T>(),
                data = core::any::type_name::<D>(),
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
/// See [`recursive`].
pub struct Recursive<D: 'static, T: 'static> {
    inner: Arc<Inner<D, T>>,
}

impl<D: 'static, T: 'static> Clone for Recursive<D, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: 'static, T: 'static> Recursive<D, T> {
    /// A non-owning handle to this codec.
    pub fn downgrade(&self) -> RecursiveRef<D, T> {
        RecursiveRef {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Build a codec for a tree-shaped type from `builder`, which receives a stand-in
/// for the codec being defined.
///
/// The builder runs once, on first use, and its result is cached.
pub fn recursive<D, T, B, C>(builder: B) -> Recursive<D, T>
where
    D: 'static,
    T: 'static,
    B: Fn(RecursiveRef<D, T>) -> C + Send + Sync + 'static,
    C: Transcode<D, Value = T> + Send + Sync + 'static,
{
    let builder: Builder<D, T> =
        Box::new(move |this| -> BoxedCodec<D, T> { Box::new(builder(this)) });
    Recursive {
        inner: Arc::new_cyclic(|this| Inner {
            builder,
            delegate: OnceLock::new(),
            this: this.clone(),
        }),
    }
}

impl<D: 'static, T: 'static> Codec for Recursive<D, T> {
    type Value = T;

    fn absent(&self) -> Option<T> {
        self.inner.delegate().absent()
    }
}

impl<D: 'static, T: 'static> Transcode<D> for Recursive<D, T> {
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &T) -> Result<D> {
        self.inner.delegate().encode(transcoder, value)
    }

    #[inline]
    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<T> {
        self.inner.delegate().decode(transcoder, data)
    }
}

/// The self-reference handed to a [`recursive`] builder.
///
/// Using it after every [`Recursive`] handle is dropped fails with
/// [`Error::DetachedRecursive`](crate::Error::DetachedRecursive).
pub struct RecursiveRef<D: 'static, T: 'static> {
    inner: Weak<Inner<D, T>>,
}

impl<D: 'static, T: 'static> Clone for RecursiveRef<D, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<D: 'static, T: 'static> RecursiveRef<D, T> {
    fn upgrade(&self) -> Result<Arc<Inner<D, T>>> {
        self.inner.upgrade().ok_or_else(detached_recursive)
    }
}

impl<D: 'static, T: 'static> Codec for RecursiveRef<D, T> {
    type Value = T;

    /// A detached reference has no absent value.
    fn absent(&self) -> Option<T> {
        self.inner.upgrade().and_then(|inner| inner.delegate().absent())
    }
}

impl<D: 'static, T: 'static> Transcode<D> for RecursiveRef<D, T> {
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &T) -> Result<D> {
        self.upgrade()?.delegate().encode(transcoder, value)
    }

    #[inline]
    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<T> {
        self.upgrade()?.delegate().decode(transcoder, data)
    }
}

type Factory<D, T> = Box<dyn Fn() -> BoxedCodec<D, T> + Send + Sync>;

/// A codec obtained from a factory on first use.
///
/// Lets codecs stored in statics refer to each other regardless of initialization
/// order.
pub struct ForwardRef<D: 'static, T: 'static> {
    factory: Factory<D, T>,
    delegate: OnceLock<BoxedCodec<D, T>>,
}

/// Defer to the codec returned by `factory`, resolved once on first use.
pub fn forward_ref<D, T, F, C>(factory: F) -> ForwardRef<D, T>
where
    D: 'static,
    T: 'static,
    F: Fn() -> C + Send + Sync + 'static,
    C: Transcode<D, Value = T> + Send + Sync + 'static,
{
    ForwardRef {
        factory: Box::new(move || -> BoxedCodec<D, T> { Box::new(factory()) }),
        delegate: OnceLock::new(),
    }
}

impl<D: 'static, T: 'static> ForwardRef<D, T> {
    fn delegate(&self) -> &BoxedCodec<D, T> {
        self.delegate.get_or_init(|| {
            debug!(
                value = core::any::type_name::<T>(),
                "resolving forward reference"
            );
            (self.factory)()
        })
    }
}

impl<D: 'static, T: 'static> Codec for ForwardRef<D, T> {
    type Value = T;

    fn absent(&self) -> Option<T> {
        self.delegate().absent()
    }
}

impl<D: 'static, T: 'static> Transcode<D> for ForwardRef<D, T> {
    #[inline]
    fn encode(&self, transcoder: &dyn Transcoder<D>, value: &T) -> Result<D> {
        self.delegate().encode(transcoder, value)
    }

    #[inline]
    fn decode(&self, transcoder: &dyn Transcoder<D>, data: &D) -> Result<T> {
        self.delegate().decode(transcoder, data)
    }
}
