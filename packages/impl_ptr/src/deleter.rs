use std::fmt;
use std::ptr::NonNull;

/// Remembers how to release the payload of an [`ImplPtr`] or [`UniqueImplPtr`].
///
/// A deleter is a plain function pointer, so it is [`Copy`] and travels alongside every clone
/// of the wrapper that owns it. The default deleter created by [`Deleter::boxed()`] expects the
/// payload to have been allocated via [`Box`], which is what [`make_impl()`] and
/// [`make_unique_impl()`] do.
///
/// Custom deleters are useful when the payload comes from a custom allocator or when releasing
/// it needs to be observed (e.g. for logging or instrumentation).
///
/// # Examples
///
/// ```rust
/// use std::ptr::NonNull;
///
/// use impl_ptr::{Deleter, UniqueImplPtr};
///
/// unsafe fn release_noisily(ptr: NonNull<String>) {
///     println!("releasing payload");
///
///     // SAFETY: Forwarding the guarantee that the payload came from a Box.
///     unsafe { Deleter::<String>::boxed().delete(ptr) };
/// }
///
/// let ptr = NonNull::from(Box::leak(Box::new("hidden".to_string())));
///
/// // SAFETY: The payload was allocated via Box, which `release_noisily` expects.
/// let owned = unsafe { UniqueImplPtr::from_raw_parts(ptr, Deleter::new(release_noisily)) };
///
/// assert_eq!(&*owned, "hidden");
/// ```
///
/// [`ImplPtr`]: crate::ImplPtr
/// [`UniqueImplPtr`]: crate::UniqueImplPtr
/// [`make_impl()`]: crate::make_impl
/// [`make_unique_impl()`]: crate::make_unique_impl
pub struct Deleter<T> {
    delete_fn: unsafe fn(NonNull<T>),
}

impl<T> Deleter<T> {
    /// Creates a deleter that releases payloads by calling `delete_fn`.
    #[must_use]
    #[inline]
    pub const fn new(delete_fn: unsafe fn(NonNull<T>)) -> Self {
        Self { delete_fn }
    }

    /// Creates a deleter that releases payloads allocated via [`Box`].
    ///
    /// The payload is dropped in place and its memory returned to the global allocator.
    #[must_use]
    #[inline]
    pub const fn boxed() -> Self {
        Self {
            delete_fn: delete_boxed::<T>,
        }
    }

    /// Releases the payload at `ptr`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    ///
    /// 1. `ptr` refers to an initialized `T` allocated in the manner this deleter expects.
    /// 2. The caller owns the payload and nothing will access it after this call.
    #[inline]
    pub unsafe fn delete(self, ptr: NonNull<T>) {
        // SAFETY: Forwarding the caller's guarantees.
        unsafe { (self.delete_fn)(ptr) }
    }
}

impl<T> Clone for Deleter<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Deleter<T> {}

impl<T> fmt::Debug for Deleter<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deleter")
            .field("delete_fn", &self.delete_fn)
            .finish()
    }
}

/// # Safety
///
/// `ptr` must have been obtained from a `Box<T>` whose ownership was given up
/// (via `Box::leak()` or `Box::into_raw()`) and must not be used afterwards.
unsafe fn delete_boxed<T>(ptr: NonNull<T>) {
    // SAFETY: Forwarding the caller's guarantee that this pointer came from a leaked Box.
    drop(unsafe { Box::from_raw(ptr.as_ptr()) });
}
