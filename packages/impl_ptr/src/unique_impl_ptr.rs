use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::{Deleter, ERR_EMPTY_DEREF};

/// A move-only counterpart of [`ImplPtr`][crate::ImplPtr].
///
/// Use this for implementation types that are unsafe or meaningless to copy. It owns its payload
/// exclusively and releases it via its [`Deleter`], but it never implements [`Clone`], so neither
/// can any public type that holds it as a field.
///
/// Create instances via [`make_unique_impl()`][crate::make_unique_impl], via
/// [`from_raw_parts()`](Self::from_raw_parts) when a custom deleter is required, or by giving
/// up copyability of an existing [`ImplPtr`][crate::ImplPtr] via
/// [`into_unique()`][crate::ImplPtr::into_unique].
///
/// # Examples
///
/// ```rust
/// use impl_ptr::{UniqueImplPtr, make_unique_impl};
///
/// struct Connection {
///     id: u32,
/// }
///
/// #[derive(Debug)]
/// pub struct Session {
///     inner: UniqueImplPtr<Connection>,
/// }
///
/// impl Session {
///     pub fn new(id: u32) -> Self {
///         Self {
///             inner: make_unique_impl(Connection { id }),
///         }
///     }
///
///     pub fn id(&self) -> u32 {
///         self.inner.id
///     }
/// }
///
/// let session = Session::new(5);
/// let moved = session;
/// assert_eq!(moved.id(), 5);
/// ```
///
/// # Thread safety
///
/// A `UniqueImplPtr` is [`Send`] and [`Sync`] exactly when `T` is, just like a `Box<T>`.
pub struct UniqueImplPtr<T> {
    // `None` only after the payload has been moved out via `take()`.
    ptr: Option<NonNull<T>>,

    deleter: Deleter<T>,

    _owns_payload: PhantomData<T>,
}

impl<T> UniqueImplPtr<T> {
    /// Takes ownership of an already allocated payload.
    ///
    /// Prefer [`make_unique_impl()`][crate::make_unique_impl] unless the payload needs a custom
    /// deleter.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    ///
    /// 1. `ptr` refers to an initialized `T` that nothing else owns or accesses afterwards.
    /// 2. `deleter` can release `ptr`.
    /// 3. `deleter` may be invoked from any thread the `UniqueImplPtr` is sent to.
    #[must_use]
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, deleter: Deleter<T>) -> Self {
        Self {
            ptr: Some(ptr),
            deleter,
            _owns_payload: PhantomData,
        }
    }

    pub(crate) fn empty(deleter: Deleter<T>) -> Self {
        Self {
            ptr: None,
            deleter,
            _owns_payload: PhantomData,
        }
    }

    /// Whether the payload has been moved out of this instance via [`take()`](Self::take).
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Returns a shared reference to the payload, or `None` if this instance is empty.
    #[must_use]
    #[inline]
    pub fn get(&self) -> Option<&T> {
        // SAFETY: A present pointer always refers to an initialized payload that we own,
        // and `&self` ensures no exclusive reference to it exists.
        self.ptr.map(|ptr| unsafe { ptr.as_ref() })
    }

    /// Returns an exclusive reference to the payload, or `None` if this instance is empty.
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: A present pointer always refers to an initialized payload that we own,
        // and `&mut self` ensures no other reference to it exists.
        self.ptr.map(|mut ptr| unsafe { ptr.as_mut() })
    }

    /// Moves the payload out into a new `UniqueImplPtr`, leaving this one empty.
    #[must_use]
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.ptr.take(),
            deleter: self.deleter,
            _owns_payload: PhantomData,
        }
    }

    /// The deleter used to release the payload.
    #[must_use]
    #[inline]
    pub fn deleter(&self) -> Deleter<T> {
        self.deleter
    }
}

impl<T> Deref for UniqueImplPtr<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.get().expect(ERR_EMPTY_DEREF)
    }
}

impl<T> DerefMut for UniqueImplPtr<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.get_mut().expect(ERR_EMPTY_DEREF)
    }
}

impl<T> Drop for UniqueImplPtr<T> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: We owned the payload and just cleared our only pointer to it. The deleter
            // was promised to be compatible at creation.
            unsafe { self.deleter.delete(ptr) };
        }
    }
}

// The payload is not required to be `Debug`, as move-only implementation types frequently
// hold handles that are not.
impl<T> fmt::Debug for UniqueImplPtr<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueImplPtr")
            .field("is_empty", &self.is_empty())
            .finish_non_exhaustive()
    }
}

// SAFETY: The payload is exclusively owned, so sending the pointer is sending the payload. The
// deleter is a plain function, promised to be callable from any thread.
unsafe impl<T: Send> Send for UniqueImplPtr<T> {}

// SAFETY: Shared access to the pointer only ever hands out shared access to the payload.
unsafe impl<T: Sync> Sync for UniqueImplPtr<T> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::undocumented_unsafe_blocks,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::make_unique_impl;

    assert_impl_all!(UniqueImplPtr<String>: Send, Sync);
    assert_not_impl_any!(UniqueImplPtr<String>: Clone, Copy);
    assert_not_impl_any!(UniqueImplPtr<Rc<String>>: Send, Sync);

    thread_local! {
        static DELETES: Cell<usize> = const { Cell::new(0) };
    }

    unsafe fn counting_delete(ptr: NonNull<u64>) {
        DELETES.set(DELETES.get().wrapping_add(1));
        unsafe { Deleter::<u64>::boxed().delete(ptr) };
    }

    fn counting(value: u64) -> UniqueImplPtr<u64> {
        let ptr = NonNull::from(Box::leak(Box::new(value)));
        unsafe { UniqueImplPtr::from_raw_parts(ptr, Deleter::new(counting_delete)) }
    }

    #[test]
    fn smoke_test() {
        let mut ptr = make_unique_impl("unique".to_string());

        assert!(!ptr.is_empty());
        assert_eq!(&*ptr, "unique");

        ptr.push('!');
        assert_eq!(ptr.get().map(String::as_str), Some("unique!"));
    }

    #[test]
    fn take_transfers_payload() {
        let mut original = counting(101);
        let payload_address = NonNull::from(&*original);

        let moved = original.take();

        assert!(original.is_empty());
        assert!(original.get_mut().is_none());
        assert_eq!(*moved, 101);
        assert_eq!(NonNull::from(&*moved), payload_address);
        assert_eq!(DELETES.get(), 0);
    }

    #[test]
    fn drop_deletes_exactly_once() {
        let mut original = counting(1);
        let moved = original.take();

        drop(original);
        assert_eq!(DELETES.get(), 0);

        drop(moved);
        assert_eq!(DELETES.get(), 1);
    }

    #[test]
    fn move_assignment_releases_previous_payload() {
        let mut destination = counting(1);
        let source = counting(2);
        assert_eq!(*destination, 1);

        destination = source;

        assert_eq!(*destination, 2);
        assert_eq!(DELETES.get(), 1);
    }

    #[test]
    #[should_panic]
    fn deref_empty_panics() {
        let mut original = make_unique_impl(1_u8);
        let _moved = original.take();

        assert_eq!(*original, 1);
    }

    #[test]
    fn payload_does_not_need_to_be_clone_or_debug() {
        struct NotCloneable {
            value: u32,
        }

        let ptr = make_unique_impl(NotCloneable { value: 9 });

        assert_eq!(ptr.value, 9);
        assert!(format!("{ptr:?}").starts_with("UniqueImplPtr"));
    }
}
