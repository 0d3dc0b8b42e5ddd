use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use tracing::trace;

use crate::{CopyOperations, Deleter, ERR_EMPTY_DEREF, UniqueImplPtr};

/// An owning pointer that gives a hidden implementation type value semantics.
///
/// Hold an `ImplPtr` of a private implementation type as the only field of a public type and
/// that public type can be cloned, cloned into, moved and dropped like a plain value, without
/// any of the implementation type's details showing up in its public API.
///
/// Copying is performed by the [`CopyOperations`] the pointer was created with and releasing by
/// its [`Deleter`]. Both are captured at creation time and carried over to every clone:
///
/// * [`Clone::clone()`] constructs a brand new payload from the current one.
/// * [`Clone::clone_from()`] assigns into the existing payload in place, reusing its allocation.
///   If the destination no longer owns a payload (see [`take()`](Self::take)), it constructs a
///   new one instead.
///
/// Create instances via [`make_impl()`][crate::make_impl], which uses the default operations, or
/// via [`from_raw_parts()`](Self::from_raw_parts) when custom operations are required.
///
/// For implementation types that must not be copied, use [`UniqueImplPtr`] instead.
///
/// # Examples
///
/// ```rust
/// use impl_ptr::{ImplPtr, make_impl};
///
/// #[derive(Clone, Debug)]
/// struct Implementation {
///     name: String,
/// }
///
/// #[derive(Debug)]
/// pub struct Widget {
///     inner: ImplPtr<Implementation>,
/// }
///
/// impl Widget {
///     pub fn new(name: &str) -> Self {
///         Self {
///             inner: make_impl(Implementation {
///                 name: name.to_string(),
///             }),
///         }
///     }
///
///     pub fn name(&self) -> &str {
///         &self.inner.name
///     }
/// }
///
/// impl Clone for Widget {
///     fn clone(&self) -> Self {
///         Self {
///             inner: self.inner.clone(),
///         }
///     }
///
///     fn clone_from(&mut self, source: &Self) {
///         self.inner.clone_from(&source.inner);
///     }
/// }
///
/// let original = Widget::new("first");
/// let mut other = Widget::new("second");
///
/// other.clone_from(&original);
/// assert_eq!(other.name(), "first");
/// ```
///
/// # Empty state
///
/// [`take()`](Self::take) moves the payload out into a new `ImplPtr`, leaving the original
/// empty. An empty `ImplPtr` may be dropped, cloned into or inspected via
/// [`is_empty()`](Self::is_empty), [`get()`](Self::get) and [`get_mut()`](Self::get_mut).
/// Dereferencing it via [`Deref`] or [`DerefMut`] is a programming error and panics.
///
/// # Thread safety
///
/// An `ImplPtr` is [`Send`] and [`Sync`] exactly when `T` is, just like a `Box<T>`.
pub struct ImplPtr<T> {
    // `None` only after the payload has been moved out via `take()`.
    ptr: Option<NonNull<T>>,

    deleter: Deleter<T>,
    ops: CopyOperations<T>,

    _owns_payload: PhantomData<T>,
}

impl<T> ImplPtr<T> {
    /// Takes ownership of an already allocated payload.
    ///
    /// This is the building block for factory functions. Prefer
    /// [`make_impl()`][crate::make_impl] unless the payload needs custom copy or delete
    /// operations.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    ///
    /// 1. `ptr` refers to an initialized `T` that nothing else owns or accesses afterwards.
    /// 2. `deleter` can release `ptr`, as well as every payload returned by `ops.construct`.
    /// 3. `deleter` and `ops` may be invoked from any thread the `ImplPtr` is sent to.
    #[must_use]
    pub unsafe fn from_raw_parts(
        ptr: NonNull<T>,
        deleter: Deleter<T>,
        ops: CopyOperations<T>,
    ) -> Self {
        Self {
            ptr: Some(ptr),
            deleter,
            ops,
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

    /// Moves the payload out into a new `ImplPtr`, leaving this one empty.
    ///
    /// The new instance carries the same deleter and copy operations. No allocation takes place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use impl_ptr::make_impl;
    ///
    /// let mut original = make_impl(42_u64);
    /// let moved = original.take();
    ///
    /// assert!(original.is_empty());
    /// assert_eq!(*moved, 42);
    ///
    /// // An empty instance can be populated again by cloning into it.
    /// original.clone_from(&moved);
    /// assert_eq!(*original, 42);
    /// ```
    #[must_use]
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.ptr.take(),
            deleter: self.deleter,
            ops: self.ops,
            _owns_payload: PhantomData,
        }
    }

    /// The deleter used to release the payload.
    #[must_use]
    #[inline]
    pub fn deleter(&self) -> Deleter<T> {
        self.deleter
    }

    /// The operations used to copy the payload.
    #[must_use]
    #[inline]
    pub fn operations(&self) -> CopyOperations<T> {
        self.ops
    }

    /// Converts this instance into a [`UniqueImplPtr`] that owns the same payload.
    ///
    /// The copy operations are discarded, the deleter is kept. No allocation takes place.
    #[must_use]
    pub fn into_unique(mut self) -> UniqueImplPtr<T> {
        match self.ptr.take() {
            // SAFETY: Ownership of the payload moves from `self` (now empty, so dropping it is a
            // no-op) to the new instance, together with the deleter that can release it.
            Some(ptr) => unsafe { UniqueImplPtr::from_raw_parts(ptr, self.deleter) },
            None => UniqueImplPtr::empty(self.deleter),
        }
    }

    /// Creates a new instance that owns a copy of the payload and shares the operations.
    ///
    /// If this instance is empty, so is the result.
    fn duplicate(&self) -> Self {
        let ptr = self.get().map(|payload| {
            trace!("cloning impl payload via construct operation");
            self.ops.construct(payload)
        });

        Self {
            ptr,
            deleter: self.deleter,
            ops: self.ops,
            _owns_payload: PhantomData,
        }
    }

    fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: We owned the payload and nothing can reach it anymore, as we just cleared
            // our only pointer to it. The deleter was promised to be compatible at creation.
            unsafe { self.deleter.delete(ptr) };
        }
    }
}

impl<T> Clone for ImplPtr<T> {
    fn clone(&self) -> Self {
        self.duplicate()
    }

    fn clone_from(&mut self, source: &Self) {
        let Some(source_payload) = source.get() else {
            // Mirror the source: there is nothing to copy from, so we end up empty as well.
            trace!("cloning from an empty impl pointer, releasing destination payload");
            self.release();
            return;
        };

        match self.ptr {
            Some(mut existing) => {
                trace!("cloning impl payload in place via assign operation");

                // SAFETY: We own the payload and `&mut self` guarantees exclusive access. It cannot
                // alias `source_payload` because two instances never share a payload.
                let destination = unsafe { existing.as_mut() };
                self.ops.assign(destination, source_payload);
            }
            None => {
                trace!("cloning impl payload into empty destination via construct operation");

                // If `construct` panics we remain empty, which is a valid state.
                self.ptr = Some(self.ops.construct(source_payload));
            }
        }
    }
}

impl<T> Deref for ImplPtr<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.get().expect(ERR_EMPTY_DEREF)
    }
}

impl<T> DerefMut for ImplPtr<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.get_mut().expect(ERR_EMPTY_DEREF)
    }
}

impl<T> Drop for ImplPtr<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: fmt::Debug> fmt::Debug for ImplPtr<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(payload) => f.debug_tuple("ImplPtr").field(payload).finish(),
            None => f.write_str("ImplPtr(<empty>)"),
        }
    }
}

// SAFETY: The payload is exclusively owned, so sending the pointer is sending the payload. The
// deleter and copy operations are plain functions, promised to be callable from any thread.
unsafe impl<T: Send> Send for ImplPtr<T> {}

// SAFETY: Shared access to the pointer only ever hands out shared access to the payload.
unsafe impl<T: Sync> Sync for ImplPtr<T> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::items_after_statements,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::make_impl;

    assert_impl_all!(ImplPtr<String>: Clone, Send, Sync);
    assert_not_impl_any!(ImplPtr<Rc<String>>: Send, Sync);
    assert_not_impl_any!(ImplPtr<Cell<u32>>: Sync);

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    struct Calls {
        construct: usize,
        assign: usize,
        delete: usize,
    }

    thread_local! {
        static CALLS: Cell<Calls> = const {
            Cell::new(Calls {
                construct: 0,
                assign: 0,
                delete: 0,
            })
        };
    }

    fn calls() -> Calls {
        CALLS.get()
    }

    fn record(f: impl FnOnce(&mut Calls)) {
        let mut calls = CALLS.get();
        f(&mut calls);
        CALLS.set(calls);
    }

    fn counting_construct(source: &String) -> NonNull<String> {
        record(|c| c.construct = c.construct.wrapping_add(1));
        CopyOperations::<String>::boxed().construct(source)
    }

    fn counting_assign(destination: &mut String, source: &String) {
        record(|c| c.assign = c.assign.wrapping_add(1));
        CopyOperations::<String>::boxed().assign(destination, source);
    }

    unsafe fn counting_delete(ptr: NonNull<String>) {
        record(|c| c.delete = c.delete.wrapping_add(1));
        unsafe { Deleter::<String>::boxed().delete(ptr) };
    }

    fn counting(value: &str) -> ImplPtr<String> {
        let ptr = NonNull::from(Box::leak(Box::new(value.to_string())));

        unsafe {
            ImplPtr::from_raw_parts(
                ptr,
                Deleter::new(counting_delete),
                CopyOperations::new(counting_construct, counting_assign),
            )
        }
    }

    #[test]
    fn smoke_test() {
        let mut ptr = make_impl("hello".to_string());

        assert!(!ptr.is_empty());
        assert_eq!(&*ptr, "hello");

        ptr.push_str(", world");
        assert_eq!(ptr.get().map(String::as_str), Some("hello, world"));
    }

    #[test]
    fn clone_does_not_alias() {
        let original = make_impl(vec![1, 2, 3]);
        let mut copy = original.clone();

        assert_eq!(*copy, *original);
        assert_ne!(
            NonNull::from(&*copy),
            NonNull::from(&*original),
            "a clone must own a separate payload"
        );

        copy.push(4);
        assert_eq!(*original, vec![1, 2, 3]);
        assert_eq!(*copy, vec![1, 2, 3, 4]);
    }

    #[test]
    fn clone_uses_construct_operation() {
        let original = counting("payload");
        let copy = original.clone();

        assert_eq!(&*copy, "payload");
        assert_eq!(
            calls(),
            Calls {
                construct: 1,
                ..Calls::default()
            }
        );
    }

    #[test]
    fn clone_from_into_live_destination_assigns_in_place() {
        let source = counting("source");
        let mut destination = counting("destination");
        let payload_before = NonNull::from(&*destination);

        destination.clone_from(&source);

        assert_eq!(&*destination, "source");
        assert_eq!(NonNull::from(&*destination), payload_before);
        assert_eq!(
            calls(),
            Calls {
                assign: 1,
                ..Calls::default()
            }
        );
    }

    #[test]
    fn clone_from_into_empty_destination_constructs_once() {
        let source = counting("source");
        let mut destination = counting("destination");
        drop(destination.take());

        assert_eq!(calls().delete, 1);

        destination.clone_from(&source);

        assert!(!destination.is_empty());
        assert_eq!(&*destination, "source");
        assert_eq!(
            calls(),
            Calls {
                construct: 1,
                assign: 0,
                delete: 1,
            }
        );
    }

    #[test]
    fn clone_from_empty_source_empties_destination() {
        let mut source = counting("source");
        let _moved = source.take();
        let mut destination = counting("destination");

        destination.clone_from(&source);

        assert!(destination.is_empty());
        assert_eq!(calls().delete, 1);
    }

    #[test]
    fn clone_of_empty_is_empty() {
        let mut original = counting("payload");
        let _moved = original.take();

        let copy = original.clone();

        assert!(copy.is_empty());
        assert_eq!(calls().construct, 0);
    }

    #[test]
    fn clone_from_repeated_copy_is_stable() {
        let source = make_impl("stable".to_string());
        let mut destination = source.clone();

        // The closest safe Rust gets to self-assignment: assigning equal contents in place.
        let snapshot = destination.clone();
        destination.clone_from(&snapshot);
        destination.clone_from(&snapshot);

        assert_eq!(&*destination, "stable");
        assert_eq!(&*source, "stable");
    }

    #[test]
    fn take_transfers_payload_without_operations() {
        let mut original = counting("payload");
        let payload_address = NonNull::from(&*original);

        let moved = original.take();

        assert!(original.is_empty());
        assert!(original.get().is_none());
        assert_eq!(&*moved, "payload");
        assert_eq!(NonNull::from(&*moved), payload_address);
        assert_eq!(calls(), Calls::default());
    }

    #[test]
    fn drop_deletes_exactly_once() {
        let original = counting("payload");
        let copy = original.clone();

        drop(original);
        assert_eq!(calls().delete, 1);

        drop(copy);
        assert_eq!(calls().delete, 2);
    }

    #[test]
    fn dropping_empty_does_not_delete() {
        let mut original = counting("payload");
        let moved = original.take();

        drop(original);
        assert_eq!(calls().delete, 0);

        drop(moved);
        assert_eq!(calls().delete, 1);
    }

    #[test]
    fn into_unique_keeps_payload_and_deleter() {
        let original = counting("payload");
        let payload_address = NonNull::from(&*original);

        let unique = original.into_unique();

        assert_eq!(&*unique, "payload");
        assert_eq!(NonNull::from(&*unique), payload_address);
        assert_eq!(calls().delete, 0);

        drop(unique);
        assert_eq!(calls().delete, 1);
    }

    #[test]
    fn into_unique_of_empty_is_empty() {
        let mut original = counting("payload");
        let _moved = original.take();

        let unique = original.into_unique();

        assert!(unique.is_empty());
    }

    #[test]
    fn operations_are_carried_to_clones() {
        let original = counting("payload");
        let copy = original.clone();
        let copy_of_copy = copy.clone();

        assert_eq!(calls().construct, 2);

        drop(copy_of_copy);
        drop(copy);
        drop(original);

        assert_eq!(calls().delete, 3);
    }

    #[test]
    fn get_mut_allows_mutation() {
        let mut ptr = make_impl(10_u32);

        if let Some(value) = ptr.get_mut() {
            *value = 20;
        }

        assert_eq!(*ptr, 20);
    }

    #[test]
    #[should_panic]
    fn deref_empty_panics() {
        let mut original = make_impl(1_u8);
        let _moved = original.take();

        assert_eq!(*original, 1);
    }

    #[test]
    #[should_panic]
    fn deref_mut_empty_panics() {
        let mut original = make_impl(1_u8);
        let _moved = original.take();

        *original = 2;
    }

    #[test]
    fn panicking_construct_leaves_destination_empty() {
        struct Fragile;

        impl Clone for Fragile {
            fn clone(&self) -> Self {
                panic!("refusing to clone");
            }
        }

        let source = make_impl(Fragile);
        let mut destination = make_impl(Fragile);
        let _moved = destination.take();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            destination.clone_from(&source);
        }));

        assert!(result.is_err());
        assert!(destination.is_empty());
    }

    #[test]
    fn debug_shows_payload_or_empty() {
        let mut ptr = make_impl(7_u32);
        assert_eq!(format!("{ptr:?}"), "ImplPtr(7)");

        let _moved = ptr.take();
        assert_eq!(format!("{ptr:?}"), "ImplPtr(<empty>)");
    }

    #[test]
    fn zero_sized_payloads_are_supported() {
        #[derive(Clone, Debug, PartialEq)]
        struct Marker;

        let original = make_impl(Marker);
        let copy = original.clone();

        assert_eq!(*copy, Marker);
    }
}
