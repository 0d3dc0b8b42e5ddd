use std::fmt;
use std::ptr::NonNull;

/// The pair of operations an [`ImplPtr`] uses to copy its payload.
///
/// * `construct` allocates a brand new payload as a copy of an existing one. It is used when
///   cloning an [`ImplPtr`] and when cloning into an [`ImplPtr`] whose payload has been taken.
/// * `assign` overwrites the contents of an existing payload from another one, reusing the
///   destination's allocation. It is used by [`Clone::clone_from()`] whenever the destination
///   still owns a payload.
///
/// The default operations created by [`CopyOperations::boxed()`] allocate via [`Box`] and
/// delegate to the payload's own [`Clone`] implementation.
///
/// # Examples
///
/// ```rust
/// use impl_ptr::{CopyOperations, Deleter};
///
/// let ops = CopyOperations::<Vec<u8>>::boxed();
///
/// let source = vec![1, 2, 3];
/// let copy = ops.construct(&source);
///
/// // SAFETY: We own the fresh copy and it came from the boxed operations.
/// let copy_ref = unsafe { copy.as_ref() };
/// assert_eq!(copy_ref, &source);
///
/// // SAFETY: The boxed deleter matches the boxed copy operations and we are done with the copy.
/// unsafe { Deleter::boxed().delete(copy) };
/// ```
///
/// [`ImplPtr`]: crate::ImplPtr
pub struct CopyOperations<T> {
    construct_fn: fn(&T) -> NonNull<T>,
    assign_fn: fn(&mut T, &T),
}

impl<T> CopyOperations<T> {
    /// Creates a set of copy operations from the given functions.
    ///
    /// Nothing here is unsafe in itself. The pairing of `construct` with a compatible
    /// [`Deleter`][crate::Deleter] is established (and promised) when the operations are handed
    /// to [`ImplPtr::from_raw_parts()`][crate::ImplPtr::from_raw_parts].
    #[must_use]
    #[inline]
    pub const fn new(construct: fn(&T) -> NonNull<T>, assign: fn(&mut T, &T)) -> Self {
        Self {
            construct_fn: construct,
            assign_fn: assign,
        }
    }

    /// Allocates a new payload as a copy of `source`.
    ///
    /// The caller becomes the owner of the returned payload and is responsible for releasing it.
    #[must_use]
    #[inline]
    pub fn construct(&self, source: &T) -> NonNull<T> {
        (self.construct_fn)(source)
    }

    /// Overwrites the contents of `destination` with a copy of `source`.
    #[inline]
    pub fn assign(&self, destination: &mut T, source: &T) {
        (self.assign_fn)(destination, source);
    }
}

impl<T: Clone> CopyOperations<T> {
    /// Creates copy operations that allocate via [`Box`] and copy via [`Clone`].
    ///
    /// Assignment uses [`Clone::clone_from()`], giving the payload type a chance to reuse
    /// its own resources (e.g. the buffer of a `String`).
    #[must_use]
    #[inline]
    pub const fn boxed() -> Self {
        Self {
            construct_fn: construct_boxed::<T>,
            assign_fn: assign_cloned::<T>,
        }
    }
}

impl<T> Clone for CopyOperations<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CopyOperations<T> {}

impl<T> fmt::Debug for CopyOperations<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOperations")
            .field("construct_fn", &self.construct_fn)
            .field("assign_fn", &self.assign_fn)
            .finish()
    }
}

fn construct_boxed<T: Clone>(source: &T) -> NonNull<T> {
    NonNull::from(Box::leak(Box::new(source.clone())))
}

fn assign_cloned<T: Clone>(destination: &mut T, source: &T) {
    destination.clone_from(source);
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::Deleter;

    assert_impl_all!(CopyOperations<String>: Copy, Send, Sync);

    #[test]
    fn boxed_construct_creates_independent_copy() {
        let ops = CopyOperations::<String>::boxed();
        let source = "original".to_string();

        let mut copy = ops.construct(&source);

        // SAFETY: We exclusively own the fresh copy.
        let copy_mut = unsafe { copy.as_mut() };
        assert_eq!(copy_mut, "original");

        copy_mut.push_str(" with changes");
        assert_eq!(source, "original");

        // SAFETY: The boxed deleter matches the boxed copy operations.
        unsafe { Deleter::boxed().delete(copy) };
    }

    #[test]
    fn boxed_assign_reuses_destination() {
        let ops = CopyOperations::<String>::boxed();

        let mut destination = String::with_capacity(64);
        let buffer_before = destination.as_ptr();

        ops.assign(&mut destination, &"assigned".to_string());

        assert_eq!(destination, "assigned");
        assert_eq!(destination.as_ptr(), buffer_before);
    }

    #[test]
    fn custom_operations_are_invoked() {
        fn construct_doubled(source: &u32) -> NonNull<u32> {
            NonNull::from(Box::leak(Box::new(source.wrapping_mul(2))))
        }

        fn assign_tripled(destination: &mut u32, source: &u32) {
            *destination = source.wrapping_mul(3);
        }

        let ops = CopyOperations::new(construct_doubled, assign_tripled);

        let copy = ops.construct(&5);
        // SAFETY: We own the fresh copy.
        assert_eq!(unsafe { *copy.as_ref() }, 10);
        // SAFETY: The copy came from a Box and we are done with it.
        unsafe { Deleter::boxed().delete(copy) };

        let mut destination = 0;
        ops.assign(&mut destination, &5);
        assert_eq!(destination, 15);
    }
}
