use std::ptr::NonNull;

use crate::{CopyOperations, Deleter, ImplPtr, UniqueImplPtr};

/// Moves `value` to the heap and wraps it in an [`ImplPtr`] with the default operations.
///
/// The payload is allocated via [`Box`], copied via its [`Clone`] implementation and released
/// via [`Deleter::boxed()`]. The `T: Clone` bound is checked where this function is called, so a
/// payload that cannot be copied is rejected at build time instead of at first copy.
///
/// # Examples
///
/// ```rust
/// use impl_ptr::make_impl;
///
/// let ptr = make_impl(vec![1, 2, 3]);
/// assert_eq!(ptr.len(), 3);
/// ```
#[must_use]
pub fn make_impl<T: Clone>(value: T) -> ImplPtr<T> {
    // SAFETY: The payload is a freshly leaked Box that nothing else references. The boxed deleter
    // releases Box allocations, which is also what the boxed copy operations produce.
    unsafe { ImplPtr::from_raw_parts(leak_boxed(value), Deleter::boxed(), CopyOperations::boxed()) }
}

/// Builds the payload via `init` and wraps it in an [`ImplPtr`] with the default operations.
///
/// This is the equivalent of [`make_impl()`] for payloads that are assembled from several
/// constructor arguments.
///
/// # Examples
///
/// ```rust
/// use impl_ptr::make_impl_with;
///
/// #[derive(Clone)]
/// struct Implementation {
///     id: u32,
///     name: String,
/// }
///
/// let (id, name) = (7, "seven");
/// let ptr = make_impl_with(|| Implementation {
///     id,
///     name: name.to_string(),
/// });
///
/// assert_eq!(ptr.id, 7);
/// assert_eq!(ptr.name, "seven");
/// ```
#[must_use]
pub fn make_impl_with<T: Clone>(init: impl FnOnce() -> T) -> ImplPtr<T> {
    make_impl(init())
}

/// Moves `value` to the heap and wraps it in a [`UniqueImplPtr`] with the default deleter.
///
/// # Examples
///
/// ```rust
/// use std::sync::Mutex;
///
/// use impl_ptr::make_unique_impl;
///
/// // Mutex is not Clone, which is fine for the move-only variant.
/// let ptr = make_unique_impl(Mutex::new(5));
/// assert_eq!(*ptr.lock().unwrap(), 5);
/// ```
#[must_use]
pub fn make_unique_impl<T>(value: T) -> UniqueImplPtr<T> {
    // SAFETY: The payload is a freshly leaked Box that nothing else references and the boxed
    // deleter releases Box allocations.
    unsafe { UniqueImplPtr::from_raw_parts(leak_boxed(value), Deleter::boxed()) }
}

/// Builds the payload via `init` and wraps it in a [`UniqueImplPtr`] with the default deleter.
#[must_use]
pub fn make_unique_impl_with<T>(init: impl FnOnce() -> T) -> UniqueImplPtr<T> {
    make_unique_impl(init())
}

fn leak_boxed<T>(value: T) -> NonNull<T> {
    NonNull::from(Box::leak(Box::new(value)))
}
