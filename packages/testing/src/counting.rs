use std::cell::Cell;
use std::ptr::NonNull;

use impl_ptr::{CopyOperations, Deleter, ImplPtr, UniqueImplPtr};

/// How many times each instrumented operation has run on the current thread.
///
/// Counts are tracked per thread, so tests running in parallel do not disturb each other.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "private helper package, constructed via struct literals in tests"
)]
pub struct OperationCounts {
    /// Number of payloads constructed as copies of another payload.
    pub construct: usize,

    /// Number of payloads assigned in place from another payload.
    pub assign: usize,

    /// Number of payloads released.
    pub delete: usize,
}

thread_local! {
    static COUNTS: Cell<OperationCounts> = const {
        Cell::new(OperationCounts {
            construct: 0,
            assign: 0,
            delete: 0,
        })
    };
}

/// Returns the operation counts recorded on the current thread.
#[must_use]
pub fn operation_counts() -> OperationCounts {
    COUNTS.get()
}

/// Resets the operation counts recorded on the current thread to zero.
pub fn reset_operation_counts() {
    COUNTS.set(OperationCounts::default());
}

/// Creates an [`ImplPtr`] whose copy and delete operations are counted.
///
/// The operations otherwise behave like the defaults used by [`impl_ptr::make_impl()`].
#[must_use]
pub fn counting_impl<T: Clone>(value: T) -> ImplPtr<T> {
    let ptr = NonNull::from(Box::leak(Box::new(value)));

    // SAFETY: The payload is a freshly leaked Box. The counting operations allocate and release
    // via Box, just like the defaults they wrap.
    unsafe {
        ImplPtr::from_raw_parts(
            ptr,
            Deleter::new(counting_delete::<T>),
            CopyOperations::new(counting_construct::<T>, counting_assign::<T>),
        )
    }
}

/// Creates a [`UniqueImplPtr`] whose delete operation is counted.
#[must_use]
pub fn counting_unique_impl<T>(value: T) -> UniqueImplPtr<T> {
    let ptr = NonNull::from(Box::leak(Box::new(value)));

    // SAFETY: The payload is a freshly leaked Box and the counting deleter releases via Box.
    unsafe { UniqueImplPtr::from_raw_parts(ptr, Deleter::new(counting_delete::<T>)) }
}

fn record(update: impl FnOnce(&mut OperationCounts)) {
    let mut counts = COUNTS.get();
    update(&mut counts);
    COUNTS.set(counts);
}

fn counting_construct<T: Clone>(source: &T) -> NonNull<T> {
    record(|counts| counts.construct = counts.construct.wrapping_add(1));
    CopyOperations::<T>::boxed().construct(source)
}

fn counting_assign<T: Clone>(destination: &mut T, source: &T) {
    record(|counts| counts.assign = counts.assign.wrapping_add(1));
    CopyOperations::<T>::boxed().assign(destination, source);
}

/// # Safety
///
/// `ptr` must have been obtained from a leaked `Box<T>` and must not be used afterwards.
unsafe fn counting_delete<T>(ptr: NonNull<T>) {
    record(|counts| counts.delete = counts.delete.wrapping_add(1));

    // SAFETY: Forwarding the caller's guarantee that the payload came from a Box.
    unsafe { Deleter::<T>::boxed().delete(ptr) };
}
