#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Owning pointers that let a public type hide its implementation type while still behaving
//! like a plain value.
//!
//! A public type that keeps all of its state in a private implementation type, held by one of
//! the pointers in this package, gets a stable public API that does not change when the
//! implementation does. The pointers take care of the boilerplate that would otherwise be
//! required to keep such a type cloneable:
//!
//! * [`ImplPtr<T>`] - copyable. Cloning constructs a new payload, cloning into an existing
//!   instance via [`Clone::clone_from()`] assigns in place and reuses the allocation.
//! * [`UniqueImplPtr<T>`] - move-only. Never implements [`Clone`].
//!
//! How a payload is copied and released is decided by the [`CopyOperations`] and [`Deleter`]
//! captured when the pointer is created. The factory functions [`make_impl()`] and
//! [`make_unique_impl()`] use defaults that allocate via [`Box`] and copy via [`Clone`]. Custom
//! operations (e.g. for custom allocators or instrumentation) can be supplied via
//! [`ImplPtr::from_raw_parts()`] and [`UniqueImplPtr::from_raw_parts()`].
//!
//! # Examples
//!
//! ```rust
//! mod widget {
//!     use impl_ptr::{ImplPtr, make_impl};
//!
//!     // Private to the module - none of this leaks into the public API of `Widget`.
//!     #[derive(Clone, Debug)]
//!     struct Implementation {
//!         count: u32,
//!         label: String,
//!     }
//!
//!     #[derive(Debug)]
//!     pub struct Widget {
//!         inner: ImplPtr<Implementation>,
//!     }
//!
//!     impl Widget {
//!         pub fn new(count: u32, label: &str) -> Self {
//!             Self {
//!                 inner: make_impl(Implementation {
//!                     count,
//!                     label: label.to_string(),
//!                 }),
//!             }
//!         }
//!
//!         pub fn count(&self) -> u32 {
//!             self.inner.count
//!         }
//!
//!         pub fn increment(&mut self) {
//!             self.inner.count += 1;
//!         }
//!
//!         pub fn label(&self) -> &str {
//!             &self.inner.label
//!         }
//!     }
//!
//!     impl Clone for Widget {
//!         fn clone(&self) -> Self {
//!             Self {
//!                 inner: self.inner.clone(),
//!             }
//!         }
//!
//!         fn clone_from(&mut self, source: &Self) {
//!             self.inner.clone_from(&source.inner);
//!         }
//!     }
//! }
//!
//! use widget::Widget;
//!
//! let original = Widget::new(1, "first");
//! let mut copy = original.clone();
//! copy.increment();
//!
//! // The copy owns its own implementation object.
//! assert_eq!(original.count(), 1);
//! assert_eq!(copy.count(), 2);
//! assert_eq!(copy.label(), "first");
//! ```
//!
//! # Moving and the empty state
//!
//! Moving a pointer is an ordinary Rust move and the compiler rejects any use of the source
//! afterwards. When a pointer needs to be moved out of a place that remains accessible (e.g. a
//! field behind `&mut`), use `take()`, which leaves an empty instance behind. Empty instances may
//! be dropped or cloned into but dereferencing them panics.
//!
//! # Logging
//!
//! Copy dispatch emits `trace` level events via the `tracing` crate, naming whether a payload
//! was constructed or assigned in place.

mod copy_operations;
mod deleter;
mod factory;
mod impl_ptr;
mod unique_impl_ptr;

pub use copy_operations::CopyOperations;
pub use deleter::Deleter;
pub use factory::*;
pub use impl_ptr::ImplPtr;
pub use unique_impl_ptr::UniqueImplPtr;

pub(crate) const ERR_EMPTY_DEREF: &str =
    "dereferenced an empty impl pointer - its payload was moved out via take()";
