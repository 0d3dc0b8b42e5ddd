#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in `impl_ptr` packages.
//!
//! * [`CopiableObject`] and [`MoveableObject`] are reference consumers of the pointers: public
//!   types whose only field is a pointer to a private implementation type.
//! * [`counting_impl()`] and [`counting_unique_impl()`] create pointers whose operations are
//!   instrumented, so tests can verify exactly which operations ran.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

mod copiable_object;
mod counting;
mod moveable_object;

pub use copiable_object::*;
pub use counting::*;
pub use moveable_object::*;

/// Runs a test with a timeout to prevent infinite hangs.
///
/// The test runs on a separate thread, which also makes this a convenient way to verify that
/// values can be sent to and used from another thread.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled and
/// the test function is executed directly. This allows mutation testing to properly detect
/// hanging mutations.
///
/// # Panics
///
/// Panics if the test exceeds the timeout (when not in mutation testing mode) and resumes
/// any panic raised by the test itself.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// with_watchdog(|| {
///     // Your test code here
///     assert_eq!(2 + 2, 4);
/// });
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // If this fails, the receiver has timed out and nobody cares about the result.
        drop(tx.send(result));
    });

    // Miri is dramatically slower for thread synchronization.
    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            test_handle.join().expect("Test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("Test exceeded {timeout:?} timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("Test thread disconnected unexpectedly"),
            Err(e) => std::panic::resume_unwind(e),
        },
    }
}
