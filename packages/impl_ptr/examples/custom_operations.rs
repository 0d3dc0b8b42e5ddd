//! Example of supplying custom copy and delete operations to `ImplPtr`.
//!
//! The operations here log every invocation via `tracing` before delegating to the default
//! Box-based operations. The same approach applies to payloads that come from a custom
//! allocator: supply a `construct` function that allocates from it and a deleter that returns
//! the memory to it.
//!
//! Run with `cargo run --example custom_operations` to see the events.

use std::ptr::NonNull;

use impl_ptr::{CopyOperations, Deleter, ImplPtr};
use tracing::{Level, info};

#[derive(Clone, Debug)]
struct Settings {
    name: String,
    retries: u32,
}

fn logging_construct(source: &Settings) -> NonNull<Settings> {
    info!(name = %source.name, "constructing copy of settings");
    CopyOperations::boxed().construct(source)
}

fn logging_assign(destination: &mut Settings, source: &Settings) {
    info!(from = %source.name, to = %destination.name, "assigning settings in place");
    CopyOperations::boxed().assign(destination, source);
}

/// # Safety
///
/// `ptr` must have been obtained from a leaked `Box<Settings>` and must not be used afterwards.
unsafe fn logging_delete(ptr: NonNull<Settings>) {
    // SAFETY: The caller guarantees the pointer refers to a live payload.
    let name = unsafe { ptr.as_ref() }.name.clone();
    info!(%name, "releasing settings");

    // SAFETY: Forwarding the caller's guarantee that the payload came from a Box.
    unsafe { Deleter::boxed().delete(ptr) };
}

fn logging_settings(name: &str, retries: u32) -> ImplPtr<Settings> {
    let ptr = NonNull::from(Box::leak(Box::new(Settings {
        name: name.to_string(),
        retries,
    })));

    // SAFETY: The payload is a freshly leaked Box and every logging operation allocates and
    // releases via Box.
    unsafe {
        ImplPtr::from_raw_parts(
            ptr,
            Deleter::new(logging_delete),
            CopyOperations::new(logging_construct, logging_assign),
        )
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .init();

    let primary = logging_settings("primary", 3);

    // Constructs a new payload.
    let mut secondary = primary.clone();
    secondary.name = "secondary".to_string();
    secondary.retries = 5;

    // Assigns in place, no new payload is constructed.
    secondary.clone_from(&primary);
    assert_eq!(secondary.retries, 3);

    // Leaves `secondary` empty, so the next clone_from has to construct again.
    let taken = secondary.take();
    secondary.clone_from(&taken);

    println!("{primary:?}, {secondary:?}, {taken:?}");

    // All three payloads are released here, each with a log event.
}
