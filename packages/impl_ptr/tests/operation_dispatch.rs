//! Integration tests verifying which copy and delete operations run for each kind of
//! clone, move and drop.
//!
//! The pointers under test are created with instrumented operations whose invocations are
//! counted per thread, which lets us assert that assigning into a live payload never allocates
//! and that assigning into an empty pointer allocates exactly once.

use impl_ptr::make_impl;
use testing::{
    OperationCounts, counting_impl, counting_unique_impl, operation_counts, reset_operation_counts,
};

#[test]
fn clone_constructs_once() {
    let original = counting_impl(vec![1_u32, 2, 3]);

    let copy = original.clone();

    assert_eq!(*copy, *original);
    assert_eq!(
        operation_counts(),
        OperationCounts {
            construct: 1,
            assign: 0,
            delete: 0,
        }
    );
}

#[test]
fn clone_from_live_destination_reuses_payload() {
    let source = counting_impl("source".to_string());
    let mut destination = counting_impl("a somewhat longer destination".to_string());
    let buffer_before = destination.as_ptr();

    destination.clone_from(&source);

    assert_eq!(&*destination, "source");
    // The default assign operation is `clone_from`, which lets the String reuse its buffer.
    assert_eq!(destination.as_ptr(), buffer_before);
    assert_eq!(
        operation_counts(),
        OperationCounts {
            construct: 0,
            assign: 1,
            delete: 0,
        }
    );
}

#[test]
fn clone_from_empty_destination_constructs_once() {
    let source = counting_impl(64_u64);
    let mut destination = counting_impl(0_u64);

    let moved_out = destination.take();
    drop(moved_out);
    reset_operation_counts();

    destination.clone_from(&source);

    assert_eq!(*destination, 64);
    assert_eq!(
        operation_counts(),
        OperationCounts {
            construct: 1,
            assign: 0,
            delete: 0,
        }
    );
}

#[test]
fn move_runs_no_operations() {
    let mut original = counting_impl("moving".to_string());

    let moved = original.take();
    let moved_again = moved;

    assert!(original.is_empty());
    assert_eq!(&*moved_again, "moving");
    assert_eq!(operation_counts(), OperationCounts::default());
}

#[test]
fn every_payload_is_deleted_exactly_once() {
    {
        let original = counting_impl(1_u8);
        let mut copy = original.clone();
        let mut another = original.clone();

        another.clone_from(&copy);
        let _moved = copy.take();
    }

    // Three payloads were constructed (one directly, two via clone) and all three released.
    assert_eq!(
        operation_counts(),
        OperationCounts {
            construct: 2,
            assign: 1,
            delete: 3,
        }
    );
}

#[test]
fn unique_pointer_is_deleted_exactly_once() {
    let mut original = counting_unique_impl("unique".to_string());
    let moved = original.take();

    drop(original);
    assert_eq!(operation_counts().delete, 0);

    drop(moved);
    assert_eq!(operation_counts().delete, 1);
}

#[test]
fn into_unique_keeps_counting_deleter() {
    let original = counting_impl(5_i64);

    let unique = original.into_unique();
    assert_eq!(*unique, 5);
    assert_eq!(operation_counts().delete, 0);

    drop(unique);
    assert_eq!(operation_counts().delete, 1);
}

#[test]
fn default_operations_round_trip_payload() {
    #[derive(Clone, Debug, PartialEq)]
    struct Implementation {
        ivalue: i32,
        svalue: String,
    }

    let direct = Implementation {
        ivalue: 28,
        svalue: "golden_string".to_string(),
    };

    let ptr = make_impl(direct.clone());

    assert_eq!(*ptr, direct);
    assert_eq!(*ptr.clone(), direct);
}
