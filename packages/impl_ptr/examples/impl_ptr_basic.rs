//! Basic usage example for `ImplPtr` and `UniqueImplPtr`.
//!
//! This example demonstrates public types that keep their state in a hidden implementation type
//! and still behave like plain values: they can be cloned, cloned into and moved.

use testing::{CopiableObject, MoveableObject};

fn main() {
    let original = CopiableObject::new(28, "golden_string");
    println!("Original: {original:?}");

    // Cloning constructs an independent implementation object.
    let mut copy = original.clone();
    copy.set_int_value(29);
    println!("Original after modifying the copy: {original:?}");
    println!("Copy: {copy:?}");

    // Cloning into an existing object assigns in place, reusing its implementation object.
    let mut reused = CopiableObject::default();
    reused.clone_from(&original);
    println!("Reused after clone_from: {reused:?}");

    // Move-only objects can change owners but cannot be copied.
    let unique = MoveableObject::new(101, "moving this unique thing");
    let moved = unique;
    println!("Moved unique object: {moved:?}");

    assert_eq!(original.int_value(), 28);
    assert_eq!(copy.int_value(), 29);
    assert_eq!(reused.string_value(), "golden_string");
    assert_eq!(moved.int_value(), 101);
}
