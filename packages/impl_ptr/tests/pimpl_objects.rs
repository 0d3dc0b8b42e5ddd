//! Integration tests for types that hide their implementation behind `ImplPtr` and
//! `UniqueImplPtr`.
//!
//! These tests exercise the pointers the way consumers use them: through a public type whose
//! only field is the pointer.

use testing::{CopiableObject, MoveableObject};

#[test]
fn copy_construct() {
    let object = CopiableObject::new(28, "golden_string");
    assert_eq!(object.int_value(), 28);
    assert_eq!(object.string_value(), "golden_string");

    assert_ne!(object.int_value(), CopiableObject::default().int_value());
    assert_ne!(object.string_value(), CopiableObject::default().string_value());

    assert_eq!(object.int_value(), object.clone().int_value());
    assert_eq!(object.string_value(), object.clone().string_value());

    let other = object.clone();

    assert_eq!(object.int_value(), other.int_value());
    assert_eq!(object.string_value(), other.string_value());
}

#[test]
fn copy_is_independent_of_original() {
    let object = CopiableObject::new(28, "golden_string");
    let mut copy = object.clone();

    copy.set_int_value(29);
    copy.set_string_value("silver_string");

    assert_eq!(object.int_value(), 28);
    assert_eq!(object.string_value(), "golden_string");
    assert_eq!(copy.int_value(), 29);
    assert_eq!(copy.string_value(), "silver_string");
}

#[test]
fn copy_assign() {
    let object = CopiableObject::new(47, "some_object");
    assert_eq!(object.int_value(), 47);
    assert_eq!(object.string_value(), "some_object");

    let mut other = CopiableObject::default();

    assert_ne!(object.int_value(), other.int_value());
    assert_ne!(object.string_value(), other.string_value());

    other.clone_from(&object);
    assert_eq!(object.int_value(), other.int_value());
    assert_eq!(object.string_value(), other.string_value());

    // Assignment copies, it does not link the two objects.
    other.set_int_value(48);
    assert_eq!(object.int_value(), 47);
}

#[test]
fn move_construct() {
    let object = CopiableObject::new(64, "move this thing");
    assert_eq!(object.int_value(), 64);
    assert_eq!(object.string_value(), "move this thing");

    let copy = object.clone();
    let moved = object;

    assert_eq!(copy.int_value(), moved.int_value());
    assert_eq!(copy.string_value(), moved.string_value());
}

#[test]
fn move_assign() {
    let object = CopiableObject::new(78, "we will move assign this");
    assert_eq!(object.int_value(), 78);
    assert_eq!(object.string_value(), "we will move assign this");

    let copy = object.clone();

    assert_eq!(object.int_value(), copy.int_value());
    assert_eq!(object.string_value(), copy.string_value());

    let mut moved = CopiableObject::default();

    assert_ne!(object.int_value(), moved.int_value());
    assert_ne!(object.string_value(), moved.string_value());

    moved = object;

    assert_eq!(copy.int_value(), moved.int_value());
    assert_eq!(copy.string_value(), moved.string_value());
}

#[test]
fn unique_move_construct() {
    let object = MoveableObject::new(101, "moving this unique thing");
    assert_eq!(object.int_value(), 101);
    assert_eq!(object.string_value(), "moving this unique thing");

    let other = MoveableObject::new(101, "moving this unique thing");
    assert_eq!(other.int_value(), object.int_value());
    assert_eq!(other.string_value(), object.string_value());

    let moved = object;
    assert_eq!(other.int_value(), moved.int_value());
    assert_eq!(other.string_value(), moved.string_value());
}

#[test]
fn unique_move_assign() {
    let object = MoveableObject::new(117, "assigning this unique thing");
    assert_eq!(object.int_value(), 117);
    assert_eq!(object.string_value(), "assigning this unique thing");

    let other = MoveableObject::new(117, "assigning this unique thing");
    assert_eq!(other.int_value(), object.int_value());
    assert_eq!(other.string_value(), object.string_value());

    let mut moved = MoveableObject::new(0, "");
    assert_ne!(other.int_value(), moved.int_value());
    assert_ne!(other.string_value(), moved.string_value());

    moved = object;

    assert_eq!(other.int_value(), moved.int_value());
    assert_eq!(other.string_value(), moved.string_value());
}

#[test]
fn unique_mutation_through_accessors() {
    let mut object = MoveableObject::new(1, "before");

    object.set_int_value(2);
    object.set_string_value("after");

    let moved = object;
    assert_eq!(moved.int_value(), 2);
    assert_eq!(moved.string_value(), "after");
}
