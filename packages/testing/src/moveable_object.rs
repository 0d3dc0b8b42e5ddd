use std::fmt;

use impl_ptr::{UniqueImplPtr, make_unique_impl};

/// A type with hidden implementation details that can be moved but not copied.
///
/// All state lives in a private implementation type behind a [`UniqueImplPtr`].
pub struct MoveableObject {
    data: UniqueImplPtr<Implementation>,
}

struct Implementation {
    ivalue: i32,
    svalue: String,
}

impl MoveableObject {
    /// Creates an object holding the given values.
    #[must_use]
    pub fn new(ivalue: i32, svalue: &str) -> Self {
        Self {
            data: make_unique_impl(Implementation {
                ivalue,
                svalue: svalue.to_string(),
            }),
        }
    }

    /// The integer value held by the implementation.
    #[must_use]
    pub fn int_value(&self) -> i32 {
        self.data.ivalue
    }

    /// Replaces the integer value held by the implementation.
    pub fn set_int_value(&mut self, value: i32) {
        self.data.ivalue = value;
    }

    /// The string value held by the implementation.
    #[must_use]
    pub fn string_value(&self) -> &str {
        &self.data.svalue
    }

    /// Replaces the string value held by the implementation.
    pub fn set_string_value(&mut self, value: &str) {
        value.clone_into(&mut self.data.svalue);
    }
}

impl fmt::Debug for MoveableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveableObject")
            .field("ivalue", &self.int_value())
            .field("svalue", &self.string_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(MoveableObject: Send, Sync);
    assert_not_impl_any!(MoveableObject: Clone);

    #[test]
    fn accessors_round_trip() {
        let mut object = MoveableObject::new(1, "one");

        object.set_int_value(2);
        object.set_string_value("two");

        assert_eq!(object.int_value(), 2);
        assert_eq!(object.string_value(), "two");
    }
}
