use std::fmt;

use impl_ptr::{ImplPtr, make_impl};

/// A type with hidden implementation details that can be copied.
///
/// All state lives in a private implementation type behind an [`ImplPtr`].
pub struct CopiableObject {
    data: ImplPtr<Implementation>,
}

#[derive(Clone)]
struct Implementation {
    ivalue: i32,
    svalue: String,
}

impl CopiableObject {
    /// Creates an object holding the given values.
    #[must_use]
    pub fn new(ivalue: i32, svalue: &str) -> Self {
        Self {
            data: make_impl(Implementation {
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

impl Default for CopiableObject {
    fn default() -> Self {
        Self::new(0, "")
    }
}

impl Clone for CopiableObject {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }

    // Forwarding this lets the pointer assign in place instead of allocating a new implementation.
    fn clone_from(&mut self, source: &Self) {
        self.data.clone_from(&source.data);
    }
}

impl fmt::Debug for CopiableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopiableObject")
            .field("ivalue", &self.int_value())
            .field("svalue", &self.string_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(CopiableObject: Clone, Default, Send, Sync);

    #[test]
    fn accessors_round_trip() {
        let mut object = CopiableObject::new(1, "one");

        object.set_int_value(2);
        object.set_string_value("two");

        assert_eq!(object.int_value(), 2);
        assert_eq!(object.string_value(), "two");
    }
}
