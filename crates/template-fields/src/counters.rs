//! Generated identifiers.

use std::cell::Cell;

/// Monotonic counters for placeholder ids and anonymous field names.
///
/// Every panel built from one set of counters gets distinct identifiers.
/// Builders that must not collide with each other share the same counters
/// through an `Rc<Counters>`. The counters are never reset.
#[derive(Debug, Default)]
pub struct Counters {
    placeholder: Cell<u64>,
    field: Cell<u64>,
    button: Cell<u64>,
}

impl Counters {
    /// Create counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn next(cell: &Cell<u64>) -> u64 {
        let value = cell.get();
        cell.set(value + 1);
        value
    }

    /// Next placeholder element id.
    pub fn next_placeholder_id(&self) -> String {
        format!("__tmps_{}", Self::next(&self.placeholder))
    }

    /// Next anonymous field name.
    pub fn next_field_name(&self) -> String {
        format!("field{}", Self::next(&self.field))
    }

    /// Next anonymous button name.
    pub fn next_button_name(&self) -> String {
        format!("Button-{}", Self::next(&self.button))
    }
}
