//! Field-level merge rules shared by every partial update.
//!
//! Each helper returns `true` only when the stored value actually changed,
//! so callers accumulate with `|=` to visit every field.

use crate::Nullable;

/// Merge into a field that can be cleared. `Null` clears, `Undefined` leaves it untouched.
pub fn merge_nullable<T>(current: &mut Option<T>, update: &Nullable<T>) -> bool
where
    T: PartialEq + Clone,
{
    let next = match update {
        Nullable::Undefined => return false,
        Nullable::Null => None,
        Nullable::Some(value) => Some(value),
    };

    if current.as_ref() == next {
        return false;
    }

    *current = next.cloned();
    true
}

/// Merge into a field that always has a value. An explicit `null` is treated as absence.
pub fn merge_value<T>(current: &mut T, update: &Nullable<T>) -> bool
where
    T: PartialEq + Clone,
{
    match update {
        Nullable::Some(value) if current != value => {
            *current = value.clone();
            true
        }
        _ => false,
    }
}
