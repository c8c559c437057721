//! Serialization helpers for the client-facing state shape.
//!
//! Clients treat an empty string as "nothing here yet", both for staged
//! inputs and for unassigned marks.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt::Display;

use crate::state::{Seat, Staged};

fn blank<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Serializes `None` as `""` and `Some(v)` as `v.to_string()`.
pub(crate) fn serialize_blank<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.serialize_str(&blank(value))
}

impl<T: Display + Copy> Serialize for Staged<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Staged", 2)?;
        state.serialize_field("player1", &blank(&self.get(Seat::First)))?;
        state.serialize_field("player2", &blank(&self.get(Seat::Second)))?;
        state.end()
    }
}
