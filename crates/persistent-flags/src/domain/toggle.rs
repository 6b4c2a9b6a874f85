//! The two-state value backing every flag.
//!
//! A [`ToggleableValue`] is either [`ToggleableValue::Off`] (`0`) or
//! [`ToggleableValue::On`] (`1`).  It is `Copy`, so every value handed out by
//! a store is a snapshot; "changing" a flag always means building a new value
//! and assigning it back.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an integer outside `{0, 1}` is turned into a [`ToggleableValue`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid value {0} for a toggleable value: must be either 0 or 1")]
pub struct InvalidState(pub i64);

/// An immutable on/off state.
///
/// Compares, orders and serializes as its integer form: `Off` is `0`, `On` is
/// `1`, and `Off < On`.
///
/// # Examples
///
/// ```rust
/// use persistent_flags::ToggleableValue;
///
/// let on = ToggleableValue::try_from(1_i64).unwrap();
/// assert_eq!(on.toggle(), ToggleableValue::Off);
/// assert_eq!(on.toggle().toggle(), on);
/// assert!(ToggleableValue::try_from(2_i64).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "RawState", into = "u8")]
pub enum ToggleableValue {
    #[default]
    Off,
    On,
}

impl ToggleableValue {
    pub const OFF: ToggleableValue = ToggleableValue::Off;
    pub const ON: ToggleableValue = ToggleableValue::On;

    /// Returns a new value with the opposite state.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    /// Returns `0` for `Off` and `1` for `On`.
    pub fn as_int(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl TryFrom<i64> for ToggleableValue {
    type Error = InvalidState;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(InvalidState(other)),
        }
    }
}

impl From<bool> for ToggleableValue {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl From<ToggleableValue> for bool {
    fn from(value: ToggleableValue) -> Self {
        value.is_on()
    }
}

impl From<ToggleableValue> for u8 {
    fn from(value: ToggleableValue) -> Self {
        value.as_int()
    }
}

impl From<ToggleableValue> for i64 {
    fn from(value: ToggleableValue) -> Self {
        i64::from(value.as_int())
    }
}

impl fmt::Display for ToggleableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

/// Wire forms accepted when deserializing: `0`/`1` or `false`/`true`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawState {
    Bool(bool),
    Int(i64),
}

impl TryFrom<RawState> for ToggleableValue {
    type Error = InvalidState;

    fn try_from(raw: RawState) -> Result<Self, Self::Error> {
        match raw {
            RawState::Bool(b) => Ok(Self::from(b)),
            RawState::Int(i) => Self::try_from(i),
        }
    }
}
