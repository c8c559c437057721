//! Game identifiers and player passcodes.
//!
//! Both are six-digit numeric strings drawn uniformly from
//! 100000-999999, but they live in separate types so a passcode can never
//! be compared against a game id by accident.

use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};

const LOWEST: u32 = 100_000;
const HIGHEST: u32 = 999_999;

fn six_digits<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(LOWEST..=HIGHEST).to_string()
}

/// Lookup key for a game in the registry.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, derive_new::new,
)]
#[serde(transparent)]
pub struct GameId(#[new(into)] String);

impl GameId {
    /// Draws a fresh random id.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(six_digits(rng))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Bearer secret identifying one seat in one game.
///
/// Compared by equality only. `Debug` output is redacted so passcodes
/// stay out of logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
#[serde(transparent)]
pub struct Passcode(#[new(into)] String);

impl Passcode {
    /// Draws a fresh random passcode.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(six_digits(rng))
    }

    /// Returns the passcode as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Passcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passcode(******)")
    }
}
