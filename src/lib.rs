//! A contiguous, allocator-aware vector with strong failure guarantees.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

pub mod alloc;

pub mod capacity;

pub(crate) mod error;

pub mod vec;

pub use self::error::{UpdateError, VecError};
pub use self::vec::{Cursor, Vec};
