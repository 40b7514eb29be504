//! Error handling.

use core::alloc::Layout;
use core::convert::Infallible;
use core::fmt;

use thiserror::Error;

/// An enumeration of the failures raised by `Vec` operations.
///
/// The type parameter `E` is the error type of a user-supplied element
/// producer. Operations which only construct elements infallibly use the
/// default `Infallible`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VecError<E = Infallible> {
    /// A checked access or insertion position was out of bounds.
    #[error("index {index} is out of range for length {len}")]
    Range {
        /// The requested position.
        index: usize,
        /// The length of the vector at the time of the request.
        len: usize,
    },
    /// The requested capacity exceeds the maximum representable size.
    #[error("requested capacity {requested} exceeds the maximum of {max}")]
    Length {
        /// The requested number of elements.
        requested: usize,
        /// The maximum number of elements for the element type.
        max: usize,
    },
    /// The allocator could not provide the requested memory.
    #[error("memory allocation of {} bytes failed", .0.size())]
    OutOfMemory(Layout),
    /// A user element producer failed.
    #[error("element operation failed")]
    ElementOperationFailed(E),
    /// A cursor was stale or belonged to a different buffer.
    #[error("cursor does not refer to the current buffer")]
    InvalidCursor,
}

impl<E> VecError<E> {
    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Range { .. } => "Index out of range",
            Self::Length { .. } => "Capacity exceeds maximum size",
            Self::OutOfMemory(_) => "Allocation error",
            Self::ElementOperationFailed(_) => "Element operation failed",
            Self::InvalidCursor => "Invalid cursor",
        }
    }

    /// Map the element error of this instance.
    pub fn map_element<F>(self, f: impl FnOnce(E) -> F) -> VecError<F> {
        match self {
            Self::Range { index, len } => VecError::Range { index, len },
            Self::Length { requested, max } => VecError::Length { requested, max },
            Self::OutOfMemory(layout) => VecError::OutOfMemory(layout),
            Self::ElementOperationFailed(err) => VecError::ElementOperationFailed(f(err)),
            Self::InvalidCursor => VecError::InvalidCursor,
        }
    }

    /// Generate a panic with this error as the reason.
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        let reason = self.as_str();
        match self {
            Self::OutOfMemory(layout) => crate::alloc::handle_alloc_error(layout),
            Self::Range { index, len } => {
                panic!("{}: index {} for length {}", reason, index, len)
            }
            _ => panic!("{}", reason),
        }
    }
}

impl VecError {
    /// Convert an error raised by an infallible producer into an error for
    /// any producer type.
    #[inline]
    pub fn cast<E>(self) -> VecError<E> {
        self.map_element(|never| match never {})
    }
}

/// An error raised by update operations when appropriate storage was not
/// available. Includes the value that could not be stored.
#[derive(Clone)]
pub struct UpdateError<T> {
    pub(crate) error: VecError,
    pub(crate) value: T,
}

impl<T> UpdateError<T> {
    pub(crate) fn new(error: VecError, value: T) -> Self {
        Self { error, value }
    }

    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        "Update error"
    }

    /// Get a reference to the contained `VecError`.
    pub fn error(&self) -> &VecError {
        &self.error
    }

    /// Unwrap the inner value of this error.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Generate a panic with this error as the reason.
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        self.error.panic()
    }
}

impl<T> fmt::Debug for UpdateError<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for UpdateError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.as_str(), self.error))
    }
}

impl<T> core::error::Error for UpdateError<T> {}
