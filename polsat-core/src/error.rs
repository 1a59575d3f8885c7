//! Error type for core state construction.

use num_bigint::BigUint;
use polsat_math::PVar;
use thiserror::Error;

/// Error type for solver-state and slice-graph operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A polynomial variable handle was never registered.
    #[error("unknown polynomial variable v{0}")]
    UnknownVar(PVar),
    /// A concrete value does not fit the variable's bit width.
    #[error("value {value} does not fit in {width} bits")]
    ValueOutOfRange {
        /// The offending value.
        value: BigUint,
        /// The variable's width.
        width: u32,
    },
    /// A slice registration exceeds its parent's width.
    #[error("slice of width {child_width} at offset {offset} exceeds parent width {parent_width}")]
    SliceBounds {
        /// Offset of the slice within the parent.
        offset: u32,
        /// Width of the slice node.
        child_width: u32,
        /// Width of the parent node.
        parent_width: u32,
    },
    /// Two slice nodes of different widths cannot be merged.
    #[error("cannot merge slice nodes of widths {0} and {1}")]
    WidthMismatch(u32, u32),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
