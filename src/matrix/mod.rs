//! Matrix types
//!
//! This module provides the dense [`Matrix`] type, the [`SampleData`] bundle
//! both formulas read from, and a console preview adaptor.

mod dense;
pub mod data;
mod display;

pub use dense::Matrix;
pub use data::SampleData;
pub use display::MatrixPreview;
