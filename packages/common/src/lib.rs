//! Addressing primitives and error types shared by the Quire packages.

pub mod error;
pub mod id;
pub mod position;
pub mod result;

pub use error::*;
pub use id::*;
pub use position::*;
pub use result::*;
