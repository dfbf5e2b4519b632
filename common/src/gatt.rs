//! GATT attribute-table addressing.
//!
//! Everything here is plain data: no transport calls, no I/O.

pub mod handle;
pub mod properties;
pub mod range;

pub use handle::Handle;
pub use properties::CharacteristicDescriptor;
pub use range::{HandleRange, ServiceRange};
