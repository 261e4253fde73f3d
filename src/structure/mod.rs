// Tue Jan 20 2026 - Alex

pub mod field;
pub mod offset;
pub mod shape;
pub mod type_info;

pub use field::FieldDescriptor;
pub use offset::Offset;
pub use shape::ObjectShape;
pub use type_info::{TypeDescriptor, TYPE_HEADER_SIZE};
