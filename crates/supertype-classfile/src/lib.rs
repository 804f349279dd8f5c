#![forbid(unsafe_code)]

//! Minimal class-file decoding: just enough structure (names, super class,
//! interfaces, access flags) to place a type in the class hierarchy.

mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod reader;

pub use crate::classfile::{ClassHeader, ACC_INTERFACE};
pub use crate::descriptor::parse_field_descriptor;
pub use crate::descriptor::{BaseType, FieldType};
pub use crate::error::{Error, Result};
