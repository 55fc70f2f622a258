#[macro_use]
extern crate enum_primitive_derive;

pub mod bits;
pub mod cursor;
pub mod dissectors;
pub mod layout;
pub mod synth;
pub mod tracker;
pub mod wire;
