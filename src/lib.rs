#![cfg_attr(feature = "clippy", feature(plugin))]
#![cfg_attr(feature = "clippy", plugin(clippy))]

extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod bit_vec;
pub mod codec;
pub mod critbit;
