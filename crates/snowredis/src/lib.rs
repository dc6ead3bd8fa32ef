#![doc = include_str!("../README.md")]

mod config;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod store;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::store::*;
pub use crate::time::*;
