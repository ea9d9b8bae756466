#![cfg_attr(all(feature = "no-std", not(test)), no_std)]

#[cfg(feature = "no-std")]
extern crate alloc;

pub mod collections;
#[cfg(not(feature = "no-std"))]
pub mod demo;
