//! ニューラルネットワーク層
//!
//! - [`Linear`] - 全結合層

mod linear;

pub use linear::{Linear, LinearConfig, linear};
