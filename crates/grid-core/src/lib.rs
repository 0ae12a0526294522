// In crates/grid-core/src/lib.rs

//! The bounds-classification and recommendation engine.
//!
//! Both halves are pure: the classifier turns a price and a grid into a
//! discrete [`core_types::BoundsState`], the composer turns that state plus a
//! momentum snapshot into advisory text. Neither performs I/O.

pub mod classifier;
pub mod composer;

pub use classifier::classify;
pub use composer::{fmt_money, recommend, tag_label};
