//! Grid parsing: raw ascii-art lines into a validated cell grid plus one
//! rectangular [`LabelRegion`] per label.

mod core;

pub use core::{Cell, Grid, LabelRegion};
