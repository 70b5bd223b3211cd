//! Per-region channel statistics measured from packed material images.

pub mod accumulate;
