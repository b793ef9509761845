//! Lectern application library: the books catalog module and its wiring.

pub mod modules;
