//! # I/O Layer
//!
//! Everything that faces the outside world. Only REST today.

pub mod rest;
