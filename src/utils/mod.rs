//! Utility helpers shared across resource clients.

pub mod timestamp;
