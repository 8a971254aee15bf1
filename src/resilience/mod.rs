//! Connection retry.

pub mod retry;
