//! Boundary adapters from each host framework's key codes into
//! [`NativeKey`](crate::native::NativeKey).
//!
//! Both adapters are plain integer tables and compile on every target, so
//! either side can be tested anywhere. Live OS queries sit behind
//! `cfg(windows)`.

pub mod macos;
pub mod windows;
