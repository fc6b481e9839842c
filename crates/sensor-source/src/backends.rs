//! Platform accelerometer backends.
//!
//! Each platform provides `acquire_default_accelerometer`, returning
//! `Ok(None)` when no device exists and an error when one exists but cannot
//! be opened. The sensor service treats both as "use mock input".

#[cfg(target_os = "linux")]
pub mod iio;

#[cfg(not(target_os = "linux"))]
mod non_linux;

#[cfg(target_os = "linux")]
pub use iio::acquire_default_accelerometer;

#[cfg(not(target_os = "linux"))]
pub use non_linux::acquire_default_accelerometer;
