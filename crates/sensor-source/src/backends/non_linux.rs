//! Platforms without an accelerometer backend yet.

use std::path::Path;

use tiltdraw_common::error::TiltResult;

use crate::Accelerometer;

pub fn acquire_default_accelerometer(
    _root: Option<&Path>,
) -> TiltResult<Option<Box<dyn Accelerometer>>> {
    tracing::debug!("No accelerometer backend for this platform");
    Ok(None)
}
