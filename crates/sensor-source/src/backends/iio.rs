//! Linux Industrial I/O accelerometers exposed through sysfs.
//!
//! A device qualifies when its directory under `/sys/bus/iio/devices` has
//! `in_accel_{x,y,z}_raw`. Raw counts are multiplied by `in_accel_scale`
//! (m/s² per count) and converted to g. Sysfs has no push notification, so
//! a reader thread samples at the report interval and invokes the callback.
//! The thread waits on a stop channel between reads, so removing the
//! callback returns without sitting out the rest of an interval.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tiltdraw_common::error::{TiltError, TiltResult};
use tiltdraw_signal_core::sample::RawSample;

use crate::{Accelerometer, ReadingCallback};

pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

const STANDARD_GRAVITY: f64 = 9.80665;
/// Used when the driver does not advertise its sampling frequencies.
const FALLBACK_MIN_INTERVAL: Duration = Duration::from_millis(10);
const AXES: [&str; 3] = ["x", "y", "z"];

struct Reader {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

pub struct IioAccelerometer {
    name: String,
    device_dir: PathBuf,
    scale: f64,
    minimum_interval: Duration,
    interval_us: Arc<AtomicU64>,
    reader: Option<Reader>,
}

impl IioAccelerometer {
    /// Find the first accelerometer under `root`.
    ///
    /// A missing root means no IIO subsystem and yields `Ok(None)`.
    pub fn discover(root: &Path) -> TiltResult<Option<Self>> {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TiltError::device_init(format!(
                    "Failed to list {}: {e}",
                    root.display()
                )))
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_accelerometer(path))
            .collect();
        candidates.sort();

        match candidates.first() {
            Some(dir) => {
                tracing::debug!(device = %dir.display(), "Found IIO accelerometer");
                Self::open(dir).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Open a device directory and take one reading to prove access.
    pub fn open(dir: &Path) -> TiltResult<Self> {
        let name = read_trimmed(&dir.join("name")).unwrap_or_else(|_| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "iio".to_string())
        });

        let scale = match read_trimmed(&dir.join("in_accel_scale")) {
            Ok(text) => text.parse::<f64>().map_err(|e| {
                TiltError::device_init(format!("Bad in_accel_scale '{text}': {e}"))
            })?,
            Err(_) => 1.0,
        };

        let minimum_interval = advertised_minimum_interval(dir);
        let device = Self {
            name,
            device_dir: dir.to_path_buf(),
            scale,
            minimum_interval,
            interval_us: Arc::new(AtomicU64::new(minimum_interval.as_micros() as u64)),
            reader: None,
        };

        device.read()?;
        Ok(device)
    }

    /// One synchronous reading in g.
    pub fn read(&self) -> TiltResult<RawSample> {
        read_sample(&self.device_dir, self.scale)
    }

    fn stop_reader(&mut self) -> TiltResult<()> {
        let Some(reader) = self.reader.take() else {
            return Ok(());
        };
        drop(reader.stop);
        reader
            .handle
            .join()
            .map_err(|_| TiltError::callback_deregistration("IIO reader thread panicked"))
    }
}

impl Accelerometer for IioAccelerometer {
    fn name(&self) -> &str {
        &self.name
    }

    fn minimum_report_interval(&self) -> Duration {
        self.minimum_interval
    }

    fn report_interval(&self) -> Duration {
        Duration::from_micros(self.interval_us.load(Ordering::Relaxed))
    }

    fn set_report_interval(&mut self, interval: Duration) -> TiltResult<()> {
        if interval < self.minimum_interval {
            return Err(TiltError::device_init(format!(
                "Report interval {interval:?} is below the device minimum {:?}",
                self.minimum_interval
            )));
        }
        self.interval_us
            .store(interval.as_micros() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn on_reading(&mut self, callback: ReadingCallback) -> TiltResult<()> {
        if self.reader.is_some() {
            return Err(TiltError::callback_registration(
                "A reading callback is already registered",
            ));
        }

        let (stop, stop_rx) = mpsc::channel::<()>();
        let dir = self.device_dir.clone();
        let scale = self.scale;
        let interval_us = Arc::clone(&self.interval_us);

        let handle = std::thread::Builder::new()
            .name("iio-accel".to_string())
            .spawn(move || {
                let mut failing = false;
                loop {
                    match read_sample(&dir, scale) {
                        Ok(sample) => {
                            failing = false;
                            callback(sample);
                        }
                        Err(e) => {
                            if !failing {
                                tracing::warn!(error = %e, "IIO read failed");
                            }
                            failing = true;
                        }
                    }
                    let interval = Duration::from_micros(interval_us.load(Ordering::Relaxed));
                    // Disconnected means the sender was dropped by stop_reader.
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|e| {
                TiltError::callback_registration(format!("Failed to spawn IIO reader: {e}"))
            })?;

        self.reader = Some(Reader { stop, handle });
        Ok(())
    }

    fn remove_reading_callback(&mut self) -> TiltResult<()> {
        self.stop_reader()
    }
}

impl Drop for IioAccelerometer {
    fn drop(&mut self) {
        self.stop_reader().ok();
    }
}

/// Open the first IIO accelerometer, under `root` if given.
pub fn acquire_default_accelerometer(
    root: Option<&Path>,
) -> TiltResult<Option<Box<dyn Accelerometer>>> {
    let root = root.unwrap_or_else(|| Path::new(DEFAULT_IIO_ROOT));
    let device = IioAccelerometer::discover(root)?;
    Ok(device.map(|d| Box::new(d) as Box<dyn Accelerometer>))
}

fn is_accelerometer(dir: &Path) -> bool {
    AXES.iter()
        .all(|axis| dir.join(format!("in_accel_{axis}_raw")).is_file())
}

fn read_trimmed(path: &Path) -> std::io::Result<String> {
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

fn read_sample(dir: &Path, scale: f64) -> TiltResult<RawSample> {
    let axis = |name: &str| -> TiltResult<f64> {
        let path = dir.join(format!("in_accel_{name}_raw"));
        let text = read_trimmed(&path)
            .map_err(|e| TiltError::device_init(format!("Failed to read {}: {e}", path.display())))?;
        let raw = text.parse::<f64>().map_err(|e| {
            TiltError::device_init(format!("Bad reading '{text}' in {}: {e}", path.display()))
        })?;
        Ok(raw * scale / STANDARD_GRAVITY)
    };
    Ok(RawSample::new(axis("x")?, axis("y")?, axis("z")?))
}

/// Fastest advertised sampling frequency, as an interval.
///
/// Frequencies too small to express as a `Duration` fall back to
/// [`FALLBACK_MIN_INTERVAL`].
fn advertised_minimum_interval(dir: &Path) -> Duration {
    for file in [
        "in_accel_sampling_frequency_available",
        "sampling_frequency_available",
    ] {
        if let Ok(text) = read_trimmed(&dir.join(file)) {
            let fastest = text
                .split_whitespace()
                .filter_map(|v| v.parse::<f64>().ok())
                .fold(0.0f64, f64::max);
            if fastest > 0.0 {
                return Duration::try_from_secs_f64(1.0 / fastest)
                    .unwrap_or(FALLBACK_MIN_INTERVAL);
            }
        }
    }
    FALLBACK_MIN_INTERVAL
}
