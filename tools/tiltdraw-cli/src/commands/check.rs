//! Check accelerometer availability.

use tiltdraw_common::config::AppConfig;
use tiltdraw_sensor_source::hardware::report_interval_for;
use tiltdraw_sensor_source::{acquire_default_accelerometer, Accelerometer, SensorService};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("TiltDraw Sensor Check");
    println!("{}", "=".repeat(50));

    let target = config.sensor.target_report_interval();
    match acquire_default_accelerometer(config.sensor.iio_root.as_deref()) {
        Ok(Some(device)) => {
            let minimum = device.minimum_report_interval();
            println!("[OK] Accelerometer: {}", device.name());
            println!("     Minimum report interval: {minimum:?}");
            println!(
                "     Report interval used: {:?}",
                report_interval_for(minimum, target)
            );
        }
        Ok(None) => println!("[WARN] No accelerometer found"),
        Err(e) => println!("[WARN] Accelerometer present but unusable: {e}"),
    }

    let service = SensorService::new(&config.sensor);
    println!();
    println!("Input mode: {}", service.status());
    if service.use_mock() {
        println!("Tilt will be simulated from arrow keys.");
    } else {
        println!("Tilt the device to move the brush; shake to change color.");
    }

    Ok(())
}
