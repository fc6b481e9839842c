//! Run the sensor pipeline live at the host tick rate.

use std::time::Instant;

use serde::Serialize;
use tokio::time::MissedTickBehavior;

use tiltdraw_common::clock::Throttle;
use tiltdraw_common::config::AppConfig;
use tiltdraw_sensor_source::{Direction, SensorService};
use tiltdraw_signal_core::sample::{InputMode, SensorState};
use tiltdraw_signal_core::{BrushCursor, ShakeWatcher};

/// Status lines per second; the pipeline itself ticks much faster.
const REPORT_HZ: f64 = 4.0;

pub struct MonitorOptions {
    pub mock: bool,
    pub duration: Option<f64>,
    pub smoothing: Option<f64>,
    pub hold: Vec<String>,
    pub json: bool,
}

#[derive(Serialize)]
struct MonitorLine {
    elapsed_secs: f64,
    mode: InputMode,
    cursor: (f64, f64),
    shake: bool,
    #[serde(flatten)]
    state: SensorState,
}

pub async fn run(config: &AppConfig, options: MonitorOptions) -> anyhow::Result<()> {
    let held = options
        .hold
        .iter()
        .map(|key| key.parse::<Direction>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut sensor_config = config.sensor.clone();
    sensor_config.force_mock |= options.mock;

    let mut service = SensorService::new(&sensor_config);
    if let Some(factor) = options.smoothing {
        let effective = service.set_smoothing(factor);
        tracing::info!(effective, "Smoothing factor set");
    }
    for direction in held {
        service.mock_controls().press(direction);
    }
    service.start();

    if !options.json {
        println!("Mode: {} ({})", service.status(), service.source_name());
    }

    let mut cursor = BrushCursor::new(
        config.canvas.width,
        config.canvas.height,
        config.canvas.sensitivity,
    );
    let mut watcher = ShakeWatcher::new();
    let mut report = Throttle::per_second(REPORT_HZ);

    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let started = Instant::now();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticker.tick() => {}
        }

        let elapsed = started.elapsed().as_secs_f64();
        if options.duration.is_some_and(|limit| elapsed >= limit) {
            break;
        }

        service.tick();
        let state = service.get_state();
        let mode = service.mode();
        cursor.advance(&state, mode);
        let shake = watcher.poll(&state);

        if !(shake || report.ready(elapsed)) {
            continue;
        }

        if options.json {
            let line = MonitorLine {
                elapsed_secs: elapsed,
                mode,
                cursor: cursor.position(),
                shake,
                state,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else if shake {
            println!("[{elapsed:7.2}s] Shake #{}", state.shake_count);
        } else {
            let (cx, cy) = cursor.position();
            println!(
                "[{elapsed:7.2}s] X: {:+.2}  Y: {:+.2}  raw: ({:+.2}, {:+.2})  brush: ({cx:.0}, {cy:.0})",
                state.x, state.y, state.raw_x, state.raw_y
            );
        }
    }

    service.stop();
    Ok(())
}
