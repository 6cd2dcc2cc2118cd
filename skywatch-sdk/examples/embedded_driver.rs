//! Example: adding weather awareness to an existing device driver.
//!
//! The monitor is attached by composition: the owning device holds a
//! `WeatherMonitor` and delegates its lifecycle hooks to it. Here a dome
//! driver closes the shutter whenever the effective weather state turns
//! unsafe.
//!
//! Run with: cargo run --example embedded_driver

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use skywatch_sdk::{Notifier, StationHandle, WeatherEvent, WeatherMonitor, WeatherSource};
use skywatch_types::{ParamRange, UpdateStatus};

/// Stand-in for real mast hardware: wind climbs until it crosses the
/// warning and alert thresholds, then calms down again.
struct MastSensors {
    step: std::sync::atomic::AtomicU32,
}

#[async_trait]
impl WeatherSource for MastSensors {
    async fn update_weather(&self, station: &StationHandle) -> UpdateStatus {
        let step = self
            .step
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let wind = 10.0 + 20.0 * ((step % 8) as f64 / 8.0 * std::f64::consts::TAU).sin();

        station.set_value("WEATHER_WIND_SPEED", wind.max(0.0));
        station.set_value("WEATHER_TEMPERATURE", 11.5);
        UpdateStatus::Ok
    }
}

/// The owning device. Only the weather-related delegation is shown.
struct DomeDriver {
    weather: WeatherMonitor,
    shutter_open: bool,
}

impl DomeDriver {
    fn new(weather: WeatherMonitor) -> Self {
        // What initProperties() of the device would do:
        weather.init_properties("Dome Status", "Weather");

        weather
            .add_parameter(
                "WEATHER_WIND_SPEED",
                "Wind (m/s)",
                ParamRange::new(0.0, 20.0, 0.25).expect("static range"),
            )
            .expect("first registration");
        weather
            .add_parameter(
                "WEATHER_TEMPERATURE",
                "Temperature (C)",
                ParamRange::new(-15.0, 35.0, 0.2).expect("static range"),
            )
            .expect("first registration");
        weather.set_critical_parameter("WEATHER_WIND_SPEED");

        Self {
            weather,
            shutter_open: true,
        }
    }

    /// What the device's connect hook would do.
    fn on_connect(&self) -> skywatch_sdk::PollHandle {
        self.weather.update_properties(true);
        self.weather.start(Arc::new(MastSensors {
            step: std::sync::atomic::AtomicU32::new(0),
        }))
    }

    /// React to a weather event the way a safety interlock would.
    fn on_weather_event(&mut self, event: &WeatherEvent) {
        if let WeatherEvent::StatusChanged(_) = event {
            let safe = !self.weather.effective_state().is_unsafe();
            if self.shutter_open && !safe {
                println!("** closing shutter: weather state is {}", self.weather.aggregate_state());
                self.shutter_open = false;
            } else if !self.shutter_open && safe {
                println!("** reopening shutter");
                self.shutter_open = true;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let (notifier, mut events) = Notifier::channel(32);
    let weather = WeatherMonitor::builder()
        .device("Dome Simulator")
        .update_period(Duration::from_secs(1))
        .notifier(notifier)
        .build();

    let mut dome = DomeDriver::new(weather.clone());
    let poll = dome.on_connect();

    let mut cycles = 0;
    while let Some(event) = events.recv().await {
        match &event {
            WeatherEvent::ParameterChanged { name, state } => {
                println!("{name} -> {state}");
            }
            WeatherEvent::SnapshotReady(snapshot) => {
                let wind = snapshot.get("WEATHER_WIND_SPEED").map(|r| r.value);
                println!("cycle: wind={wind:?} aggregate={}", snapshot.state);
                cycles += 1;
                if cycles == 10 {
                    break;
                }
            }
            _ => {}
        }
        dome.on_weather_event(&event);
    }

    // What the device's disconnect hook would do:
    poll.stop();
    weather.update_properties(false);
}
