mod settings;

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use chrono::{DateTime, Duration, Local};
use log::error;
use rand::Rng;

use infoscreen::{
    parse_sensor_order, reduce, render, Fonts, ForecastPoint, IconLibrary, OutputSink, PngSink,
    RawSample, RenderError, WeatherSnapshot,
};
use settings::Settings;

/// Demo driver: synthesizes a 30-minute sample window in place of the
/// external acquisition collaborators and renders every configured canvas.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "infoscreen.toml".to_string());
    let settings = Settings::load(Path::new(&config_path))?;

    let order = parse_sensor_order(&settings.sensors.order);
    if order.is_empty() {
        return Err(Box::new(RenderError::Config(
            "sensor order list is empty".to_string(),
        )));
    }

    // No faces, no dashboard.
    let fonts = Fonts::load(&settings.paths.label_font, &settings.paths.value_font)?;
    let icons = IconLibrary::new(&settings.paths.icon_dir);

    let now = Local::now();
    let samples = synthesize_samples(&settings.sensors.labels, now);
    let measurements = reduce(samples, &order, &settings.sensors.labels, now);
    let weather = synthesize_weather(now);

    let sink = PngSink;
    for canvas in &settings.canvas {
        let mut canvas = canvas.clone();
        canvas.destination = settings.paths.output_dir.join(&canvas.destination);
        let image = render(&measurements, Some(&weather), &canvas, &fonts, &icons, now)?;
        if let Err(err) = sink.write(&image, &canvas.destination) {
            // One unwritable destination must not stop the other canvases.
            error!("{err}");
        }
    }

    Ok(())
}

/// Five readings per sensor spread over the lookback window, drifting gently
/// so slopes and trend badges show up.
fn synthesize_samples(
    labels: &HashMap<String, String>,
    now: DateTime<Local>,
) -> Vec<RawSample> {
    let mut rng = rand::rng();
    let mut samples = Vec::new();
    for (sensor_id, label) in labels {
        let base: f32 = rng.random_range(-5.0..25.0);
        let drift: f32 = rng.random_range(-0.1..0.1);
        for step in 0..5i64 {
            let minutes_ago = (4 - step) * 6;
            samples.push(RawSample {
                sensor_id: sensor_id.clone(),
                label: label.clone(),
                value: base + drift * step as f32 + rng.random_range(-0.2..0.2),
                at: now - Duration::minutes(minutes_ago),
            });
        }
    }
    samples
}

fn synthesize_weather(now: DateTime<Local>) -> WeatherSnapshot {
    let mut rng = rand::rng();
    let codes = ["01d", "02d", "03d", "10d"];
    let hourly = (1..=4i64)
        .map(|hour| ForecastPoint {
            icon: codes[rng.random_range(0..codes.len())].to_string(),
            at: now + Duration::hours(hour),
            temp: rng.random_range(-5.0..25.0),
            feels_like: rng.random_range(-8.0..25.0),
            precipitation: rng.random_range(0.0..2.0),
            pop: rng.random_range(0..100),
        })
        .collect();
    WeatherSnapshot {
        icon: codes[rng.random_range(0..codes.len())].to_string(),
        precipitation: rng.random_range(0.0..2.0),
        hourly,
    }
}
