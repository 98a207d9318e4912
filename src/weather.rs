use chrono::{DateTime, Local};

/// Current conditions plus a short hourly outlook, as delivered by the
/// weather collaborator. Absent entirely when the fetch failed upstream;
/// the dashboard then simply renders without a weather section.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    /// Provider icon code for current conditions (e.g. "10d").
    pub icon: String,
    /// Rain or snow over the current hour, millimeters.
    pub precipitation: f64,
    /// Upcoming hours in order, at most [`FORECAST_HOURS`] of them drawn.
    pub hourly: Vec<ForecastPoint>,
}

/// One upcoming hour of the forecast.
#[derive(Debug, Clone)]
pub struct ForecastPoint {
    pub icon: String,
    pub at: DateTime<Local>,
    pub temp: f64,
    pub feels_like: f64,
    pub precipitation: f64,
    /// Probability of precipitation, percent.
    pub pop: i32,
}

/// How many forecast points the hourly strip shows.
pub const FORECAST_HOURS: usize = 4;
