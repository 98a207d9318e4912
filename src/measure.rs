use std::collections::HashMap;

use chrono::{DateTime, Local};
use log::debug;

/// One timestamped reading as delivered by the sample source.
#[derive(Debug, Clone)]
pub struct RawSample {
    /// Stable sensor identity (e.g. a radio MAC).
    pub sensor_id: String,
    /// Label the source tagged the reading with. Display labels are resolved
    /// through the configured mapping instead, so this is informational.
    pub label: String,
    pub value: f32,
    pub at: DateTime<Local>,
}

/// Reduced per-sensor reading: latest value plus trend and staleness.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub label: String,
    pub value: f32,
    pub slope: f32,
    pub age_minutes: i64,
    pub empty: bool,
}

impl Measurement {
    /// Placeholder for a configured sensor that produced no samples.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: 0.0,
            slope: 0.0,
            age_minutes: 0,
            empty: true,
        }
    }

    pub fn format_value(&self) -> String {
        if self.empty {
            "--".to_string()
        } else {
            format!("{:.1}", self.value)
        }
    }

    /// Staleness indicator. Ages under three minutes are considered fresh.
    pub fn format_age(&self) -> String {
        if self.empty || self.age_minutes < 3 {
            return String::new();
        }
        if self.age_minutes < 30 {
            format!(">{}m", self.age_minutes)
        } else {
            ">30m".to_string()
        }
    }

    /// Trend glyph. A flat or undefined slope produces no glyph.
    pub fn format_trend(&self) -> String {
        if self.empty || self.slope == 0.0 {
            return String::new();
        }
        if self.slope > 0.0 {
            "\u{2191}".to_string()
        } else {
            "\u{2193}".to_string()
        }
    }
}

/// Split the semicolon-delimited sensor ordering value. Empty segments are
/// dropped; an empty result means the configuration is unusable and the
/// caller should abort the cycle.
pub fn parse_sensor_order(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce a lookback window of raw samples to the ordered measurement list.
///
/// Samples are grouped by sensor identity and each group reduced to its
/// earliest and latest reading: the slope is the value change per elapsed
/// minute (zero when the endpoints coincide in time), the age is whole
/// minutes since the latest reading. Labels come from `labels`; an unmapped
/// sensor gets an empty label. The result follows `order` exactly: one
/// measurement per entry, with sensors that produced nothing represented as
/// empty placeholders and sensors not named in `order` dropped.
pub fn reduce(
    samples: Vec<RawSample>,
    order: &[String],
    labels: &HashMap<String, String>,
    now: DateTime<Local>,
) -> Vec<Measurement> {
    let mut grouped: HashMap<String, Vec<RawSample>> = HashMap::new();
    for sample in samples {
        grouped.entry(sample.sensor_id.clone()).or_default().push(sample);
    }

    let mut reduced = Vec::with_capacity(grouped.len());
    for (sensor_id, mut group) in grouped {
        group.sort_by_key(|s| s.at);
        let earliest = &group[0];
        let latest = &group[group.len() - 1];

        let elapsed_secs = (latest.at - earliest.at).num_seconds();
        let slope = if elapsed_secs == 0 {
            0.0
        } else {
            (latest.value - earliest.value) / (elapsed_secs as f32 / 60.0)
        };
        let age_minutes = (now - latest.at).num_minutes();

        reduced.push(Measurement {
            label: labels.get(&sensor_id).cloned().unwrap_or_default(),
            value: latest.value,
            slope,
            age_minutes,
            empty: false,
        });
    }

    let ordered: Vec<Measurement> = order
        .iter()
        .map(|name| {
            reduced
                .iter()
                .find(|m| m.label == *name)
                .cloned()
                .unwrap_or_else(|| Measurement::empty(name.clone()))
        })
        .collect();

    for m in &ordered {
        debug!(
            "label: {}, value: {}, slope: {}, age in mins: {}",
            m.label, m.value, m.slope, m.age_minutes
        );
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(now: DateTime<Local>, minutes_ago: i64) -> DateTime<Local> {
        now - Duration::minutes(minutes_ago)
    }

    fn sample(sensor_id: &str, value: f32, at: DateTime<Local>) -> RawSample {
        RawSample {
            sensor_id: sensor_id.to_string(),
            label: String::new(),
            value,
            at,
        }
    }

    fn test_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn label_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_sensor_order() {
        assert_eq!(
            parse_sensor_order("Living room;Outside; Sauna "),
            vec!["Living room", "Outside", "Sauna"]
        );
        assert_eq!(parse_sensor_order("A;;B;"), vec!["A", "B"]);
        assert!(parse_sensor_order("").is_empty());
    }

    #[test]
    fn test_output_length_always_matches_order() {
        let now = test_now();
        let labels = label_map(&[("aa", "A"), ("bb", "B")]);
        let order = order(&["A", "B", "C"]);

        // No samples at all.
        assert_eq!(reduce(vec![], &order, &labels, now).len(), 3);

        // One known sensor, one unknown extra.
        let samples = vec![
            sample("aa", 20.0, at(now, 5)),
            sample("zz", 99.0, at(now, 5)),
        ];
        let result = reduce(samples, &order, &labels, now);
        assert_eq!(result.len(), 3);
        assert!(!result[0].empty);
        assert!(result[1].empty);
        assert!(result[2].empty);
        // The unmapped extra sensor must not leak into any slot.
        assert!(result.iter().all(|m| m.value != 99.0));
    }

    #[test]
    fn test_slope_from_earliest_and_latest() {
        let now = test_now();
        let labels = label_map(&[("aa", "A")]);
        let order = order(&["A"]);
        let samples = vec![
            sample("aa", 20.0, at(now, 20)),
            sample("aa", 21.0, at(now, 10)),
            // Unsorted input; latest reading carries the value.
            sample("aa", 22.0, at(now, 0)),
        ];
        let result = reduce(samples, &order, &labels, now);
        assert_eq!(result[0].value, 22.0);
        // 2.0 degrees over 20 minutes.
        assert!((result[0].slope - 0.1).abs() < 1e-6);
        assert_eq!(result[0].format_trend(), "\u{2191}");
    }

    #[test]
    fn test_single_sample_has_zero_slope() {
        let now = test_now();
        let labels = label_map(&[("aa", "A")]);
        let order = order(&["A"]);
        let samples = vec![sample("aa", 20.0, at(now, 5))];
        let result = reduce(samples, &order, &labels, now);
        assert_eq!(result[0].slope, 0.0);
        assert_eq!(result[0].format_trend(), "");
    }

    #[test]
    fn test_identical_endpoint_values_mean_no_trend() {
        let now = test_now();
        let labels = label_map(&[("aa", "A")]);
        let order = order(&["A"]);
        let samples = vec![
            sample("aa", 20.0, at(now, 10)),
            sample("aa", 20.0, at(now, 0)),
        ];
        let result = reduce(samples, &order, &labels, now);
        assert_eq!(result[0].slope, 0.0);
        assert_eq!(result[0].format_trend(), "");
    }

    #[test]
    fn test_falling_slope_gives_down_glyph() {
        let now = test_now();
        let labels = label_map(&[("aa", "A")]);
        let order = order(&["A"]);
        let samples = vec![
            sample("aa", 20.0, at(now, 10)),
            sample("aa", 18.5, at(now, 0)),
        ];
        let result = reduce(samples, &order, &labels, now);
        assert!(result[0].slope < 0.0);
        assert_eq!(result[0].format_trend(), "\u{2193}");
    }

    #[test]
    fn test_age_is_floored_whole_minutes() {
        let now = test_now();
        let labels = label_map(&[("aa", "A")]);
        let order = order(&["A"]);
        let samples = vec![sample("aa", 20.0, now - Duration::seconds(4 * 60 + 59))];
        let result = reduce(samples, &order, &labels, now);
        assert_eq!(result[0].age_minutes, 4);
    }

    #[test]
    fn test_unmapped_sensor_gets_empty_label_and_is_dropped() {
        let now = test_now();
        let labels = HashMap::new();
        let order = order(&["A"]);
        let samples = vec![sample("aa", 20.0, at(now, 0))];
        let result = reduce(samples, &order, &labels, now);
        // Label "" never matches the order entry, so the slot stays empty
        // but keeps its configured name.
        assert!(result[0].empty);
        assert_eq!(result[0].label, "A");
    }

    #[test]
    fn test_format_value() {
        let now = test_now();
        let labels = label_map(&[("aa", "A")]);
        let order = order(&["A", "B"]);
        let samples = vec![sample("aa", 21.46, at(now, 0))];
        let result = reduce(samples, &order, &labels, now);
        assert_eq!(result[0].format_value(), "21.5");
        assert_eq!(result[1].format_value(), "--");
    }

    #[test]
    fn test_format_age_table() {
        let mut m = Measurement {
            label: "A".to_string(),
            value: 20.0,
            slope: 0.0,
            age_minutes: 0,
            empty: false,
        };
        assert_eq!(m.format_age(), "");
        m.age_minutes = 2;
        assert_eq!(m.format_age(), "");
        m.age_minutes = 3;
        assert_eq!(m.format_age(), ">3m");
        m.age_minutes = 29;
        assert_eq!(m.format_age(), ">29m");
        m.age_minutes = 30;
        assert_eq!(m.format_age(), ">30m");
        m.age_minutes = 300;
        assert_eq!(m.format_age(), ">30m");

        let empty = Measurement {
            age_minutes: 45,
            ..Measurement::empty("B")
        };
        assert_eq!(empty.format_age(), "");
    }
}
