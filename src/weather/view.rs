use chrono::Timelike;

use crate::config::TimeFormat;
use crate::core::temporal::{parse_date_loose, parse_datetime};

use super::client::{CurrentSnapshot, DailySnapshot, ForecastSnapshot, HourlySnapshot};
use super::descriptions::describe;

/// Display-ready weather data derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub current: CurrentConditions,
    pub forecast: Vec<HourlyPoint>,
    pub daily_forecast: Vec<DailyPoint>,
}

/// Current conditions with values rounded to display precision.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: i32,
    pub apparent_temperature: i32,
    pub humidity: i32,
    pub precipitation_probability: i32,
    pub wind_speed: i32,
    pub weather_code: u16,
    pub is_day: bool,
    pub description: String,
}

/// One hourly forecast point, three hours apart.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    pub time: String,
    pub temperature: i32,
    pub weather_code: u16,
    pub description: String,
    pub formatted_time: String,
}

/// One daily forecast point, today excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    pub date: String,
    pub max_temperature: i32,
    pub day: String,
}

/// How many hourly points the view shows, and the spacing between them.
const HOURLY_POINTS: usize = 5;
const HOURLY_STEP: usize = 3;
const DAILY_POINTS: usize = 5;

pub fn build_weather_view(snapshot: &ForecastSnapshot, time_format: TimeFormat) -> WeatherView {
    WeatherView {
        current: current_conditions(&snapshot.current),
        forecast: hourly_points(&snapshot.hourly, &snapshot.current.time, time_format),
        daily_forecast: daily_points(&snapshot.daily),
    }
}

fn current_conditions(current: &CurrentSnapshot) -> CurrentConditions {
    let is_day = current.is_day == 1;
    CurrentConditions {
        temperature: current.temperature_2m.round() as i32,
        apparent_temperature: current.apparent_temperature.round() as i32,
        humidity: current.relative_humidity_2m.round() as i32,
        precipitation_probability: current.precipitation_probability.round() as i32,
        wind_speed: current.wind_speed_10m.round() as i32,
        weather_code: current.weather_code,
        is_day,
        description: describe(current.weather_code, is_day),
    }
}

/// Select up to five points spaced three hours apart, starting three hours
/// after the first entry at or past the snapshot's current hour.
fn hourly_points(
    hourly: &HourlySnapshot,
    current_time: &str,
    time_format: TimeFormat,
) -> Vec<HourlyPoint> {
    let current_hour = parse_datetime(current_time)
        .map(|dt| dt.hour())
        .unwrap_or(0);

    let base = hourly
        .time
        .iter()
        .position(|raw| {
            parse_datetime(raw).is_some_and(|dt| dt.hour() >= current_hour)
        })
        .unwrap_or(0);

    let mut points = Vec::new();
    for step in 1..=HOURLY_POINTS {
        let index = base + step * HOURLY_STEP;
        if index >= hourly.time.len() {
            break;
        }
        let is_day = hourly.is_day.get(index).copied().unwrap_or(1) == 1;
        let code = hourly.weather_code.get(index).copied().unwrap_or(0);
        points.push(HourlyPoint {
            time: hourly.time[index].clone(),
            temperature: hourly
                .temperature_2m
                .get(index)
                .copied()
                .unwrap_or_default()
                .round() as i32,
            weather_code: code,
            description: describe(code, is_day),
            formatted_time: format_hour(&hourly.time[index], time_format),
        });
    }
    points
}

/// Skip today and take the next five days.
fn daily_points(daily: &DailySnapshot) -> Vec<DailyPoint> {
    daily
        .time
        .iter()
        .enumerate()
        .skip(1)
        .take(DAILY_POINTS)
        .map(|(i, date)| DailyPoint {
            date: date.clone(),
            max_temperature: daily
                .temperature_2m_max
                .get(i)
                .copied()
                .unwrap_or_default()
                .round() as i32,
            day: weekday_label(date),
        })
        .collect()
}

/// Abbreviated lowercase weekday, e.g. "mon".
fn weekday_label(date: &str) -> String {
    parse_date_loose(date)
        .map(|d| d.format("%a").to_string().to_lowercase())
        .unwrap_or_default()
}

/// "2pm" in 12-hour mode, "14:00" in 24-hour mode.
fn format_hour(raw: &str, time_format: TimeFormat) -> String {
    let Some(dt) = parse_datetime(raw) else {
        return String::new();
    };
    match time_format {
        TimeFormat::Hour12 => {
            let (is_pm, hour) = dt.hour12();
            format!("{}{}", hour, if is_pm { "pm" } else { "am" })
        }
        TimeFormat::Hour24 => format!("{:02}:{:02}", dt.hour(), dt.minute()),
    }
}
