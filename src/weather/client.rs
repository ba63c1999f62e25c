use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{Settings, SpeedUnit, TempUnit};
use crate::error::Error;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Query parameters for a forecast snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_unit: TempUnit,
    pub wind_speed_unit: SpeedUnit,
}

impl From<&Settings> for ForecastQuery {
    fn from(settings: &Settings) -> Self {
        Self {
            latitude: settings.latitude,
            longitude: settings.longitude,
            temperature_unit: settings.temperature_unit,
            wind_speed_unit: settings.wind_speed_unit,
        }
    }
}

/// Current conditions as reported by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub time: String,
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub relative_humidity_2m: f64,
    pub precipitation_probability: f64,
    pub wind_speed_10m: f64,
    pub weather_code: u16,
    pub is_day: u8,
}

/// Hourly series: aligned arrays indexed by forecast hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySnapshot {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<f64>,
    #[serde(default)]
    pub weather_code: Vec<u16>,
    #[serde(default)]
    pub is_day: Vec<u8>,
}

/// Daily series: aligned arrays indexed by day, today first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
    #[serde(default)]
    pub weather_code: Vec<u16>,
}

/// A whole forecast snapshot. Cached and replaced as a unit, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub current: CurrentSnapshot,
    #[serde(default)]
    pub hourly: HourlySnapshot,
    #[serde(default)]
    pub daily: DailySnapshot,
}

/// The snapshot endpoint as seen by the cache. Implemented over HTTP by
/// [`OpenMeteoClient`] and by canned snapshots in tests.
pub trait ForecastTransport {
    fn fetch(&self, query: &ForecastQuery) -> impl Future<Output = Result<ForecastSnapshot, Error>>;
}

/// HTTP client for the forecast snapshot endpoint. No credential required.
#[derive(Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let http = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }
}

impl ForecastTransport for OpenMeteoClient {
    async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastSnapshot, Error> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", query.latitude.to_string()),
                ("longitude", query.longitude.to_string()),
                (
                    "hourly",
                    "temperature_2m,weather_code,is_day".to_string(),
                ),
                ("daily", "temperature_2m_max,weather_code".to_string()),
                (
                    "current",
                    "temperature_2m,weather_code,relative_humidity_2m,\
                     precipitation_probability,wind_speed_10m,apparent_temperature,is_day"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
                ("forecast_hours", "24".to_string()),
                ("forecast_days", "6".to_string()),
                (
                    "temperature_unit",
                    query.temperature_unit.as_param().to_string(),
                ),
                (
                    "wind_speed_unit",
                    query.wind_speed_unit.as_param().to_string(),
                ),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                endpoint: "forecast",
                status,
            });
        }

        Ok(resp.json().await?)
    }
}
