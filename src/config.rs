use serde::{Deserialize, Serialize};

use crate::storage::Storage;

const SETTINGS_KEY: &str = "settings";

/// Temperature unit requested from the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    Fahrenheit,
    Celsius,
}

impl TempUnit {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "fahrenheit",
            Self::Celsius => "celsius",
        }
    }
}

/// Wind speed unit requested from the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    Mph,
    Kmh,
}

impl SpeedUnit {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Mph => "mph",
            Self::Kmh => "kmh",
        }
    }
}

/// Clock display mode for forecast time labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12hr")]
    Hour12,
    #[serde(rename = "24hr")]
    Hour24,
}

/// User settings shared by the new-tab page, persisted in the same storage
/// namespace as the replica and cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_unit: TempUnit,
    pub wind_speed_unit: SpeedUnit,
    pub time_format: TimeFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            temperature_unit: TempUnit::Fahrenheit,
            wind_speed_unit: SpeedUnit::Mph,
            time_format: TimeFormat::Hour12,
        }
    }
}

impl Settings {
    /// Load settings from storage, falling back to defaults when the slot is
    /// missing or unparseable.
    pub fn load(storage: &impl Storage) -> Self {
        match storage.get(SETTINGS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Malformed settings, using defaults: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn save(&self, storage: &mut impl Storage) {
        match serde_json::to_string(self) {
            Ok(json) => storage.set(SETTINGS_KEY, &json),
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn roundtrip_through_storage() {
        let mut store = MemoryStorage::new();
        let settings = Settings {
            latitude: 51.5,
            longitude: -0.12,
            temperature_unit: TempUnit::Celsius,
            wind_speed_unit: SpeedUnit::Kmh,
            time_format: TimeFormat::Hour24,
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn malformed_settings_fall_back_to_defaults() {
        let mut store = MemoryStorage::new();
        store.set("settings", "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
