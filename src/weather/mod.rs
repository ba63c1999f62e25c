pub mod client;
pub mod descriptions;
pub mod view;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TimeFormat;
use crate::error::Error;
use crate::storage::Storage;
use client::{ForecastQuery, ForecastSnapshot, ForecastTransport};
use view::{WeatherView, build_weather_view};

const CACHE_KEY: &str = "weather_data";
const CACHE_EXPIRY_MINUTES: i64 = 15;

/// The single cache entry: a whole snapshot plus the instant it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    data: ForecastSnapshot,
    timestamp: DateTime<Utc>,
}

/// Result of a cache read. `data` is `None` when nothing usable is stored;
/// `is_stale` tells the caller to kick off a background refresh while
/// rendering what it has.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedWeather {
    pub data: Option<WeatherView>,
    pub is_stale: bool,
}

/// Time-boxed cache over the forecast snapshot endpoint.
///
/// `refresh` always hits the network and overwrites the entry; `read_cached`
/// never does. Together they support stale-while-revalidate: render the
/// cached view immediately, refresh in the background when it is stale.
pub struct WeatherCache<T, S> {
    client: T,
    storage: S,
    expiry: Duration,
}

impl<T: ForecastTransport, S: Storage> WeatherCache<T, S> {
    pub fn new(client: T, storage: S) -> Self {
        Self {
            client,
            storage,
            expiry: Duration::minutes(CACHE_EXPIRY_MINUTES),
        }
    }

    /// Fetch a fresh snapshot, cache it, and return its derived view.
    /// Fetch failures propagate — fallback-to-stale is the caller's call.
    pub async fn refresh(
        &mut self,
        query: &ForecastQuery,
        time_format: TimeFormat,
    ) -> Result<WeatherView, Error> {
        let data = self.client.fetch(query).await?;
        log::debug!("Fetched forecast snapshot for {:.2},{:.2}", query.latitude, query.longitude);

        let entry = CacheEntry {
            data,
            timestamp: Utc::now(),
        };
        match serde_json::to_string(&entry) {
            Ok(json) => self.storage.set(CACHE_KEY, &json),
            Err(e) => log::warn!("Failed to serialize weather cache: {}", e),
        }

        Ok(build_weather_view(&entry.data, time_format))
    }

    /// Read the cached snapshot without touching the network. A corrupt
    /// entry is purged and reported as absent.
    pub fn read_cached(&mut self, time_format: TimeFormat) -> CachedWeather {
        let Some(raw) = self.storage.get(CACHE_KEY) else {
            return CachedWeather {
                data: None,
                is_stale: false,
            };
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Malformed weather cache, purging: {}", e);
                self.storage.remove(CACHE_KEY);
                return CachedWeather {
                    data: None,
                    is_stale: false,
                };
            }
        };

        let age = Utc::now() - entry.timestamp;
        CachedWeather {
            data: Some(build_weather_view(&entry.data, time_format)),
            is_stale: age >= self.expiry,
        }
    }

    pub fn clear(&mut self) {
        self.storage.remove(CACHE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::client::{CurrentSnapshot, DailySnapshot, HourlySnapshot};
    use super::*;
    use crate::config::{SpeedUnit, TempUnit};
    use crate::storage::MemoryStorage;

    fn snapshot() -> ForecastSnapshot {
        ForecastSnapshot {
            current: CurrentSnapshot {
                time: "2024-06-01T08:00".to_string(),
                temperature_2m: 70.0,
                apparent_temperature: 71.0,
                relative_humidity_2m: 50.0,
                precipitation_probability: 0.0,
                wind_speed_10m: 5.0,
                weather_code: 0,
                is_day: 1,
            },
            hourly: HourlySnapshot::default(),
            daily: DailySnapshot::default(),
        }
    }

    fn query() -> ForecastQuery {
        ForecastQuery {
            latitude: 40.7,
            longitude: -74.0,
            temperature_unit: TempUnit::Fahrenheit,
            wind_speed_unit: SpeedUnit::Mph,
        }
    }

    struct CannedClient {
        result: Option<ForecastSnapshot>,
    }

    impl ForecastTransport for CannedClient {
        async fn fetch(&self, _query: &ForecastQuery) -> Result<ForecastSnapshot, Error> {
            self.result.clone().ok_or(Error::Status {
                endpoint: "forecast",
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            })
        }
    }

    fn write_entry(storage: &mut MemoryStorage, age_minutes: i64) {
        let entry = CacheEntry {
            data: snapshot(),
            timestamp: Utc::now() - Duration::minutes(age_minutes),
        };
        storage.set(CACHE_KEY, &serde_json::to_string(&entry).unwrap());
    }

    #[tokio::test]
    async fn refresh_caches_and_returns_the_view() {
        let client = CannedClient {
            result: Some(snapshot()),
        };
        let mut cache = WeatherCache::new(client, MemoryStorage::new());

        let view = cache.refresh(&query(), TimeFormat::Hour12).await.unwrap();
        assert_eq!(view.current.description, "sunny");

        let cached = cache.read_cached(TimeFormat::Hour12);
        assert!(!cached.is_stale);
        assert_eq!(cached.data.unwrap(), view);
    }

    #[tokio::test]
    async fn refresh_failure_propagates_and_keeps_the_old_entry() {
        let client = CannedClient { result: None };
        let mut storage = MemoryStorage::new();
        write_entry(&mut storage, 20);

        let mut cache = WeatherCache::new(client, storage);
        assert!(cache.refresh(&query(), TimeFormat::Hour12).await.is_err());

        // The stale entry survives for stale-while-revalidate rendering
        let cached = cache.read_cached(TimeFormat::Hour12);
        assert!(cached.data.is_some());
        assert!(cached.is_stale);
    }

    #[test]
    fn empty_cache_reads_as_absent_not_stale() {
        let client = CannedClient { result: None };
        let mut cache = WeatherCache::new(client, MemoryStorage::new());

        let cached = cache.read_cached(TimeFormat::Hour12);
        assert_eq!(cached.data, None);
        assert!(!cached.is_stale);
    }

    #[test]
    fn entry_within_expiry_is_fresh() {
        let mut storage = MemoryStorage::new();
        write_entry(&mut storage, 14);

        let mut cache = WeatherCache::new(CannedClient { result: None }, storage);
        let cached = cache.read_cached(TimeFormat::Hour12);
        assert!(cached.data.is_some());
        assert!(!cached.is_stale);
    }

    #[test]
    fn entry_past_expiry_is_stale_but_usable() {
        let mut storage = MemoryStorage::new();
        write_entry(&mut storage, 16);

        let mut cache = WeatherCache::new(CannedClient { result: None }, storage);
        let cached = cache.read_cached(TimeFormat::Hour12);
        assert!(cached.data.is_some());
        assert!(cached.is_stale);
    }

    #[test]
    fn malformed_entry_is_purged_and_absent() {
        let mut storage = MemoryStorage::new();
        storage.set(CACHE_KEY, "{not a cache entry");

        let mut cache = WeatherCache::new(CannedClient { result: None }, storage);
        let cached = cache.read_cached(TimeFormat::Hour12);
        assert_eq!(cached.data, None);
        assert!(!cached.is_stale);
        assert_eq!(cache.storage.get(CACHE_KEY), None);
    }

    #[test]
    fn clear_removes_the_entry() {
        let mut storage = MemoryStorage::new();
        write_entry(&mut storage, 1);

        let mut cache = WeatherCache::new(CannedClient { result: None }, storage);
        cache.clear();
        assert_eq!(cache.read_cached(TimeFormat::Hour12).data, None);
    }
}
