//! Weather snapshot consumed by a single dispersion evaluation
//!
//! Observations are refreshed by an upstream provider every 15-30 minutes and
//! treated as immutable for the duration of one evaluation.

use crate::core_types::units::{Celsius, Degrees, MetersPerSecond, Percent};
use crate::error::{DispersionError, DispersionResult};
use serde::{Deserialize, Serialize};

/// Day/night flag driving the stability table and the diurnal emission factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// First and last local hours treated as daytime (inclusive)
    pub const DAYTIME_HOURS: std::ops::RangeInclusive<u32> = 7..=19;

    /// Classify a local clock hour.
    ///
    /// Only 0-23 is meaningful; larger values do not wrap and read as night.
    /// [`WeatherRecord`] conversion rejects them before they get here.
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        if Self::DAYTIME_HOURS.contains(&hour) {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }

    #[must_use]
    pub fn is_day(self) -> bool {
        self == TimeOfDay::Day
    }
}

/// Insolation (day) or cloud cover (night) category for Pasquill-Gifford classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsolationCategory {
    /// Clear summer sky, sun high
    StrongSolar,
    /// Partly cloudy or mid-season sun
    ModerateSolar,
    /// Low sun or broken cloud
    SlightSolar,
    /// Full daytime overcast
    Overcast,
    /// Night with ≤ 3/8 cloud
    ClearNight,
    /// Night with ≥ 4/8 cloud
    CloudyNight,
}

impl InsolationCategory {
    /// Derive a category from a provider's free-text description.
    ///
    /// Matches English and Russian keywords in order: clear, cloud, overcast.
    /// "overcast clouds" therefore reads as cloudy, which is what the
    /// upstream feed's wording has always produced. Unrecognised text falls back
    /// to moderate solar by day and cloudy night after dark.
    #[must_use]
    pub fn from_description(description: &str, time_of_day: TimeOfDay) -> Self {
        let desc = description.to_lowercase();
        let day = time_of_day.is_day();

        if desc.contains("clear") || desc.contains("ясно") {
            if day {
                InsolationCategory::StrongSolar
            } else {
                InsolationCategory::ClearNight
            }
        } else if desc.contains("cloud") || desc.contains("облач") {
            if day {
                InsolationCategory::SlightSolar
            } else {
                InsolationCategory::CloudyNight
            }
        } else if desc.contains("overcast") || desc.contains("пасмурн") {
            InsolationCategory::Overcast
        } else if day {
            InsolationCategory::ModerateSolar
        } else {
            InsolationCategory::CloudyNight
        }
    }

    /// Whether this category describes daytime sky conditions
    #[must_use]
    pub fn is_daytime_category(self) -> bool {
        matches!(
            self,
            InsolationCategory::StrongSolar
                | InsolationCategory::ModerateSolar
                | InsolationCategory::SlightSolar
                | InsolationCategory::Overcast
        )
    }
}

/// Surface weather observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Wind speed at the 10 m reference height
    pub wind_speed: MetersPerSecond,
    /// Direction the wind blows from
    pub wind_direction: Degrees,
    pub temperature: Celsius,
    pub relative_humidity: Percent,
    /// Precipitation rate (mm/h)
    pub precipitation_rate: f64,
    pub insolation: InsolationCategory,
    pub time_of_day: TimeOfDay,
}

impl WeatherObservation {
    /// Reject observations the model cannot interpret.
    ///
    /// Wind below the calm threshold is valid here; the solver turns it into a
    /// zero result.
    ///
    /// # Errors
    /// `InvalidWindSpeed` for negative or non-finite wind, `MissingInput` for
    /// other NaN fields.
    pub fn validate(&self) -> DispersionResult<()> {
        let speed = *self.wind_speed;
        if !speed.is_finite() || speed < 0.0 {
            return Err(DispersionError::InvalidWindSpeed(speed));
        }
        DispersionError::require_finite("wind_direction", *self.wind_direction)?;
        DispersionError::require_finite("temperature", *self.temperature)?;
        DispersionError::require_finite("relative_humidity", *self.relative_humidity)?;
        DispersionError::require_finite("precipitation_rate", self.precipitation_rate)?;
        Ok(())
    }

    /// Downwind travel direction of the plume
    #[must_use]
    pub fn downwind_bearing(&self) -> Degrees {
        self.wind_direction.opposite()
    }
}

/// Loosely typed weather row as delivered by the provider/cache layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherRecord {
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    /// Provider description, e.g. "broken clouds" or "ясно"
    pub description: Option<String>,
    /// Local clock hour (0-23) of the observation
    pub hour: Option<u32>,
}

impl TryFrom<WeatherRecord> for WeatherObservation {
    type Error = DispersionError;

    fn try_from(record: WeatherRecord) -> Result<Self, Self::Error> {
        let wind_speed = record
            .wind_speed
            .ok_or(DispersionError::MissingInput { field: "wind_speed" })?;
        let wind_direction = record
            .wind_direction
            .ok_or(DispersionError::MissingInput {
                field: "wind_direction",
            })?;
        let temperature = record
            .temperature
            .ok_or(DispersionError::MissingInput { field: "temperature" })?;
        let humidity = record
            .humidity
            .ok_or(DispersionError::MissingInput { field: "humidity" })?;
        let hour = record
            .hour
            .ok_or(DispersionError::MissingInput { field: "hour" })?;
        if hour >= 24 {
            return Err(DispersionError::InvalidHour(hour));
        }

        let time_of_day = TimeOfDay::from_hour(hour);
        let insolation = InsolationCategory::from_description(
            record.description.as_deref().unwrap_or_default(),
            time_of_day,
        );

        let observation = WeatherObservation {
            wind_speed: MetersPerSecond::new(wind_speed),
            wind_direction: Degrees::new(wind_direction),
            temperature: Celsius::new(temperature),
            relative_humidity: Percent::new(humidity),
            // A missing precipitation field means the provider saw none
            precipitation_rate: record.precipitation.unwrap_or(0.0),
            insolation,
            time_of_day,
        };
        observation.validate()?;
        Ok(observation)
    }
}
