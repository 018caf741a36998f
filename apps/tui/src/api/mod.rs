//! Access to the weather service.

mod client;
#[cfg(test)]
pub mod fake;

pub use client::{ApiError, HttpWeatherClient, WeatherSource};
