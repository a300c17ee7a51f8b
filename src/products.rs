/// CO-OPS product catalog.
///
/// Single source of truth for every product this service downloads: its
/// API product code, whether it takes a vertical datum, the maximum date
/// window one request may cover, and the alternate request shape (if any)
/// to fall back to when the preferred shape is rejected.
///
/// Window sizes follow the provider's documented per-request limits:
/// 6-minute products are limited to roughly a month per call, hourly and
/// high/low products to a year, and daily/monthly statistics to a decade.

use crate::chunker::ChunkWindow;

// ---------------------------------------------------------------------------
// Request shape
// ---------------------------------------------------------------------------

/// One concrete way of asking the provider for a product: the datum (where
/// required), the sampling interval (predictions only), and the chunk
/// window sized for that combination. A product's fallback is simply a
/// second `RequestShape`, so shape-level retries need no special cases.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestShape {
    pub datum: Option<String>,
    pub interval: Option<&'static str>,
    pub window: ChunkWindow,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A named CO-OPS observation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    WaterLevel,
    HourlyHeight,
    HighLow,
    DailyMean,
    DailyMaxMin,
    MonthlyMean,
    OneMinuteWaterLevel,
    Predictions,
    AirTemperature,
    WaterTemperature,
    Wind,
    AirPressure,
    Humidity,
    Visibility,
}

/// Every product the batch downloader handles, in download order: water
/// level family first, then tide predictions, then meteorological sensors.
pub static PRODUCT_CATALOG: &[Product] = &[
    Product::WaterLevel,
    Product::HourlyHeight,
    Product::HighLow,
    Product::DailyMean,
    Product::DailyMaxMin,
    Product::MonthlyMean,
    Product::OneMinuteWaterLevel,
    Product::Predictions,
    Product::AirTemperature,
    Product::WaterTemperature,
    Product::Wind,
    Product::AirPressure,
    Product::Humidity,
    Product::Visibility,
];

impl Product {
    /// The provider's product code, also used in artifact file names.
    pub fn name(self) -> &'static str {
        match self {
            Product::WaterLevel => "water_level",
            Product::HourlyHeight => "hourly_height",
            Product::HighLow => "high_low",
            Product::DailyMean => "daily_mean",
            Product::DailyMaxMin => "daily_max_min",
            Product::MonthlyMean => "monthly_mean",
            Product::OneMinuteWaterLevel => "one_minute_water_level",
            Product::Predictions => "predictions",
            Product::AirTemperature => "air_temperature",
            Product::WaterTemperature => "water_temperature",
            Product::Wind => "wind",
            Product::AirPressure => "air_pressure",
            Product::Humidity => "humidity",
            Product::Visibility => "visibility",
        }
    }

    /// Inverse of `name`, for CLI product selection.
    pub fn from_name(name: &str) -> Option<Product> {
        PRODUCT_CATALOG.iter().copied().find(|p| p.name() == name)
    }

    /// Water-level-family products require a vertical datum (MLLW, MSL, …);
    /// meteorological products reject one.
    pub fn needs_datum(self) -> bool {
        !matches!(
            self,
            Product::AirTemperature
                | Product::WaterTemperature
                | Product::Wind
                | Product::AirPressure
                | Product::Humidity
                | Product::Visibility
        )
    }

    /// Maximum date window for one request under the preferred shape.
    pub fn window(self) -> ChunkWindow {
        match self {
            Product::WaterLevel => ChunkWindow::Months(1),
            Product::HourlyHeight => ChunkWindow::Years(1),
            Product::HighLow => ChunkWindow::Years(1),
            Product::DailyMean => ChunkWindow::Years(10),
            Product::DailyMaxMin => ChunkWindow::Years(10),
            Product::MonthlyMean => ChunkWindow::Years(10),
            Product::OneMinuteWaterLevel => ChunkWindow::Days(4),
            Product::Predictions => ChunkWindow::Years(1),
            Product::AirTemperature
            | Product::WaterTemperature
            | Product::Wind
            | Product::AirPressure
            | Product::Humidity
            | Product::Visibility => ChunkWindow::Months(1),
        }
    }

    /// The shape tried first: the product's own window, the caller's datum
    /// where one is required, and the 6-minute interval for predictions.
    pub fn preferred_shape(self, datum: &str) -> RequestShape {
        RequestShape {
            datum: self.needs_datum().then(|| datum.to_string()),
            interval: matches!(self, Product::Predictions).then_some("6"),
            window: self.window(),
        }
    }

    /// The alternate shape to reissue the whole plan under when the
    /// preferred shape is rejected. Subordinate tide stations publish no
    /// 6-minute predictions, only high/low events, which the API allows
    /// at ten years per request.
    pub fn fallback_shape(self, datum: &str) -> Option<RequestShape> {
        match self {
            Product::Predictions => Some(RequestShape {
                datum: Some(datum.to_string()),
                interval: Some("hilo"),
                window: ChunkWindow::Years(10),
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
