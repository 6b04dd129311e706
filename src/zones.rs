//! Ordinal heat-zone classification over Celsius temperature grids.

use ndarray::Array2;

use crate::config::ZoneThresholds;

/// The four heat severity zones, in increasing order.
///
/// Cells that are missing or below the warm threshold carry no zone; in
/// a zone grid they are encoded as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatZone {
    Warm = 1,
    VeryWarm = 2,
    Hot = 3,
    Critical = 4,
}

impl HeatZone {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            HeatZone::Warm => "Warm",
            HeatZone::VeryWarm => "Very Warm",
            HeatZone::Hot => "Hot",
            HeatZone::Critical => "Critical",
        }
    }

    /// Celsius range of this zone, as shown in the legend.
    pub fn range_label(self, th: &ZoneThresholds) -> String {
        match self {
            HeatZone::Warm => format!("{:.0}–{:.0} °C", th.warm, th.very_warm),
            HeatZone::VeryWarm => format!("{:.0}–{:.0} °C", th.very_warm, th.hot),
            HeatZone::Hot => format!("{:.0}–{:.0} °C", th.hot, th.hot_upper),
            HeatZone::Critical => format!(">{:.0} °C", th.hot_upper),
        }
    }

    pub fn all() -> [HeatZone; 4] {
        [
            HeatZone::Warm,
            HeatZone::VeryWarm,
            HeatZone::Hot,
            HeatZone::Critical,
        ]
    }
}

/// Classify a single Celsius value.
///
/// The bands are `[warm, very_warm)`, `[very_warm, hot)`, `[hot, hot_upper]`
/// and `(hot_upper, inf)`. The hot band is closed at the top where the two
/// below it are half-open; that asymmetry is intentional policy and the
/// classifier preserves it exactly.
pub fn classify(celsius: f64, th: &ZoneThresholds) -> Option<HeatZone> {
    if !celsius.is_finite() {
        return None;
    }
    if celsius > th.hot_upper {
        Some(HeatZone::Critical)
    } else if celsius >= th.hot {
        Some(HeatZone::Hot)
    } else if celsius >= th.very_warm {
        Some(HeatZone::VeryWarm)
    } else if celsius >= th.warm {
        Some(HeatZone::Warm)
    } else {
        None
    }
}

/// Classify a temperature grid into zone codes (0 = unclassified).
pub fn classify_grid(celsius: &Array2<f64>, th: &ZoneThresholds) -> Array2<u8> {
    celsius.mapv(|t| classify(t, th).map(HeatZone::code).unwrap_or(0))
}

/// Binary indicator of the critical zone, 1 where the zone code is 4.
pub fn critical_mask(zones: &Array2<u8>) -> Array2<u8> {
    zones.mapv(|z| u8::from(z == HeatZone::Critical.code()))
}

/// Legend lines mapping zone number to label and Celsius range.
pub fn legend(th: &ZoneThresholds) -> Vec<String> {
    HeatZone::all()
        .iter()
        .map(|z| format!("{} = {} ({})", z.code(), z.label(), z.range_label(th)))
        .collect()
}
