use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Review platforms the scraper supports. The editor treats platform tags as
/// plain strings; this enumeration is the authoritative list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GoogleMaps,
    Tripadvisor,
    Booking,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::GoogleMaps, Platform::Tripadvisor, Platform::Booking];

    pub fn tag(&self) -> &'static str {
        match self {
            Platform::GoogleMaps => "google_maps",
            Platform::Tripadvisor => "tripadvisor",
            Platform::Booking => "booking",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Platform> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

/// Scrape cadence defaults applied when a location is first attached to a
/// platform. `initial_depth` covers the one-off backfill, `recurring_depth`
/// each scheduled pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeDefaults {
    pub initial_depth: u32,
    pub recurring_depth: u32,
    pub frequency: ScrapeFrequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeFrequency {
    Daily,
    Weekly,
    Monthly,
}

static SCRAPE_DEFAULTS: Lazy<Vec<(Platform, ScrapeDefaults)>> = Lazy::new(|| {
    vec![
        (
            Platform::GoogleMaps,
            ScrapeDefaults { initial_depth: 500, recurring_depth: 50, frequency: ScrapeFrequency::Weekly },
        ),
        (
            Platform::Tripadvisor,
            ScrapeDefaults { initial_depth: 300, recurring_depth: 30, frequency: ScrapeFrequency::Weekly },
        ),
        (
            Platform::Booking,
            ScrapeDefaults { initial_depth: 200, recurring_depth: 20, frequency: ScrapeFrequency::Weekly },
        ),
    ]
});

/// Defaults for one platform.
pub fn scrape_defaults(platform: Platform) -> ScrapeDefaults {
    SCRAPE_DEFAULTS
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, d)| *d)
        .unwrap_or(ScrapeDefaults {
            initial_depth: 100,
            recurring_depth: 20,
            frequency: ScrapeFrequency::Weekly,
        })
}

/// The whole table, in declaration order. Served as-is by the platforms
/// endpoint.
pub fn all_scrape_defaults() -> &'static [(Platform, ScrapeDefaults)] {
    &SCRAPE_DEFAULTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_tag(platform.tag()), Some(platform));
        }
        assert_eq!(Platform::from_tag("yelp"), None);
    }

    #[test]
    fn every_platform_has_defaults() {
        for platform in Platform::ALL {
            let d = scrape_defaults(platform);
            assert!(d.initial_depth >= d.recurring_depth);
        }
    }

    #[test]
    fn serializes_as_snake_case_tags() {
        let json = serde_json::to_value(Platform::GoogleMaps).unwrap();
        assert_eq!(json, serde_json::json!("google_maps"));
    }
}
