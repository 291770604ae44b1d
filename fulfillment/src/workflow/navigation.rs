use serde::Serialize;
use url::Url;

use crate::geo::{distance_meters, estimate_travel_minutes, Coordinate};

/// Platform whose navigation app receives the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NavigationPlatform {
    Ios,
    Android,
    Web,
}

/// Straight-line route summary shown before handing off to the navigation app.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub origin: Option<Coordinate>,
    pub destination: Coordinate,
    pub distance_meters: Option<f64>,
    pub estimated_minutes: Option<u32>,
}

impl RoutePlan {
    pub fn new(origin: Option<Coordinate>, destination: Coordinate) -> Self {
        let distance = origin.map(|origin| distance_meters(&origin, &destination));
        Self {
            origin,
            destination,
            distance_meters: distance,
            estimated_minutes: distance.map(estimate_travel_minutes),
        }
    }

    /// Deep link into the platform's navigation app.
    pub fn navigation_url(&self, platform: NavigationPlatform) -> Result<Url, url::ParseError> {
        let destination = coordinate_param(&self.destination);
        match platform {
            NavigationPlatform::Ios => {
                let mut url = Url::parse("maps:")?;
                {
                    let mut query = url.query_pairs_mut();
                    query.append_pair("daddr", &destination);
                    if let Some(origin) = &self.origin {
                        query.append_pair("saddr", &coordinate_param(origin));
                    }
                }
                Ok(url)
            }
            NavigationPlatform::Android => {
                let mut url = Url::parse("geo:0,0")?;
                url.query_pairs_mut().append_pair("q", &destination);
                Ok(url)
            }
            NavigationPlatform::Web => {
                let mut url = Url::parse("https://www.google.com/maps/dir/")?;
                {
                    let mut query = url.query_pairs_mut();
                    query.append_pair("api", "1");
                    if let Some(origin) = &self.origin {
                        query.append_pair("origin", &coordinate_param(origin));
                    }
                    query.append_pair("destination", &destination);
                }
                Ok(url)
            }
        }
    }
}

fn coordinate_param(coordinate: &Coordinate) -> String {
    format!("{},{}", coordinate.latitude(), coordinate.longitude())
}
