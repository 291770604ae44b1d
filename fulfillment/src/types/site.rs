use serde::Serialize;

use crate::geo::Coordinate;

/// A candidate disposal site, decorated with its distance from the contractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposalSite {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub distance_meters: f64,
    pub vicinity_text: Option<String>,
    pub rating: Option<f64>,
}
