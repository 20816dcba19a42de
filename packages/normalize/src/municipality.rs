//! Municipality name resolution.
//!
//! Resolves a respondent's free-text city to approximate coordinates for the
//! Greater Florianópolis region and the larger Santa Catarina cities.
//! Unknown cities are placed at [`HOME_MUNICIPALITY`] under their own label
//! so they still show up (and are counted) on the map.

use serde::Serialize;

use crate::contains_either;

/// A known municipality and its approximate center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    /// Canonical municipality name.
    pub name: &'static str,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Municipality {
    const fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }
}

/// Fallback position for cities missing from [`MUNICIPALITIES`].
pub const HOME_MUNICIPALITY: Municipality = Municipality::new("Palhoça", -27.6453, -48.6697);

/// Known municipalities, in match order.
pub const MUNICIPALITIES: &[Municipality] = &[
    HOME_MUNICIPALITY,
    Municipality::new("Florianópolis", -27.5954, -48.5480),
    Municipality::new("São José", -27.6146, -48.6366),
    Municipality::new("Biguaçu", -27.4942, -48.6556),
    Municipality::new("Antônio Carlos", -27.5194, -48.7669),
    Municipality::new("Santo Amaro da Imperatriz", -27.6881, -48.7786),
    Municipality::new("Paulo Lopes", -27.9617, -48.6847),
    Municipality::new("Garopaba", -28.0239, -48.6128),
    Municipality::new("Imbituba", -28.2403, -48.6703),
    Municipality::new("Tubarão", -28.4800, -49.0069),
    Municipality::new("Criciúma", -28.6775, -49.3697),
    Municipality::new("Blumenau", -26.9194, -49.0661),
    Municipality::new("Joinville", -26.3044, -48.8456),
    Municipality::new("Chapecó", -27.0969, -52.6178),
];

/// A raw city label placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMunicipality {
    /// Display label: the trimmed raw input.
    pub label: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Canonical name of the matched table entry, `None` for the fallback.
    pub matched: Option<&'static str>,
}

/// Finds the first known municipality matching a raw city string.
#[must_use]
pub fn match_municipality(raw: &str) -> Option<&'static Municipality> {
    let lower = raw.trim().to_lowercase();

    MUNICIPALITIES
        .iter()
        .find(|m| contains_either(&lower, &m.name.to_lowercase()))
}

/// Resolves a raw city string to a map position.
///
/// Never fails: cities outside the table get [`HOME_MUNICIPALITY`]'s
/// coordinates and keep their own label.
#[must_use]
pub fn resolve_municipality(raw: &str) -> ResolvedMunicipality {
    let label = raw.trim().to_string();

    match match_municipality(raw) {
        Some(m) => ResolvedMunicipality {
            label,
            latitude: m.latitude,
            longitude: m.longitude,
            matched: Some(m.name),
        },
        None => ResolvedMunicipality {
            label,
            latitude: HOME_MUNICIPALITY.latitude,
            longitude: HOME_MUNICIPALITY.longitude,
            matched: None,
        },
    }
}
