use crate::error::GeoStoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four feature collections kept for the barangay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Households,
    Facilities,
    Roads,
    Boundary,
}

impl Layer {
    pub const ALL: [Self; 4] = [Self::Households, Self::Facilities, Self::Roads, Self::Boundary];

    /// The name used by the HTTP API and the map client.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Households => "households",
            Self::Facilities => "facilities",
            Self::Roads => "roads",
            Self::Boundary => "boundary",
        }
    }

    /// The file holding this layer inside the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Households => "Cagpile_Households.geojson",
            Self::Facilities => "Cagpile_Facilities.geojson",
            Self::Roads => "Cagpile_Road.geojson",
            Self::Boundary => "Cagpile_Boundary.geojson",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Households => 0,
            Self::Facilities => 1,
            Self::Roads => 2,
            Self::Boundary => 3,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = GeoStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|layer| layer.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GeoStoreError::LayerNotFound { name: s.to_owned().into() })
    }
}
