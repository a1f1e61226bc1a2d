//! Regional context catalog
//!
//! Basins are a closed set. The selected basin is sent to the remote model as
//! hint text only; no local computation depends on it.

/// Identifier of a catalogued basin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BasinId {
    /// No regional bias
    #[default]
    Global,
    /// Swat River Basin
    Swat,
    /// Hunza Valley
    Hunza,
    /// Islamabad/Potwar plateau
    Islot,
    /// Soan River
    Soan,
    /// Oceanic floor
    Floor,
}

/// A named geological region with a short description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Basin {
    /// Catalog identifier
    pub id: BasinId,
    /// Display name
    pub name: &'static str,
    /// What the region is known for
    pub description: &'static str,
}

/// The full catalog, in presentation order
pub const BASINS: [Basin; 6] = [
    Basin {
        id: BasinId::Global,
        name: "Global Database",
        description: "General geological patterns",
    },
    Basin {
        id: BasinId::Swat,
        name: "Swat River Basin",
        description: "Metamorphic complexes of the Kohistan Arc",
    },
    Basin {
        id: BasinId::Hunza,
        name: "Hunza Valley",
        description: "High-grade crystalline rocks and Karakoram sutures",
    },
    Basin {
        id: BasinId::Islot,
        name: "Islamabad/Potwar",
        description: "Cenozoic Siwalik molasses sequences",
    },
    Basin {
        id: BasinId::Soan,
        name: "Soan River",
        description: "Quaternary alluvial and fan deposits",
    },
    Basin {
        id: BasinId::Floor,
        name: "Oceanic Floor",
        description: "Ophiolitic sequences and deep-sea sediments",
    },
];

impl BasinId {
    /// Catalog code (e.g. "SWAT")
    pub fn as_str(&self) -> &'static str {
        match self {
            BasinId::Global => "GLOBAL",
            BasinId::Swat => "SWAT",
            BasinId::Hunza => "HUNZA",
            BasinId::Islot => "ISLOT",
            BasinId::Soan => "SOAN",
            BasinId::Floor => "FLOOR",
        }
    }

    /// Parse a catalog code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        BASINS
            .iter()
            .map(|basin| basin.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Look up the catalog entry for this id
    pub fn basin(&self) -> &'static Basin {
        // Every variant has exactly one catalog entry.
        match self {
            BasinId::Global => &BASINS[0],
            BasinId::Swat => &BASINS[1],
            BasinId::Hunza => &BASINS[2],
            BasinId::Islot => &BASINS[3],
            BasinId::Soan => &BASINS[4],
            BasinId::Floor => &BASINS[5],
        }
    }
}

impl Basin {
    /// The default (global) context
    pub fn global() -> &'static Basin {
        BasinId::Global.basin()
    }
}

impl std::fmt::Display for BasinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BasinId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown basin: {}", s))
    }
}
