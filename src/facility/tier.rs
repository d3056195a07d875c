use std::fmt;

use serde::{Deserialize, Serialize};

/// Solar resource classification of a location, `A` being the sunniest.
///
/// Ordering follows the resource: `A < B < C < D` means decreasing
/// irradiation. Conversion from a tag never fails; anything other than the
/// four tags resolves to [`IrradiationTier::C`].
///
/// # Examples
///
/// ```
/// use microgrid_results::facility::IrradiationTier;
///
/// assert_eq!(IrradiationTier::from("A"), IrradiationTier::A);
/// assert_eq!(IrradiationTier::from("Z"), IrradiationTier::C);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum IrradiationTier {
    A,
    B,
    #[default]
    C,
    D,
}

impl IrradiationTier {
    pub const ALL: [IrradiationTier; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Latitude bands used when no reference city is available.
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude < 30.0 {
            Self::A
        } else if latitude < 32.0 {
            Self::B
        } else if latitude < 34.0 {
            Self::C
        } else {
            Self::D
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl From<&str> for IrradiationTier {
    fn from(tag: &str) -> Self {
        match tag {
            "A" => Self::A,
            "B" => Self::B,
            "C" => Self::C,
            "D" => Self::D,
            _ => Self::C,
        }
    }
}

impl From<String> for IrradiationTier {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl fmt::Display for IrradiationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
