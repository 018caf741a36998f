//! Risk tiers and their display mapping.
//!
//! The upstream service labels each neighborhood with a `nivel_risco` token
//! (`baixo`, `medio`, `alto`). Everything the dashboard draws for a tier is
//! derived from [`RiskTier`] through total matches, so adding a tier is a
//! compile error everywhere it matters.

use serde::Serialize;

/// Ordinal risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Glyph shown next to the risk badge and in the card footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskIcon {
    Check,
    Warning,
}

impl RiskIcon {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Check => "✔",
            Self::Warning => "⚠",
        }
    }
}

/// An sRGB color with its hex form kept alongside for display and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub hex: &'static str,
}

pub const RED: Rgb = Rgb { r: 0xef, g: 0x44, b: 0x44, hex: "#ef4444" };
pub const ORANGE: Rgb = Rgb { r: 0xf9, g: 0x73, b: 0x16, hex: "#f97316" };
pub const GREEN: Rgb = Rgb { r: 0x22, g: 0xc5, b: 0x5e, hex: "#22c55e" };
pub const SLATE: Rgb = Rgb { r: 0x94, g: 0xa3, b: 0xb8, hex: "#94a3b8" };

/// What a card badge, the map popup and the footer need to know about a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskDisplay {
    pub tier: RiskTier,
    pub color: Rgb,
    pub label: &'static str,
    pub icon: RiskIcon,
}

impl RiskTier {
    /// Parses an upstream token. Unknown or missing tokens are `Low`.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("alto") => Self::High,
            Some("medio") => Self::Medium,
            _ => Self::Low,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baixo",
            Self::Medium => "medio",
            Self::High => "alto",
        }
    }

    pub const fn display(self) -> RiskDisplay {
        match self {
            Self::High => RiskDisplay {
                tier: self,
                color: RED,
                label: "RISCO ALTO",
                icon: RiskIcon::Warning,
            },
            Self::Medium => RiskDisplay {
                tier: self,
                color: ORANGE,
                label: "ATENÇÃO",
                icon: RiskIcon::Warning,
            },
            Self::Low => RiskDisplay {
                tier: self,
                color: GREEN,
                label: "NORMAL",
                icon: RiskIcon::Check,
            },
        }
    }

    pub const fn marker_style(self) -> MarkerStyle {
        match self {
            Self::Low => MarkerStyle {
                color: GREEN,
                radius: MarkerRadius::Small,
                pulse: false,
            },
            Self::Medium => MarkerStyle {
                color: ORANGE,
                radius: MarkerRadius::Large,
                pulse: false,
            },
            Self::High => MarkerStyle {
                color: RED,
                radius: MarkerRadius::Large,
                pulse: true,
            },
        }
    }
}

/// Maps a `nivel_risco` token to its display tuple.
///
/// Total by construction: anything that is not `alto` or `medio`, including
/// an absent token, lands on the normal tier.
pub fn classify(level: Option<&str>) -> RiskDisplay {
    RiskTier::from_token(level).display()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRadius {
    Small,
    Large,
}

impl MarkerRadius {
    /// Fraction of the shorter map side used as the dot radius.
    pub const fn scale(self) -> f64 {
        match self {
            Self::Small => 0.018,
            Self::Large => 0.028,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: Rgb,
    pub radius: MarkerRadius,
    pub pulse: bool,
}

impl MarkerStyle {
    /// Neighborhood with no snapshot at all: low-tier size, neutral tint.
    pub const fn no_data() -> Self {
        Self {
            color: SLATE,
            radius: MarkerRadius::Small,
            pulse: false,
        }
    }
}

/// Seconds for one full pulse of the high-risk halo.
pub const PULSE_PERIOD_SECS: f64 = 2.0;

/// Halo growth for a pulsing marker at `elapsed_secs`, in `[0, 1)`.
///
/// Rises linearly over 70% of the period and rests for the remainder, the
/// same shape as an expanding ring that fades out.
pub fn pulse_phase(elapsed_secs: f64) -> f64 {
    let t = elapsed_secs.rem_euclid(PULSE_PERIOD_SECS) / PULSE_PERIOD_SECS;
    if t < 0.7 {
        t / 0.7
    } else {
        0.0
    }
}
