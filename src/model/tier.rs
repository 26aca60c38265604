// Score tiers and their static display tables

use serde::Serialize;
use std::fmt;

/// Shown with every result
pub const GENERAL_TIP: &str = "Sleep quality is strongly affected by stress, caffeine and \
physical activity. Get enough sleep and avoid screens before bed.";

/// Sleep quality tier, from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Map a score to its tier
///
/// Bands are checked from the top; a boundary value belongs to the higher
/// band. NaN falls through to `Poor`.
pub fn classify(score: f64) -> Tier {
    if score >= 8.0 {
        Tier::Excellent
    } else if score >= 6.0 {
        Tier::Good
    } else if score >= 4.0 {
        Tier::Fair
    } else {
        Tier::Poor
    }
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Excellent, Tier::Good, Tier::Fair, Tier::Poor];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Fair => "Fair",
            Tier::Poor => "Poor",
        }
    }

    /// Personal recommendation for this tier
    pub fn advisory(&self) -> &'static str {
        match self {
            Tier::Excellent => {
                "Your sleep is excellent! Keep your lifestyle healthy and consistent."
            }
            Tier::Good => "Already fairly good. Keep up your sleep pattern and healthy activities.",
            Tier::Fair => {
                "Your sleep quality is still lacking. Cut back on caffeine and add some light exercise."
            }
            Tier::Poor => {
                "Your sleep quality is very low. Try resetting your sleep schedule and avoid heavy stress."
            }
        }
    }

    /// Display color (hex) for rendering surfaces
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Excellent => "#27AE60",
            Tier::Good => "#2980B9",
            Tier::Fair => "#F39C12",
            Tier::Poor => "#E74C3C",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
