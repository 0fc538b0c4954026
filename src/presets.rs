//! The five lighthouses of the Wadden islands
//!
//! | Light | Notation |
//! |---|---|
//! | Texel | `Fl(2) W 10s` |
//! | Vlieland | `Iso W 4s` |
//! | Terschelling | `Fl W 5s` |
//! | Ameland | `Fl(3) W 15s` |
//! | Schiermonnikoog | `Fl(4) W 20s` |

use embassy_time::Duration;

use crate::characteristic::{Characteristic, PhaseGroup};

pub const TEXEL: PhaseGroup = PhaseGroup::flash(2, Duration::from_secs(10));
pub const VLIELAND: PhaseGroup = PhaseGroup::isophase(Duration::from_secs(4));
pub const TERSCHELLING: PhaseGroup = PhaseGroup::flash(1, Duration::from_secs(5));
pub const AMELAND: PhaseGroup = PhaseGroup::flash(3, Duration::from_secs(15));
pub const SCHIERMONNIKOOG: PhaseGroup = PhaseGroup::flash(4, Duration::from_secs(20));

/// Number of lights in [`wadden`].
pub const WADDEN_LIGHTS: usize = 5;

pub fn texel() -> Characteristic {
    Characteristic::single("Texel", TEXEL)
}

pub fn vlieland() -> Characteristic {
    Characteristic::single("Vlieland", VLIELAND)
}

pub fn terschelling() -> Characteristic {
    Characteristic::single("Terschelling", TERSCHELLING)
}

pub fn ameland() -> Characteristic {
    Characteristic::single("Ameland", AMELAND)
}

pub fn schiermonnikoog() -> Characteristic {
    Characteristic::single("Schiermonnikoog", SCHIERMONNIKOOG)
}

/// All five lights, west to east.
pub fn wadden() -> [Characteristic; WADDEN_LIGHTS] {
    [
        texel(),
        vlieland(),
        terschelling(),
        ameland(),
        schiermonnikoog(),
    ]
}
