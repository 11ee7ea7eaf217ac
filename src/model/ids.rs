use std::fmt;

use save_parser::{Decode, DecodeResult, Token, TokenSource};
use serde::Serialize;

/// Typed entity identifiers.
///
/// `NONE` (`u32::MAX`) is the "no reference" sentinel and the default value,
/// so an absent key never reads as ID zero.
macro_rules! define_ids {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: Self = Self(u32::MAX);

            pub fn is_none(self) -> bool {
                self == Self::NONE
            }

            pub fn is_some(self) -> bool {
                !self.is_none()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NONE
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl Decode for $name {
            fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
                self.0.decode(token, tokens)
            }
        }
    )*};
}

define_ids!(
    /// `galactic_object` entry
    StarId,
    PlanetId,
    CountryId,
    SectorId,
    StarbaseId,
    MegastructureId,
    FleetId,
    ShipId,
    ArmyId,
    WarId,
    WormholeId,
    BypassId,
    PopId,
    SpeciesId,
);
