//! Properties computed on demand over a linked [`GameState`](crate::model::GameState).
//!
//! Most of these are inherent methods on the model types taking the state as
//! a lookup context. Per-star bypass and fleet lists are memoized; linking
//! again clears the memo.

mod fleet;
mod megastructure;
mod planet;
mod star;
mod starbase;
mod war;

use std::fmt;

pub use fleet::format_military_power;
pub use megastructure::{
    megastructure_size, megastructure_stage,
    MEGASTRUCTURE_SIZE_PLANET, MEGASTRUCTURE_SIZE_RING_WORLD, MEGASTRUCTURE_SIZE_STAR,
};
pub use starbase::StarbaseRole;
pub use war::{compute_war_role, WarRole};

/// Shortcut out of a star system other than its hyperlanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BypassKind {
    Wormhole,
    LGate,
    Gateway,
    GatewayRuined,
    HyperRelay,
    QuantumCatapult,
}

impl BypassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wormhole => "wormhole",
            Self::LGate => "lgate",
            Self::Gateway => "gateway",
            Self::GatewayRuined => "gateway-ruined",
            Self::HyperRelay => "relay",
            Self::QuantumCatapult => "catapult",
        }
    }
}

impl fmt::Display for BypassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
