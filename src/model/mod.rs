//! Galaxy entities as decoded from the gamestate.
//!
//! Every collection is an [`Arena`] keyed by a typed ID. Fields ending in
//! `_id`/`_ids` hold raw references as read from the save; the ID-typed
//! `Option`/`Vec` fields next to them are filled in by [`crate::link`] and only
//! ever hold IDs of entities that exist.

pub mod ids;
pub mod galaxy;
pub mod country;
pub mod war;
pub mod state;

pub use ids::{
    StarId, PlanetId, CountryId, SectorId, StarbaseId, MegastructureId,
    FleetId, ShipId, ArmyId, WarId, WormholeId, BypassId, PopId, SpeciesId,
};
pub use galaxy::{
    Star, Coordinate, Hyperlane, Wormhole, Bypass, BypassOwner, Planet, Megastructure,
};
pub use country::{
    Country, CountryFlag, FleetsManager, OwnedFleet, Sector, Starbase,
    Fleet, Ship, Pop, country_name,
};
pub use war::{War, WarCountry, Battle, WarRef, BattleRef};
pub use state::{Arena, Date, GameState, PlanetState, StarbaseMgr, lookup, lookup_mut};
