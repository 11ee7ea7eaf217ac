//! Stellaris save reader
//!
//! Decodes the `gamestate` entry of a `.sav` archive into a typed galaxy
//! model, links the ID references between entities and exposes the derived
//! properties a map renderer needs.

pub mod error;
pub mod model;
pub mod names;
pub mod colors;
pub mod geometry;
pub mod link;
pub mod derived;
pub mod load;

pub use save_parser as parser;

pub use error::{LoadError, Result};
pub use model::{
    GameState, Date, Arena,
    Star, Planet, Megastructure, Bypass, Wormhole, Hyperlane, Coordinate,
    Country, Sector, Starbase, Fleet, Ship, Pop, War, Battle,
    StarId, PlanetId, CountryId, SectorId, StarbaseId, MegastructureId,
    FleetId, ShipId, WarId, BypassId, WormholeId, PopId, SpeciesId,
};
pub use link::{link, EntityKind, LinkReport, LinkWarning};
pub use load::{load_async, load_gamestate, load_save, open, LoadOptions, LoadedGame};
pub use names::NameTables;
pub use colors::{ColorTable, Rgb};
pub use geometry::{Locate, Point};
pub use derived::{compute_war_role, format_military_power, BypassKind, StarbaseRole, WarRole};
