use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use save_parser::{Decode, DecodeResult, Record, Token, TokenSource};
use serde::Serialize;

use crate::model::country::{Country, Fleet, Pop, Sector, Ship, Starbase};
use crate::model::galaxy::{Bypass, Megastructure, Planet, Star, Wormhole};
use crate::model::ids::*;
use crate::model::war::War;

/// Entity collection keyed by ID. `None` is an entry written as `id=none`.
pub type Arena<K, V> = IndexMap<K, Option<V>>;

/// Live entity by ID, flattening missing and `none` entries
pub fn lookup<K: Hash + Eq, V>(arena: &Arena<K, V>, id: K) -> Option<&V> {
    arena.get(&id).and_then(Option::as_ref)
}

pub fn lookup_mut<K: Hash + Eq, V>(arena: &mut Arena<K, V>, id: K) -> Option<&mut V> {
    arena.get_mut(&id).and_then(Option::as_mut)
}

/// In-game date, `YYYY.MM.DD`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Date(pub String);

impl Date {
    pub fn year(&self) -> Option<i32> {
        let (year, _) = self.0.split_once('.')?;
        year.parse().ok()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Decode for Date {
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        self.0.decode(token, tokens)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanetState {
    pub planets: Arena<PlanetId, Planet>,
}

impl Record for PlanetState {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "planet" => Some(&mut self.planets),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StarbaseMgr {
    pub starbases: Arena<StarbaseId, Starbase>,
}

impl Record for StarbaseMgr {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "starbases" => Some(&mut self.starbases),
            _ => None,
        }
    }
}

/// Root of the decoded save
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub name: String,
    pub date: Date,

    pub stars: Arena<StarId, Star>,
    pub planets: PlanetState,
    pub bypasses: Arena<BypassId, Bypass>,
    pub wormholes: Arena<WormholeId, Wormhole>,

    pub countries: Arena<CountryId, Country>,
    pub sectors: Arena<SectorId, Sector>,
    pub starbase_mgr: StarbaseMgr,
    pub megastructures: Arena<MegastructureId, Megastructure>,
    pub fleets: Arena<FleetId, Fleet>,
    pub ships: Arena<ShipId, Ship>,
    pub wars: Arena<WarId, War>,
    pub pops: Arena<PopId, Pop>,
}

impl Record for GameState {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "name" => &mut self.name,
            "date" => &mut self.date,
            "galactic_object" => &mut self.stars,
            "planets" => &mut self.planets,
            "bypasses" => &mut self.bypasses,
            "natural_wormholes" => &mut self.wormholes,
            "country" => &mut self.countries,
            "sectors" => &mut self.sectors,
            "starbase_mgr" => &mut self.starbase_mgr,
            "megastructures" => &mut self.megastructures,
            "fleet" => &mut self.fleets,
            "ships" => &mut self.ships,
            "war" => &mut self.wars,
            "pop" => &mut self.pops,
            _ => return None,
        };
        Some(field)
    }
}

impl GameState {
    pub fn star(&self, id: StarId) -> Option<&Star> {
        lookup(&self.stars, id)
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        lookup(&self.planets.planets, id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        lookup(&self.countries, id)
    }

    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        lookup(&self.sectors, id)
    }

    pub fn starbase(&self, id: StarbaseId) -> Option<&Starbase> {
        lookup(&self.starbase_mgr.starbases, id)
    }

    pub fn megastructure(&self, id: MegastructureId) -> Option<&Megastructure> {
        lookup(&self.megastructures, id)
    }

    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        lookup(&self.fleets, id)
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        lookup(&self.ships, id)
    }

    pub fn war(&self, id: WarId) -> Option<&War> {
        lookup(&self.wars, id)
    }

    pub fn bypass(&self, id: BypassId) -> Option<&Bypass> {
        lookup(&self.bypasses, id)
    }

    pub fn wormhole(&self, id: WormholeId) -> Option<&Wormhole> {
        lookup(&self.wormholes, id)
    }

    pub fn pop(&self, id: PopId) -> Option<&Pop> {
        lookup(&self.pops, id)
    }

    /// Live stars in save order
    pub fn iter_stars(&self) -> impl Iterator<Item = (StarId, &Star)> {
        self.stars
            .iter()
            .filter_map(|(id, star)| star.as_ref().map(|star| (*id, star)))
    }

    /// Live countries in save order
    pub fn iter_countries(&self) -> impl Iterator<Item = (CountryId, &Country)> {
        self.countries
            .iter()
            .filter_map(|(id, country)| country.as_ref().map(|country| (*id, country)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save_parser::decode_str;

    #[test]
    fn test_date_year() {
        assert_eq!(Date("2200.01.01".into()).year(), Some(2200));
        assert_eq!(Date("2431.12.30".into()).year(), Some(2431));
        assert_eq!(Date("".into()).year(), None);
        assert_eq!(Date("yesterday".into()).year(), None);
    }

    #[test]
    fn test_decode_collections() {
        let state: GameState = decode_str(
            r#"
            version="Circinus v3.4.5"
            name="United Nations of Earth"
            date="2250.03.01"
            galactic_object={ 0={ name="Sol" planet=1 } 1=none }
            planets={ planet={ 1={ name="Earth" owner=0 } } }
            country={ 0={ name="Earth" } }
            starbase_mgr={ starbases={ 3={ level=starbase_level_outpost } } }
            pop={ 9={ species=2 planet=1 category="worker" } }
            "#,
        )
        .unwrap();

        assert_eq!(state.name, "United Nations of Earth");
        assert_eq!(state.date.year(), Some(2250));
        assert_eq!(state.stars.len(), 2);
        assert!(state.star(StarId(0)).is_some());
        assert!(state.star(StarId(1)).is_none());
        assert_eq!(state.iter_stars().count(), 1);
        assert_eq!(state.planet(PlanetId(1)).map(|p| p.owner_id), Some(CountryId(0)));
        assert_eq!(state.starbase(StarbaseId(3)).map(|s| s.owner), Some(CountryId::NONE));
        assert_eq!(state.pop(PopId(9)).map(|p| p.category.as_str()), Some("worker"));
        assert_eq!(state.iter_countries().count(), 1);
    }
}
