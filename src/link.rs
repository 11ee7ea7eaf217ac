//! Cross-reference linking.
//!
//! Runs after decoding and turns the raw `*_id` fields into live references
//! (IDs that are known to resolve) and back-references. Passes run in a fixed
//! order because later ones read what earlier ones set:
//!
//! 1. stars (sector, starbases, planets, megastructures, fleets, hyperlanes)
//! 2. planets (orbital fleet)
//! 3. countries (fleet ownership, capital)
//! 4. fleets (owner fallback, ships)
//! 5. ships (fleet)
//! 6. starbases (station ship, garrison fleet)
//! 7. wars (battles per star, wars per country)
//!
//! Nothing here fails. A reference that does not resolve leaves the live
//! field empty and is recorded in the [`LinkReport`].

use std::fmt;
use std::sync::OnceLock;

use ahash::AHashSet;
use tracing::{debug, warn};

use crate::model::{lookup, lookup_mut, BattleRef, GameState, StarId, WarRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Star,
    Planet,
    Country,
    Sector,
    Starbase,
    Megastructure,
    Fleet,
    Ship,
    War,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Planet => "planet",
            Self::Country => "country",
            Self::Sector => "sector",
            Self::Starbase => "starbase",
            Self::Megastructure => "megastructure",
            Self::Fleet => "fleet",
            Self::Ship => "ship",
            Self::War => "war",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal linking problem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkWarning {
    #[error("{target} #{id} referenced by {referrer} #{referrer_id} is not found")]
    Missing {
        referrer: EntityKind,
        referrer_id: u32,
        target: EntityKind,
        id: u32,
    },

    #[error("{kind} #{id} is nil")]
    Nil { kind: EntityKind, id: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub warnings: Vec<LinkWarning>,
}

impl LinkReport {
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings about references to `target`
    pub fn missing(&self, target: EntityKind) -> impl Iterator<Item = &LinkWarning> {
        self.warnings.iter().filter(move |w| {
            matches!(w, LinkWarning::Missing { target: t, .. } if *t == target)
        })
    }
}

/// Resolve every reference in `state`. Safe to call more than once.
pub fn link(state: &mut GameState) -> LinkReport {
    let mut linker = Linker::default();

    clear_links(state);
    linker.link_stars(state);
    linker.link_planets(state);
    linker.link_countries(state);
    linker.link_fleets(state);
    linker.link_ships(state);
    linker.link_starbase_stations(state);
    linker.link_wars(state);

    debug!(warnings = linker.report.len(), "linking finished");
    linker.report
}

fn clear_links(state: &mut GameState) {
    for star in state.stars.values_mut().flatten() {
        star.sector = None;
        star.starbases.clear();
        star.planets.clear();
        star.megastructures.clear();
        star.fleets.clear();
        star.battles.clear();
        for lane in &mut star.hyperlanes {
            lane.to = None;
        }
        star.bypasses = OnceLock::new();
        star.military_fleets = OnceLock::new();
    }
    for planet in state.planets.planets.values_mut().flatten() {
        planet.star = None;
        planet.orbital_fleet = None;
    }
    for country in state.countries.values_mut().flatten() {
        country.capital = None;
        country.wars.clear();
        for owned in &mut country.fleets_manager.owned_fleets {
            owned.fleet = None;
        }
    }
    for starbase in state.starbase_mgr.starbases.values_mut().flatten() {
        starbase.star = None;
        starbase.station = None;
    }
    for megastructure in state.megastructures.values_mut().flatten() {
        megastructure.star = None;
        megastructure.planet = None;
    }
    for fleet in state.fleets.values_mut().flatten() {
        fleet.owner = None;
        fleet.ships.clear();
        fleet.starbase = None;
    }
    for ship in state.ships.values_mut().flatten() {
        ship.fleet = None;
    }
}

#[derive(Default)]
struct Linker {
    report: LinkReport,
}

impl Linker {
    fn push(&mut self, warning: LinkWarning) {
        warn!("{}", warning);
        self.report.warnings.push(warning);
    }

    fn missing(&mut self, referrer: EntityKind, referrer_id: u32, target: EntityKind, id: u32) {
        self.push(LinkWarning::Missing {
            referrer,
            referrer_id,
            target,
            id,
        });
    }

    fn link_stars(&mut self, state: &mut GameState) {
        let live_stars: AHashSet<StarId> = state.iter_stars().map(|(id, _)| id).collect();

        let sectors = &state.sectors;
        let planets = &mut state.planets.planets;
        let starbases = &mut state.starbase_mgr.starbases;
        let megastructures = &mut state.megastructures;
        let fleets = &state.fleets;

        for (&star_id, star) in state.stars.iter_mut() {
            let Some(star) = star else { continue };

            if star.sector_id.is_some() {
                if lookup(sectors, star.sector_id).is_some() {
                    star.sector = Some(star.sector_id);
                } else {
                    self.missing(EntityKind::Star, star_id.0, EntityKind::Sector, star.sector_id.0);
                }
            }

            if star.starbase_ids.is_empty() {
                star.starbase_ids.push(star.starbase_id);
            }
            for &starbase_id in &star.starbase_ids {
                if starbase_id.is_none() {
                    continue;
                }
                match lookup_mut(starbases, starbase_id) {
                    Some(starbase) => {
                        starbase.star = Some(star_id);
                        star.starbases.push(starbase_id);
                    }
                    None => self.missing(EntityKind::Star, star_id.0, EntityKind::Starbase, starbase_id.0),
                }
            }

            for &planet_id in &star.planet_ids {
                match lookup_mut(planets, planet_id) {
                    Some(planet) => {
                        planet.star = Some(star_id);
                        star.planets.push(planet_id);
                    }
                    None => self.missing(EntityKind::Star, star_id.0, EntityKind::Planet, planet_id.0),
                }
            }

            for &megastructure_id in &star.megastructure_ids {
                let Some(megastructure) = lookup_mut(megastructures, megastructure_id) else {
                    self.missing(
                        EntityKind::Star,
                        star_id.0,
                        EntityKind::Megastructure,
                        megastructure_id.0,
                    );
                    continue;
                };

                megastructure.star = Some(star_id);
                if megastructure.planet_id.is_some() {
                    if lookup(planets, megastructure.planet_id).is_some() {
                        megastructure.planet = Some(megastructure.planet_id);
                    } else {
                        self.missing(
                            EntityKind::Megastructure,
                            megastructure_id.0,
                            EntityKind::Planet,
                            megastructure.planet_id.0,
                        );
                    }
                }
                star.megastructures.push(megastructure_id);
            }

            for &fleet_id in &star.fleet_ids {
                if lookup(fleets, fleet_id).is_some() {
                    star.fleets.push(fleet_id);
                } else {
                    self.missing(EntityKind::Star, star_id.0, EntityKind::Fleet, fleet_id.0);
                }
            }

            for lane in &mut star.hyperlanes {
                if live_stars.contains(&lane.to_id) {
                    lane.to = Some(lane.to_id);
                } else {
                    self.missing(EntityKind::Star, star_id.0, EntityKind::Star, lane.to_id.0);
                }
            }
        }
    }

    fn link_planets(&mut self, state: &mut GameState) {
        let fleets = &state.fleets;

        for (&planet_id, planet) in state.planets.planets.iter_mut() {
            let Some(planet) = planet else { continue };
            if planet.orbital_fleet_id.is_none() {
                continue;
            }

            if lookup(fleets, planet.orbital_fleet_id).is_some() {
                planet.orbital_fleet = Some(planet.orbital_fleet_id);
            } else {
                self.missing(
                    EntityKind::Planet,
                    planet_id.0,
                    EntityKind::Fleet,
                    planet.orbital_fleet_id.0,
                );
            }
        }
    }

    /// The country's fleet list is authoritative for ownership, not the fleet itself
    fn link_countries(&mut self, state: &mut GameState) {
        let fleets = &mut state.fleets;
        let planets = &state.planets.planets;

        for (&country_id, country) in state.countries.iter_mut() {
            let Some(country) = country else { continue };

            for owned in &mut country.fleets_manager.owned_fleets {
                if owned.fleet_id.is_none() {
                    continue;
                }
                match lookup_mut(fleets, owned.fleet_id) {
                    Some(fleet) => {
                        owned.fleet = Some(owned.fleet_id);
                        fleet.owner_id = country_id;
                        fleet.owner = Some(country_id);
                        fleet.ownership_status = owned.ownership_status.clone();
                        fleet.debtor_id = owned.debtor_id;
                    }
                    None => self.missing(
                        EntityKind::Country,
                        country_id.0,
                        EntityKind::Fleet,
                        owned.fleet_id.0,
                    ),
                }
            }

            if country.capital_id.is_some() {
                if lookup(planets, country.capital_id).is_some() {
                    country.capital = Some(country.capital_id);
                } else {
                    self.missing(
                        EntityKind::Country,
                        country_id.0,
                        EntityKind::Planet,
                        country.capital_id.0,
                    );
                }
            }
        }
    }

    fn link_fleets(&mut self, state: &mut GameState) {
        let countries = &state.countries;
        let ships = &state.ships;

        for (&fleet_id, fleet) in state.fleets.iter_mut() {
            let Some(fleet) = fleet else { continue };

            // Fleets not listed by any country keep their own owner field
            if fleet.owner.is_none() && fleet.owner_id.is_some() {
                if lookup(countries, fleet.owner_id).is_some() {
                    fleet.owner = Some(fleet.owner_id);
                } else {
                    self.missing(EntityKind::Fleet, fleet_id.0, EntityKind::Country, fleet.owner_id.0);
                }
            }

            for &ship_id in &fleet.ship_ids {
                if lookup(ships, ship_id).is_some() {
                    fleet.ships.push(ship_id);
                } else {
                    self.missing(EntityKind::Fleet, fleet_id.0, EntityKind::Ship, ship_id.0);
                }
            }
        }
    }

    fn link_ships(&mut self, state: &mut GameState) {
        let fleets = &state.fleets;

        for (&ship_id, ship) in state.ships.iter_mut() {
            let Some(ship) = ship else {
                self.push(LinkWarning::Nil {
                    kind: EntityKind::Ship,
                    id: ship_id.0,
                });
                continue;
            };
            if ship.fleet_id.is_none() {
                continue;
            }

            if lookup(fleets, ship.fleet_id).is_some() {
                ship.fleet = Some(ship.fleet_id);
            } else {
                self.missing(EntityKind::Ship, ship_id.0, EntityKind::Fleet, ship.fleet_id.0);
            }
        }
    }

    fn link_starbase_stations(&mut self, state: &mut GameState) {
        let ships = &state.ships;
        let fleets = &mut state.fleets;

        for (&starbase_id, starbase) in state.starbase_mgr.starbases.iter_mut() {
            let Some(starbase) = starbase else {
                self.push(LinkWarning::Nil {
                    kind: EntityKind::Starbase,
                    id: starbase_id.0,
                });
                continue;
            };
            if starbase.station_id.is_none() {
                continue;
            }

            let Some(station) = lookup(ships, starbase.station_id) else {
                self.missing(
                    EntityKind::Starbase,
                    starbase_id.0,
                    EntityKind::Ship,
                    starbase.station_id.0,
                );
                continue;
            };
            starbase.station = Some(starbase.station_id);

            if let Some(fleet_id) = station.fleet {
                if let Some(fleet) = lookup_mut(fleets, fleet_id) {
                    fleet.starbase = Some(starbase_id);
                }
            }
        }
    }

    fn link_wars(&mut self, state: &mut GameState) {
        let stars = &mut state.stars;
        let countries = &mut state.countries;

        for (&war_id, war) in state.wars.iter() {
            let Some(war) = war else { continue };

            for (battle_index, battle) in war.battles.iter().enumerate() {
                if !battle.is_ship_battle() || battle.star_id.is_none() {
                    continue;
                }
                match lookup_mut(stars, battle.star_id) {
                    Some(star) => star.battles.push(BattleRef {
                        war_id,
                        battle_index,
                    }),
                    None => self.missing(EntityKind::War, war_id.0, EntityKind::Star, battle.star_id.0),
                }
            }

            for (participants, is_attacker) in [(&war.attackers, true), (&war.defenders, false)] {
                for participant in participants {
                    match lookup_mut(countries, participant.country_id) {
                        Some(country) => country.wars.push(WarRef {
                            war_id,
                            is_attacker,
                        }),
                        None => self.missing(
                            EntityKind::War,
                            war_id.0,
                            EntityKind::Country,
                            participant.country_id.0,
                        ),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use save_parser::decode_str;

    const GALAXY: &str = r#"
galactic_object={
    0={
        name="Sol" sector=2 starbases={ 10 } planet=100 planet=101
        megastructures={ 40 }
        fleet_presence={ 30 31 }
        hyperlane={ { to=1 length=30 } { to=5 length=12 } }
    }
    1={ name="Alpha Centauri" starbase=11 hyperlane={ { to=0 length=30 } } }
}
planets={ planet={
    100={ name="Earth" owner=1 orbital_defence=32 }
    101={ name="Luna" moon_of=100 }
} }
country={
    1={
        name="Earth"
        capital=100
        fleets_manager={ owned_fleets={
            { fleet=30 ownership_status=normal }
            { fleet=31 ownership_status=lost_control debtor=7 }
            { fleet=33 }
        } }
    }
    7={ name="Blorg" }
}
sectors={ 2={ name="Core" type=core_sector owner=1 } }
starbase_mgr={ starbases={
    10={ level=starbase_level_starport station=20 }
    11={ level=starbase_level_outpost station=21 }
} }
megastructures={ 40={ type=hyper_relay planet=101 } }
fleet={
    30={ name={ key="Home Guard" } ships={ 22 } owner=3 }
    31={ name="Lost" ships={ 23 24 } }
    32={ name="Orbital" station=yes ships={ 20 } }
    34={ name="Outpost" station=yes ships={ 21 } owner=7 }
}
ships={ 20={ fleet=32 } 21={ fleet=34 } 22={ fleet=30 } 23={ fleet=31 army=1 } 25=none }
war={
    0={
        start_date="2240.01.01"
        attackers={ { country=7 } }
        defenders={ { country=1 } }
        battles={ { type=ships system=1 } { type=armies system=0 } { type=ships system=0 } }
    }
}
"#;

    fn galaxy() -> (GameState, LinkReport) {
        let mut state: GameState = decode_str(GALAXY).unwrap();
        let report = link(&mut state);
        (state, report)
    }

    #[test]
    fn test_link_star_references() {
        let (state, _) = galaxy();
        let sol = state.star(StarId(0)).unwrap();

        assert_eq!(sol.sector, Some(SectorId(2)));
        assert_eq!(sol.starbases, vec![StarbaseId(10)]);
        assert_eq!(sol.planets, vec![PlanetId(100), PlanetId(101)]);
        assert_eq!(sol.megastructures, vec![MegastructureId(40)]);
        assert_eq!(sol.fleets, vec![FleetId(30), FleetId(31)]);
        assert_eq!(
            sol.hyperlanes.iter().map(|h| h.to).collect::<Vec<_>>(),
            vec![Some(StarId(1)), None]
        );

        assert_eq!(state.starbase(StarbaseId(10)).unwrap().star, Some(StarId(0)));
        assert_eq!(state.planet(PlanetId(101)).unwrap().star, Some(StarId(0)));
        let relay = state.megastructure(MegastructureId(40)).unwrap();
        assert_eq!(relay.star, Some(StarId(0)));
        assert_eq!(relay.planet, Some(PlanetId(101)));
    }

    #[test]
    fn test_legacy_single_starbase() {
        let (state, _) = galaxy();
        let alpha = state.star(StarId(1)).unwrap();
        assert_eq!(alpha.starbase_ids, vec![StarbaseId(11)]);
        assert_eq!(alpha.starbases, vec![StarbaseId(11)]);
        assert_eq!(alpha.sector, None);
    }

    #[test]
    fn test_country_owns_fleets() {
        let (state, _) = galaxy();

        let home = state.fleet(FleetId(30)).unwrap();
        assert_eq!(home.owner_id, CountryId(1));
        assert_eq!(home.owner, Some(CountryId(1)));
        assert_eq!(home.ownership_status, "normal");

        let lost = state.fleet(FleetId(31)).unwrap();
        assert!(lost.is_lost_control());
        assert_eq!(lost.debtor_id, CountryId(7));

        let outpost = state.fleet(FleetId(34)).unwrap();
        assert_eq!(outpost.owner, Some(CountryId(7)));

        let earth = state.country(CountryId(1)).unwrap();
        assert_eq!(earth.capital, Some(PlanetId(100)));
        assert_eq!(earth.fleets_manager.owned_fleets[0].fleet, Some(FleetId(30)));
        assert_eq!(earth.fleets_manager.owned_fleets[2].fleet, None);
    }

    #[test]
    fn test_ships_and_stations() {
        let (state, _) = galaxy();

        assert_eq!(state.fleet(FleetId(31)).unwrap().ships, vec![ShipId(23)]);
        assert_eq!(state.ship(ShipId(22)).unwrap().fleet, Some(FleetId(30)));

        let starport = state.starbase(StarbaseId(10)).unwrap();
        assert_eq!(starport.station, Some(ShipId(20)));
        assert_eq!(state.fleet(FleetId(32)).unwrap().starbase, Some(StarbaseId(10)));
        assert_eq!(state.fleet(FleetId(34)).unwrap().starbase, Some(StarbaseId(11)));
        assert_eq!(
            state.planet(PlanetId(100)).unwrap().orbital_fleet,
            Some(FleetId(32))
        );
    }

    #[test]
    fn test_war_links() {
        let (state, _) = galaxy();

        let sol = state.star(StarId(0)).unwrap();
        assert_eq!(
            sol.battles,
            vec![BattleRef {
                war_id: WarId(0),
                battle_index: 2
            }]
        );
        assert_eq!(state.star(StarId(1)).unwrap().battles.len(), 1);

        let earth = state.country(CountryId(1)).unwrap();
        assert_eq!(
            earth.wars,
            vec![WarRef {
                war_id: WarId(0),
                is_attacker: false
            }]
        );
        assert!(state.country(CountryId(7)).unwrap().wars[0].is_attacker);
    }

    #[test]
    fn test_dangling_references_are_reported() {
        let (_, report) = galaxy();

        assert!(report.warnings.contains(&LinkWarning::Missing {
            referrer: EntityKind::Star,
            referrer_id: 0,
            target: EntityKind::Star,
            id: 5,
        }));
        assert!(report.warnings.contains(&LinkWarning::Missing {
            referrer: EntityKind::Country,
            referrer_id: 1,
            target: EntityKind::Fleet,
            id: 33,
        }));
        assert!(report.warnings.contains(&LinkWarning::Missing {
            referrer: EntityKind::Fleet,
            referrer_id: 31,
            target: EntityKind::Ship,
            id: 24,
        }));
        assert!(report.warnings.contains(&LinkWarning::Nil {
            kind: EntityKind::Ship,
            id: 25,
        }));
        assert_eq!(report.len(), 4);
    }

    #[test]
    fn test_missing_starbase_is_not_fatal() {
        let mut state: GameState =
            decode_str("galactic_object={ 3={ name=\"Deneb\" starbases={ 99 } } }").unwrap();
        let report = link(&mut state);

        let deneb = state.star(StarId(3)).unwrap();
        assert!(deneb.starbases.is_empty());
        assert_eq!(report.missing(EntityKind::Starbase).count(), 1);
        assert_eq!(
            report.warnings[0].to_string(),
            "starbase #99 referenced by star #3 is not found"
        );
    }

    #[test]
    fn test_link_is_idempotent() {
        let (mut state, first) = galaxy();
        let second = link(&mut state);

        assert_eq!(first, second);
        let sol = state.star(StarId(0)).unwrap();
        assert_eq!(sol.starbases, vec![StarbaseId(10)]);
        assert_eq!(sol.battles.len(), 1);
        assert_eq!(state.country(CountryId(1)).unwrap().wars.len(), 1);
        assert_eq!(state.fleet(FleetId(31)).unwrap().ships, vec![ShipId(23)]);
    }
}
