use std::fmt;

use crate::model::country::STARBASE_OUTPOST;
use crate::model::{Fleet, GameState, Ship, Starbase};

pub const STARBASE_MODULE_SHIPYARD: &str = "shipyard";
pub const STARBASE_MODULE_TRADING_HUB: &str = "trading_hub";
pub const STARBASE_MODULE_ANCHORAGE: &str = "anchorage";
pub const STARBASE_MODULE_GUN_BATTERY: &str = "gun_battery";
pub const STARBASE_MODULE_MISSILE_BATTERY: &str = "missile_battery";
pub const STARBASE_MODULE_HANGAR_BAY: &str = "hangar_bay";

pub const STARBASE_BUILDING_FLEET_ACADEMY: &str = "fleet_academy";
pub const STARBASE_BUILDING_TITAN_YARDS: &str = "titan_yards";
pub const STARBASE_BUILDING_COLOSSUS_YARDS: &str = "colossus_yards";
pub const STARBASE_BUILDING_NAVAL_OFFICE: &str = "naval_logistics_office";
pub const STARBASE_BUILDING_TRADING_COMPANY: &str = "offworld_trading_company";
pub const STARBASE_BUILDING_CREW_QUARTERS: &str = "crew_quarters";
pub const STARBASE_BUILDING_TARGET_COMPUTER: &str = "target_uplink_computer";
pub const STARBASE_BUILDING_COMM_JAMMER: &str = "communications_jammer";
pub const STARBASE_BUILDING_DEFENCE_GRID: &str = "defense_grid";
pub const STARBASE_BUILDING_DISRUPTION_FIELD: &str = "disruption_field";
pub const STARBASE_BUILDING_WARP_FLUCTUATOR: &str = "warp_fluctuator";

/// Dominant specialisation of an upgraded starbase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StarbaseRole {
    Shipyard = 0,
    Bastion = 1,
    Anchorage = 2,
    TradingHub = 3,
}

impl StarbaseRole {
    const ALL: [StarbaseRole; 4] = [
        StarbaseRole::Shipyard,
        StarbaseRole::Bastion,
        StarbaseRole::Anchorage,
        StarbaseRole::TradingHub,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shipyard => "shipyard",
            Self::Bastion => "bastion",
            Self::Anchorage => "anchorage",
            Self::TradingHub => "trading-hub",
        }
    }

    fn of_module(module: &str) -> Option<(Self, u32)> {
        match module {
            STARBASE_MODULE_SHIPYARD => Some((Self::Shipyard, 2)),
            STARBASE_MODULE_ANCHORAGE => Some((Self::Anchorage, 1)),
            STARBASE_MODULE_TRADING_HUB => Some((Self::TradingHub, 2)),
            STARBASE_MODULE_GUN_BATTERY
            | STARBASE_MODULE_MISSILE_BATTERY
            | STARBASE_MODULE_HANGAR_BAY => Some((Self::Bastion, 1)),
            _ => None,
        }
    }

    fn of_building(building: &str) -> Option<(Self, u32)> {
        match building {
            STARBASE_BUILDING_FLEET_ACADEMY => Some((Self::Shipyard, 2)),
            STARBASE_BUILDING_TITAN_YARDS | STARBASE_BUILDING_COLOSSUS_YARDS => {
                Some((Self::Shipyard, 3))
            }
            STARBASE_BUILDING_NAVAL_OFFICE | STARBASE_BUILDING_CREW_QUARTERS => {
                Some((Self::Anchorage, 2))
            }
            STARBASE_BUILDING_TRADING_COMPANY => Some((Self::TradingHub, 3)),
            STARBASE_BUILDING_TARGET_COMPUTER
            | STARBASE_BUILDING_COMM_JAMMER
            | STARBASE_BUILDING_DISRUPTION_FIELD
            | STARBASE_BUILDING_DEFENCE_GRID
            | STARBASE_BUILDING_WARP_FLUCTUATOR => Some((Self::Bastion, 2)),
            _ => None,
        }
    }
}

impl fmt::Display for StarbaseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Starbase {
    /// Role with the most points from modules and buildings. Ties go to the
    /// earlier role; `None` when nothing scores.
    pub fn role(&self) -> Option<StarbaseRole> {
        let mut points = [0u32; 4];

        let modules = self.modules.values().filter_map(|m| StarbaseRole::of_module(m));
        let buildings = self.buildings.values().filter_map(|b| StarbaseRole::of_building(b));
        for (role, score) in modules.chain(buildings) {
            points[role as usize] += score;
        }

        let mut best = None;
        let mut best_points = 0;
        for role in StarbaseRole::ALL {
            if points[role as usize] > best_points {
                best = Some(role);
                best_points = points[role as usize];
            }
        }
        best
    }

    pub fn is_upgraded(&self) -> bool {
        self.level != STARBASE_OUTPOST
    }

    pub fn station_ship<'a>(&self, state: &'a GameState) -> Option<&'a Ship> {
        self.station.and_then(|id| state.ship(id))
    }

    /// Fleet of the station ship
    pub fn garrison<'a>(&self, state: &'a GameState) -> Option<&'a Fleet> {
        self.station_ship(state)
            .and_then(|ship| ship.fleet)
            .and_then(|id| state.fleet(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn starbase(modules: &[&str], buildings: &[&str]) -> Starbase {
        let slots = |names: &[&str]| -> BTreeMap<i32, String> {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| (i as i32, name.to_string()))
                .collect()
        };
        Starbase {
            level: "starbase_level_starhold".into(),
            modules: slots(modules),
            buildings: slots(buildings),
            ..Default::default()
        }
    }

    #[test]
    fn test_role_by_points() {
        assert_eq!(
            starbase(&["shipyard", "shipyard", "anchorage"], &[]).role(),
            Some(StarbaseRole::Shipyard)
        );
        assert_eq!(
            starbase(&["anchorage", "anchorage", "anchorage"], &["crew_quarters"]).role(),
            Some(StarbaseRole::Anchorage)
        );
        assert_eq!(
            starbase(&["gun_battery", "hangar_bay", "shipyard"], &["defense_grid"]).role(),
            Some(StarbaseRole::Bastion)
        );
        assert_eq!(
            starbase(&["trading_hub"], &["offworld_trading_company"]).role(),
            Some(StarbaseRole::TradingHub)
        );
    }

    #[test]
    fn test_role_ties_and_empty() {
        assert_eq!(
            starbase(&["shipyard", "trading_hub"], &[]).role(),
            Some(StarbaseRole::Shipyard)
        );
        assert_eq!(starbase(&[], &["hydroponics_bay"]).role(), None);
        assert_eq!(StarbaseRole::TradingHub.to_string(), "trading-hub");
    }

    #[test]
    fn test_is_upgraded() {
        let mut outpost = starbase(&[], &[]);
        assert!(outpost.is_upgraded());
        outpost.level = STARBASE_OUTPOST.into();
        assert!(!outpost.is_upgraded());
    }
}
