use std::sync::OnceLock;

use save_parser::{Decode, Record};

use crate::derived::BypassKind;
use crate::model::ids::*;
use crate::model::war::BattleRef;
use crate::names::{Name, NameTables};

pub const DISTANT_STAR_INITIALIZER: &str = "distantstars_init";
pub const DISTANT_STAR_INITIALIZER_LGATE_0: &str = "distantstars_init_00";
pub const DISTANT_STAR_INITIALIZER_LGATE_6: &str = "distantstars_init_06";

pub const PLANET_CLASS_ECUMENOPOLIS: &str = "pc_city";
pub const PLANET_CLASS_HABITAT: &str = "pc_habitat";
pub const PLANET_CLASS_SHIELDED: &str = "pc_shielded";

pub const PLANET_DESIGNATION_CAPITAL: &str = "col_capital";

/// A star system (`galactic_object`)
#[derive(Debug, Clone, Default)]
pub struct Star {
    pub kind: String,
    pub name_string: String,
    pub name_struct: Name,
    pub initializer: String,

    pub coordinate: Coordinate,
    pub hyperlanes: Vec<Hyperlane>,

    pub sector_id: SectorId,
    pub sector: Option<SectorId>,

    /// Single starbase field of older saves
    pub starbase_id: StarbaseId,
    pub starbase_ids: Vec<StarbaseId>,
    pub starbases: Vec<StarbaseId>,

    pub planet_ids: Vec<PlanetId>,
    pub planets: Vec<PlanetId>,

    pub megastructure_ids: Vec<MegastructureId>,
    pub megastructures: Vec<MegastructureId>,

    pub wormhole_ids: Vec<WormholeId>,

    pub fleet_ids: Vec<FleetId>,
    pub fleets: Vec<FleetId>,

    pub battles: Vec<BattleRef>,

    pub(crate) bypasses: OnceLock<Vec<BypassKind>>,
    pub(crate) military_fleets: OnceLock<Vec<FleetId>>,
}

impl Record for Star {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "type" => &mut self.kind,
            "name" => &mut self.name_string,
            "initializer" => &mut self.initializer,
            "coordinate" => &mut self.coordinate,
            "hyperlane" => &mut self.hyperlanes,
            "sector" => &mut self.sector_id,
            "starbase" => &mut self.starbase_id,
            "starbases" => &mut self.starbase_ids,
            "planet" => &mut self.planet_ids,
            "megastructures" => &mut self.megastructure_ids,
            "natural_wormholes" => &mut self.wormhole_ids,
            "fleet_presence" => &mut self.fleet_ids,
            _ => return None,
        };
        Some(field)
    }

    fn overlay(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "name" => Some(&mut self.name_struct),
            _ => None,
        }
    }

    fn reset_references(&mut self) {
        self.sector_id = SectorId::NONE;
        self.starbase_id = StarbaseId::NONE;
    }
}

impl Star {
    pub fn name(&self, tables: &NameTables) -> String {
        if !self.name_string.is_empty() {
            return self.name_string.clone();
        }
        self.name_struct.resolve(tables).replace('_', " ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Record for Coordinate {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "x" => Some(&mut self.x),
            "y" => Some(&mut self.y),
            _ => None,
        }
    }
}

/// Outgoing hyperlane; `to` is set once the target star is known to exist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hyperlane {
    pub to_id: StarId,
    pub to: Option<StarId>,
}

impl Record for Hyperlane {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "to" => Some(&mut self.to_id),
            _ => None,
        }
    }

    fn reset_references(&mut self) {
        self.to_id = StarId::NONE;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wormhole {
    pub bypass: BypassId,
}

impl Record for Wormhole {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "bypass" => Some(&mut self.bypass),
            _ => None,
        }
    }

    fn reset_references(&mut self) {
        self.bypass = BypassId::NONE;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bypass {
    pub kind: String,
    pub linked_to: BypassId,
    pub owner: BypassOwner,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BypassOwner {
    pub kind: i32,
    pub id: u32,
}

impl Record for Bypass {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "type" => &mut self.kind,
            "linked_to" => &mut self.linked_to,
            "owner" => &mut self.owner,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.linked_to = BypassId::NONE;
    }
}

impl Record for BypassOwner {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "type" => &mut self.kind,
            "id" => &mut self.id,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Planet {
    pub star: Option<StarId>,

    pub name_string: String,
    pub name_struct: Name,
    pub class: String,
    pub designation: String,
    pub coordinate: Coordinate,

    pub moons: Vec<PlanetId>,
    pub moon_of: PlanetId,

    pub orbital_fleet_id: FleetId,
    pub orbital_fleet: Option<FleetId>,

    pub owner_id: CountryId,

    pub employable_pops: i32,
}

impl Record for Planet {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "name" => &mut self.name_string,
            "planet_class" => &mut self.class,
            "final_designation" => &mut self.designation,
            "coordinate" => &mut self.coordinate,
            "moons" => &mut self.moons,
            "moon_of" => &mut self.moon_of,
            "orbital_defence" => &mut self.orbital_fleet_id,
            "owner" => &mut self.owner_id,
            "employable_pops" => &mut self.employable_pops,
            _ => return None,
        };
        Some(field)
    }

    fn overlay(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "name" => Some(&mut self.name_struct),
            _ => None,
        }
    }

    fn reset_references(&mut self) {
        self.moon_of = PlanetId::NONE;
        self.orbital_fleet_id = FleetId::NONE;
        self.owner_id = CountryId::NONE;
    }
}

impl Planet {
    pub fn name(&self, tables: &NameTables) -> String {
        if !self.name_string.is_empty() {
            return self.name_string.clone();
        }
        self.name_struct.format(&tables.planet_names, tables)
    }
}

pub const MEGASTRUCTURE_RING_WORLD: &str = "ring_world";
pub const MEGASTRUCTURE_DYSON_SPHERE: &str = "dyson_sphere";
pub const MEGASTRUCTURE_MATTER_DECOMPRESSOR: &str = "matter_decompressor";

pub const MEGASTRUCTURE_SCIENCE_NEXUS: &str = "think_tank";
pub const MEGASTRUCTURE_SENTRY_ARRAY: &str = "spy_orb";
pub const MEGASTRUCTURE_ART_INSTALLATION: &str = "mega_art_installation";
pub const MEGASTRUCTURE_INTERSTELLAR_ASSEMBLY: &str = "interstellar_assembly";
pub const MEGASTRUCTURE_SHIPYARD: &str = "mega_shipyard";
pub const MEGASTRUCTURE_STRATEGIC_CENTER: &str = "strategic_coordination_center";

pub const MEGASTRUCTURE_GATEWAY: &str = "gateway";
pub const MEGASTRUCTURE_LGATE: &str = "lgate_base";
pub const MEGASTRUCTURE_HYPER_RELAY: &str = "hyper_relay";
pub const MEGASTRUCTURE_QUANTUM_CATAPULT: &str = "quantum_catapult";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Megastructure {
    pub kind: String,
    pub owner: i64,
    pub planet_id: PlanetId,

    pub star: Option<StarId>,
    pub planet: Option<PlanetId>,
}

impl Record for Megastructure {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "type" => &mut self.kind,
            "owner" => &mut self.owner,
            "planet" => &mut self.planet_id,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.planet_id = PlanetId::NONE;
    }
}
