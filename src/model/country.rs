use std::collections::BTreeMap;

use save_parser::{Decode, Record};

use crate::model::ids::*;
use crate::model::war::WarRef;
use crate::names::{Name, NameKey, NameTables};

pub const SECTOR_CORE: &str = "core_sector";
pub const SECTOR_NORMAL: &str = "normal_sector";

pub const FLEET_OWNERSHIP_NORMAL: &str = "normal";
pub const FLEET_OWNERSHIP_LOST_CONTROL: &str = "lost_control";

const DEFAULT_COUNTRY_NAME: &str = "_default";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    pub name_string: String,
    pub name_struct: Name,

    pub flag: CountryFlag,

    pub capital_id: PlanetId,
    pub capital: Option<PlanetId>,

    pub fleets_manager: FleetsManager,

    pub wars: Vec<WarRef>,
}

impl Record for Country {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "name" => &mut self.name_string,
            "flag" => &mut self.flag,
            "capital" => &mut self.capital_id,
            "fleets_manager" => &mut self.fleets_manager,
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
        self.capital_id = PlanetId::NONE;
    }
}

impl Country {
    pub fn name(&self, tables: &NameTables) -> String {
        if !self.name_string.is_empty() {
            return self.name_string.clone();
        }
        self.name_struct.format(&tables.country_formats, tables)
    }
}

/// Display name of a country that may be missing from the save
pub fn country_name(id: CountryId, country: Option<&Country>, tables: &NameTables) -> String {
    match country {
        Some(country) => country.name(tables),
        None if id.is_none() => DEFAULT_COUNTRY_NAME.to_string(),
        None => id.to_string(),
    }
}

/// Flag colour keys, fill first then border
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryFlag {
    pub colors: Vec<String>,
}

impl Record for CountryFlag {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "colors" => Some(&mut self.colors),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetsManager {
    pub owned_fleets: Vec<OwnedFleet>,
}

impl Record for FleetsManager {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "owned_fleets" => Some(&mut self.owned_fleets),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnedFleet {
    pub fleet_id: FleetId,
    pub fleet: Option<FleetId>,

    pub ownership_status: String,
    pub debtor_id: CountryId,
}

impl Record for OwnedFleet {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "fleet" => &mut self.fleet_id,
            "ownership_status" => &mut self.ownership_status,
            "debtor" => &mut self.debtor_id,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.fleet_id = FleetId::NONE;
        self.debtor_id = CountryId::NONE;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sector {
    pub name_string: String,
    pub name_struct: NameKey,

    pub kind: String,
    pub owner: CountryId,
}

impl Record for Sector {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "name" => &mut self.name_string,
            "type" => &mut self.kind,
            "owner" => &mut self.owner,
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
        self.owner = CountryId::NONE;
    }
}

impl Sector {
    pub fn name(&self) -> &str {
        if self.name_string.is_empty() {
            &self.name_struct.key
        } else {
            &self.name_string
        }
    }
}

pub const STARBASE_OUTPOST: &str = "starbase_level_outpost";
pub const STARBASE_STARPORT: &str = "starbase_level_starport";
pub const STARBASE_STARHOLD: &str = "starbase_level_starhold";
pub const STARBASE_FORTRESS: &str = "starbase_level_starfortress";
pub const STARBASE_CITADEL: &str = "starbase_level_citadel";
pub const STARBASE_MARAUDER: &str = "starbase_level_marauder";
pub const STARBASE_CARAVANEER: &str = "starbase_level_caravaneer";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Starbase {
    pub level: String,
    /// Slot index to module name
    pub modules: BTreeMap<i32, String>,
    /// Slot index to building name
    pub buildings: BTreeMap<i32, String>,
    pub owner: CountryId,

    pub station_id: ShipId,
    pub station: Option<ShipId>,

    pub star: Option<StarId>,
}

impl Record for Starbase {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "level" => &mut self.level,
            "modules" => &mut self.modules,
            "buildings" => &mut self.buildings,
            "owner" => &mut self.owner,
            "station" => &mut self.station_id,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.owner = CountryId::NONE;
        self.station_id = ShipId::NONE;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    pub name_string: String,
    pub name_struct: NameKey,

    pub station: bool,
    pub mobile: bool,
    pub civilian: bool,

    pub military_power: f64,

    pub owner_id: CountryId,
    pub owner: Option<CountryId>,
    /// Copied from the owning country's fleet record during linking
    pub ownership_status: String,
    pub debtor_id: CountryId,

    pub ship_ids: Vec<ShipId>,
    pub ships: Vec<ShipId>,

    /// Starbase this fleet is the station of
    pub starbase: Option<StarbaseId>,
}

impl Record for Fleet {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "name" => &mut self.name_string,
            "station" => &mut self.station,
            "mobile" => &mut self.mobile,
            "civilian" => &mut self.civilian,
            "military_power" => &mut self.military_power,
            "owner" => &mut self.owner_id,
            "ships" => &mut self.ship_ids,
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
        self.owner_id = CountryId::NONE;
        self.debtor_id = CountryId::NONE;
    }
}

impl Fleet {
    pub fn name(&self) -> &str {
        if self.name_string.is_empty() {
            &self.name_struct.key
        } else {
            &self.name_string
        }
    }

    pub fn is_lost_control(&self) -> bool {
        self.ownership_status == FLEET_OWNERSHIP_LOST_CONTROL
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ship {
    pub fleet_id: FleetId,
    pub fleet: Option<FleetId>,

    pub army_id: ArmyId,
}

impl Record for Ship {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "fleet" => &mut self.fleet_id,
            "army" => &mut self.army_id,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.fleet_id = FleetId::NONE;
        self.army_id = ArmyId::NONE;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pop {
    pub species_id: SpeciesId,
    pub planet_id: PlanetId,
    pub category: String,
}

impl Record for Pop {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "species" => &mut self.species_id,
            "planet" => &mut self.planet_id,
            "category" => &mut self.category,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.species_id = SpeciesId::NONE;
        self.planet_id = PlanetId::NONE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save_parser::decode_str;

    #[test]
    fn test_decode_country() {
        let country: Country = decode_str(
            r#"
            name={ key="%ADJECTIVE%" variables={ { key="adjective" value={ key="SPEC_Human" } } { key="1" value={ key="Commonwealth" } } } }
            flag={ icon={ category="human" file="flag_human_9.dds" } colors={ "dark_blue" "blue" "null" "null" } }
            fleets_manager={ owned_fleets={ { fleet=12 ownership_status=normal } { fleet=13 ownership_status=lost_control debtor=4 } } }
            "#,
        )
        .unwrap();

        assert_eq!(country.name_struct.variables.len(), 2);
        assert_eq!(country.flag.colors[..2], ["dark_blue", "blue"]);
        assert_eq!(country.capital_id, PlanetId::NONE);

        let owned = &country.fleets_manager.owned_fleets;
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].debtor_id, CountryId::NONE);
        assert_eq!(owned[1].fleet_id, FleetId(13));
        assert_eq!(owned[1].debtor_id, CountryId(4));
        assert_eq!(owned[1].ownership_status, FLEET_OWNERSHIP_LOST_CONTROL);
    }

    #[test]
    fn test_country_name_fallbacks() {
        let tables = NameTables::new();
        let literal = Country {
            name_string: "United Nations of Earth".into(),
            ..Default::default()
        };
        assert_eq!(country_name(CountryId(0), Some(&literal), &tables), "United Nations of Earth");
        assert_eq!(country_name(CountryId::NONE, None, &tables), "_default");
        assert_eq!(country_name(CountryId(17), None, &tables), "17");
    }

    #[test]
    fn test_decode_starbase() {
        let starbase: Starbase = decode_str(
            "level=\"starbase_level_starport\"\nmodules={\n0=shipyard 1=trading_hub\n}\nstation=88",
        )
        .unwrap();
        assert_eq!(starbase.level, STARBASE_STARPORT);
        assert_eq!(
            starbase.modules,
            BTreeMap::from([(0, "shipyard".to_string()), (1, "trading_hub".to_string())])
        );
        assert_eq!(starbase.owner, CountryId::NONE);
        assert_eq!(starbase.station_id, ShipId(88));
    }

    #[test]
    fn test_fleet_name_key() {
        let fleet: Fleet = decode_str(
            "name={ key=\"shipclass_starbase_name\" } station=yes mobile=no military_power=1234.5",
        )
        .unwrap();
        assert_eq!(fleet.name(), "shipclass_starbase_name");
        assert!(fleet.station);
        assert!(!fleet.mobile);
        assert_eq!(fleet.military_power, 1234.5);
        assert_eq!(fleet.debtor_id, CountryId::NONE);
    }

    #[test]
    fn test_ship_without_army() {
        let ship: Ship = decode_str("fleet=3 name={ key=\"x\" }").unwrap();
        assert_eq!(ship.fleet_id, FleetId(3));
        assert!(ship.army_id.is_none());
    }
}
