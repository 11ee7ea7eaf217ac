use crate::model::galaxy::*;
use crate::model::Megastructure;

pub const MEGASTRUCTURE_SIZE_RING_WORLD: i32 = 3;
pub const MEGASTRUCTURE_SIZE_STAR: i32 = 2;
pub const MEGASTRUCTURE_SIZE_PLANET: i32 = 1;

/// Stage number of a type suffix (`gateway_ruined`, `ring_world_2`)
pub fn megastructure_stage(suffix: &str) -> Option<i32> {
    match suffix {
        "ruined" => Some(-1),
        "0" => Some(0),
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        "5" => Some(5),
        "restored" => Some(10),
        "final" => Some(20),
        _ => None,
    }
}

/// Map icon size of a base type, 0 for types not drawn
pub fn megastructure_size(base_type: &str) -> i32 {
    match base_type {
        MEGASTRUCTURE_RING_WORLD => MEGASTRUCTURE_SIZE_RING_WORLD,

        MEGASTRUCTURE_DYSON_SPHERE | MEGASTRUCTURE_MATTER_DECOMPRESSOR => MEGASTRUCTURE_SIZE_STAR,

        MEGASTRUCTURE_SCIENCE_NEXUS
        | MEGASTRUCTURE_SENTRY_ARRAY
        | MEGASTRUCTURE_ART_INSTALLATION
        | MEGASTRUCTURE_INTERSTELLAR_ASSEMBLY
        | MEGASTRUCTURE_SHIPYARD
        | MEGASTRUCTURE_STRATEGIC_CENTER => MEGASTRUCTURE_SIZE_PLANET,

        _ => 0,
    }
}

impl Megastructure {
    /// Split the type into base type and stage.
    ///
    /// Only the part after the last underscore is considered; if it is not a
    /// known stage the whole type is the base type at stage 0.
    pub fn type_stage(&self) -> (&str, i32) {
        if let Some((base, suffix)) = self.kind.rsplit_once('_') {
            if let Some(stage) = megastructure_stage(suffix) {
                return (base, stage);
            }
        }
        (self.kind.as_str(), 0)
    }

    pub fn base_type(&self) -> &str {
        self.type_stage().0
    }

    pub fn size(&self) -> i32 {
        megastructure_size(self.base_type())
    }
}
