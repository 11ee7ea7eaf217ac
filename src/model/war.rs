use save_parser::{Decode, Record};

use crate::model::ids::*;
use crate::model::state::Date;

pub const BATTLE_TYPE_SHIPS: &str = "ships";
pub const BATTLE_TYPE_ARMIES: &str = "armies";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct War {
    pub start_date: Date,

    pub defenders: Vec<WarCountry>,
    pub attackers: Vec<WarCountry>,

    pub battles: Vec<Battle>,
}

impl Record for War {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "start_date" => &mut self.start_date,
            "defenders" => &mut self.defenders,
            "attackers" => &mut self.attackers,
            "battles" => &mut self.battles,
            _ => return None,
        };
        Some(field)
    }
}

impl War {
    /// Allies and enemies of a participant, in that order
    pub fn sides(&self, is_attacker: bool) -> (&[WarCountry], &[WarCountry]) {
        if is_attacker {
            (&self.attackers, &self.defenders)
        } else {
            (&self.defenders, &self.attackers)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarCountry {
    pub country_id: CountryId,
}

impl Record for WarCountry {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "country" => Some(&mut self.country_id),
            _ => None,
        }
    }

    fn reset_references(&mut self) {
        self.country_id = CountryId::NONE;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Battle {
    pub defender_ids: Vec<CountryId>,
    pub attacker_ids: Vec<CountryId>,

    pub attacker_victory: bool,
    pub date: Date,
    pub kind: String,

    pub star_id: StarId,

    pub attacker_losses: i32,
    pub defender_losses: i32,
}

impl Record for Battle {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "defenders" => &mut self.defender_ids,
            "attackers" => &mut self.attacker_ids,
            "attacker_victory" => &mut self.attacker_victory,
            "date" => &mut self.date,
            "type" => &mut self.kind,
            "system" => &mut self.star_id,
            "attacker_losses" => &mut self.attacker_losses,
            "defender_losses" => &mut self.defender_losses,
            _ => return None,
        };
        Some(field)
    }

    fn reset_references(&mut self) {
        self.star_id = StarId::NONE;
    }
}

impl Battle {
    pub fn is_ship_battle(&self) -> bool {
        self.kind == BATTLE_TYPE_SHIPS
    }
}

/// A country's participation in a war
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarRef {
    pub war_id: WarId,
    pub is_attacker: bool,
}

/// A ship battle fought at a star
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRef {
    pub war_id: WarId,
    pub battle_index: usize,
}
