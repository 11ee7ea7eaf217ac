use std::fmt;

use crate::model::{Country, CountryId, GameState, Star};

/// Stance of a country's fleets in a star system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarRole {
    Neutral,
    Defender,
    Attacker,
}

impl WarRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Defender => "defender",
            Self::Attacker => "attacker",
        }
    }
}

impl fmt::Display for WarRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of `country` relative to the owner of `star`.
///
/// Wars are checked in the order the country joined them; the first war in
/// which the star's owner is an enemy or an ally decides.
pub fn compute_war_role(
    country_id: CountryId,
    country: &Country,
    star: &Star,
    state: &GameState,
) -> WarRole {
    if country.wars.is_empty() {
        return WarRole::Neutral;
    }

    let star_owner = star.owner(state);
    if star_owner == country_id {
        return WarRole::Defender;
    }

    for war_ref in &country.wars {
        let Some(war) = state.war(war_ref.war_id) else {
            continue;
        };
        let (allies, enemies) = war.sides(war_ref.is_attacker);

        if enemies.iter().any(|c| c.country_id == star_owner) {
            return WarRole::Attacker;
        }
        if allies.iter().any(|c| c.country_id == star_owner) {
            return WarRole::Defender;
        }
    }

    // Fleets merely passing by
    WarRole::Neutral
}
