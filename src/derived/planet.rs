use crate::model::galaxy::{PLANET_CLASS_HABITAT, PLANET_DESIGNATION_CAPITAL};
use crate::model::{GameState, Planet, Starbase};

impl Planet {
    pub fn is_habitat(&self) -> bool {
        self.class == PLANET_CLASS_HABITAT
    }

    pub fn is_capital(&self) -> bool {
        self.designation == PLANET_DESIGNATION_CAPITAL
    }

    pub fn is_colonized(&self) -> bool {
        self.employable_pops > 0
    }

    /// Starbase garrisoned by the planet's orbital defence fleet
    pub fn orbital_starbase<'a>(&self, state: &'a GameState) -> Option<&'a Starbase> {
        self.orbital_fleet
            .and_then(|id| state.fleet(id))
            .and_then(|fleet| fleet.starbase)
            .and_then(|id| state.starbase(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::link;
    use crate::model::PlanetId;
    use save_parser::decode_str;

    #[test]
    fn test_orbital_starbase() {
        let mut state: GameState = decode_str(
            r#"
            planets={ planet={ 1={ planet_class=pc_habitat orbital_defence=5 employable_pops=3 } 2={ } } }
            fleet={ 5={ station=yes ships={ 50 } } }
            ships={ 50={ fleet=5 } }
            starbase_mgr={ starbases={ 8={ level=starbase_level_starport station=50 } } }
            "#,
        )
        .unwrap();
        link(&mut state);

        let habitat = state.planet(PlanetId(1)).unwrap();
        assert!(habitat.is_habitat());
        assert!(habitat.is_colonized());
        assert_eq!(
            habitat.orbital_starbase(&state).map(|s| s.level.as_str()),
            Some("starbase_level_starport")
        );

        let barren = state.planet(PlanetId(2)).unwrap();
        assert!(!barren.is_habitat());
        assert!(barren.orbital_starbase(&state).is_none());
    }
}
