use crate::derived::BypassKind;
use crate::derived::megastructure::MEGASTRUCTURE_SIZE_PLANET;
use crate::model::country::SECTOR_CORE;
use crate::model::galaxy::*;
use crate::model::{CountryId, FleetId, GameState, Megastructure, Planet, Star, StarId, Starbase};

impl Star {
    pub fn primary_starbase<'a>(&self, state: &'a GameState) -> Option<&'a Starbase> {
        self.starbases.first().and_then(|id| state.starbase(*id))
    }

    /// Owning country: the sector's owner, else the primary starbase's own
    /// owner, else the owner of the starbase's station fleet.
    pub fn owner(&self, state: &GameState) -> CountryId {
        if let Some(sector) = self.sector.and_then(|id| state.sector(id)) {
            return sector.owner;
        }

        if let Some(starbase) = self.primary_starbase(state) {
            if starbase.owner.is_some() {
                return starbase.owner;
            }
            if let Some(fleet) = starbase.garrison(state) {
                return fleet.owner_id;
            }
        }
        CountryId::NONE
    }

    /// Country that has taken the starbase's station fleet from the owner
    pub fn occupier(&self, state: &GameState) -> CountryId {
        self.primary_starbase(state)
            .and_then(|starbase| starbase.garrison(state))
            .filter(|fleet| fleet.is_lost_control())
            .map_or(CountryId::NONE, |fleet| fleet.debtor_id)
    }

    pub fn is_owned_by(&self, state: &GameState, country: CountryId) -> bool {
        self.owner(state) == country
    }

    pub fn megastructures_iter<'a>(
        &'a self,
        state: &'a GameState,
    ) -> impl Iterator<Item = &'a Megastructure> + 'a {
        self.megastructures
            .iter()
            .filter_map(move |id| state.megastructure(*id))
    }

    pub fn planets_iter<'a>(&'a self, state: &'a GameState) -> impl Iterator<Item = &'a Planet> + 'a {
        self.planets.iter().filter_map(move |id| state.planet(*id))
    }

    /// Bypasses in discovery order: wormhole first, then one per megastructure.
    ///
    /// A hyper relay is left out when a neighbouring star with the same owner
    /// also has one, so that a relay chain shows once.
    pub fn bypasses(&self, state: &GameState) -> &[BypassKind] {
        self.bypasses.get_or_init(|| {
            let mut bypasses = Vec::new();
            if !self.wormhole_ids.is_empty() {
                bypasses.push(BypassKind::Wormhole);
            }

            for megastructure in self.megastructures_iter(state) {
                let (base_type, stage) = megastructure.type_stage();
                match base_type {
                    MEGASTRUCTURE_LGATE => bypasses.push(BypassKind::LGate),
                    MEGASTRUCTURE_GATEWAY if stage >= 0 => bypasses.push(BypassKind::Gateway),
                    MEGASTRUCTURE_GATEWAY => bypasses.push(BypassKind::GatewayRuined),
                    MEGASTRUCTURE_HYPER_RELAY => {
                        if !self.shares_hyper_relay(state) {
                            bypasses.push(BypassKind::HyperRelay);
                        }
                    }
                    MEGASTRUCTURE_QUANTUM_CATAPULT => bypasses.push(BypassKind::QuantumCatapult),
                    _ => {}
                }
            }
            bypasses
        })
    }

    fn shares_hyper_relay(&self, state: &GameState) -> bool {
        let owner = self.owner(state);
        self.neighbours(state)
            .any(|(_, neighbour)| neighbour.owner(state) == owner && neighbour.has_hyper_relay(state))
    }

    /// Stars at the far end of resolved hyperlanes
    pub fn neighbours<'a>(&'a self, state: &'a GameState) -> impl Iterator<Item = (StarId, &'a Star)> + 'a {
        self.hyperlanes
            .iter()
            .filter_map(|lane| lane.to)
            .filter_map(move |id| state.star(id).map(|star| (id, star)))
    }

    pub fn has_hyper_relay(&self, state: &GameState) -> bool {
        self.megastructures_iter(state)
            .any(|m| m.kind == MEGASTRUCTURE_HYPER_RELAY)
    }

    pub fn has_significant_megastructures(&self, state: &GameState) -> bool {
        self.megastructures_iter(state)
            .any(|m| m.size() >= MEGASTRUCTURE_SIZE_PLANET)
    }

    pub fn megastructures_by_size<'a>(&'a self, state: &'a GameState, size: i32) -> Vec<&'a Megastructure> {
        self.megastructures_iter(state)
            .filter(|m| m.size() == size)
            .collect()
    }

    /// Populated planets, either habitats or everything else
    pub fn colonies<'a>(&'a self, state: &'a GameState, habitats: bool) -> Vec<&'a Planet> {
        self.planets_iter(state)
            .filter(|p| p.is_colonized() && p.is_habitat() == habitats)
            .collect()
    }

    pub fn has_capital(&self, state: &GameState) -> bool {
        let in_core_sector = self
            .sector
            .and_then(|id| state.sector(id))
            .is_some_and(|sector| sector.kind == SECTOR_CORE);

        in_core_sector && self.planets_iter(state).any(Planet::is_capital)
    }

    pub fn has_hyperlane(&self, to: StarId) -> bool {
        self.hyperlanes.iter().any(|lane| lane.to == Some(to))
    }

    pub fn has_upgraded_starbase(&self, state: &GameState) -> bool {
        self.primary_starbase(state).is_some_and(Starbase::is_upgraded)
    }

    pub fn has_pops(&self, state: &GameState) -> bool {
        self.planets_iter(state).any(Planet::is_colonized)
    }

    /// Worth drawing with more than a dot
    pub fn is_significant(&self, state: &GameState) -> bool {
        self.has_pops(state)
            || self.has_upgraded_starbase(state)
            || self.has_significant_megastructures(state)
            || !self.bypasses(state).is_empty()
            || !self.mobile_military_fleets(state).is_empty()
    }

    /// Part of the L-cluster, except the two stars holding its gates
    pub fn is_distant(&self) -> bool {
        self.initializer.starts_with(DISTANT_STAR_INITIALIZER)
            && self.initializer != DISTANT_STAR_INITIALIZER_LGATE_0
            && self.initializer != DISTANT_STAR_INITIALIZER_LGATE_6
    }

    /// Military fleets present, strongest first
    pub fn mobile_military_fleets(&self, state: &GameState) -> &[FleetId] {
        self.military_fleets.get_or_init(|| {
            let mut fleets: Vec<(FleetId, f64)> = self
                .fleets
                .iter()
                .filter_map(|id| state.fleet(*id).map(|fleet| (*id, fleet)))
                .filter(|(_, fleet)| fleet.is_mobile_military(state))
                .map(|(id, fleet)| (id, fleet.military_power))
                .collect();
            fleets.sort_by(|a, b| b.1.total_cmp(&a.1));
            fleets.into_iter().map(|(id, _)| id).collect()
        })
    }
}
