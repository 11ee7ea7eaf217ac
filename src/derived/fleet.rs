use crate::model::{Fleet, GameState};

/// Fleet strength label: `4999`, `5.2K`, `150K`
pub fn format_military_power(power: f64) -> String {
    if power < 5000.0 {
        format!("{:.0}", power)
    } else if power <= 100_000.0 {
        format!("{:.1}K", power / 1000.0)
    } else {
        format!("{:.0}K", power / 1000.0)
    }
}

impl Fleet {
    /// True unless some ship carries no army. A fleet without ships counts as a transport.
    pub fn is_transport(&self, state: &GameState) -> bool {
        self.ships
            .iter()
            .filter_map(|id| state.ship(*id))
            .all(|ship| ship.army_id.is_some())
    }

    pub fn is_mobile_military(&self, state: &GameState) -> bool {
        !self.civilian && self.mobile && !self.is_transport(state)
    }

    pub fn military_power_string(&self) -> String {
        format_military_power(self.military_power)
    }
}
