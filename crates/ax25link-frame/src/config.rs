use serde::{Deserialize, Serialize};

use crate::address::{Address, Station};
use crate::bits::{DEFAULT_MAX_ONES_RUN, STUFF_RUN};
use crate::error::{FrameError, Result};
use crate::frame::{MAX_CTRL_LEN, MAX_INFO_LEN, MIN_CTRL_LEN};

/// Default ground station callsign.
pub const DEFAULT_GROUND_CALLSIGN: &str = "ABCD";

/// Default satellite callsign.
pub const DEFAULT_SATELLITE_CALLSIGN: &str = "PARSAT";

/// Station identity and framing limits for one link.
///
/// Frames built by the codec travel satellite to ground: the ground station
/// is the destination, the satellite the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Ground station identity.
    pub ground: Station,
    /// Satellite identity.
    pub satellite: Station,
    /// Maximum info field length. Must not exceed 240.
    pub max_info_len: usize,
    /// Control field width in bytes (1 or 2).
    pub control_len: usize,
    /// Run of data ones at which encoding gives up on a frame.
    pub max_ones_run: usize,
}

impl LinkConfig {
    /// Check every field against protocol limits.
    pub fn validate(&self) -> Result<()> {
        self.ground.validate()?;
        self.satellite.validate()?;
        if self.max_info_len > MAX_INFO_LEN {
            return Err(FrameError::InvalidLength {
                field: "max info",
                len: self.max_info_len,
                max: MAX_INFO_LEN,
            });
        }
        if self.control_len != MIN_CTRL_LEN && self.control_len != MAX_CTRL_LEN {
            return Err(FrameError::InvalidLength {
                field: "control",
                len: self.control_len,
                max: MAX_CTRL_LEN,
            });
        }
        if self.max_ones_run <= STUFF_RUN {
            return Err(FrameError::Config(format!(
                "max_ones_run must exceed the stuffing run of {STUFF_RUN} (got {})",
                self.max_ones_run
            )));
        }
        Ok(())
    }

    /// Address used for outgoing frames.
    pub fn downlink_address(&self) -> Address {
        Address::new(self.ground.clone(), self.satellite.clone())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ground: Station {
                callsign: DEFAULT_GROUND_CALLSIGN.to_string(),
                ssid: 0,
            },
            satellite: Station {
                callsign: DEFAULT_SATELLITE_CALLSIGN.to_string(),
                ssid: 0,
            },
            max_info_len: MAX_INFO_LEN,
            control_len: MIN_CTRL_LEN,
            max_ones_run: DEFAULT_MAX_ONES_RUN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = LinkConfig::default();
        config.validate().unwrap();
        assert_eq!(config.downlink_address().to_string(), "PARSAT-0>ABCD-0");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: LinkConfig =
            serde_json::from_str(r#"{"ground":{"callsign":"W1AW","ssid":3}}"#).unwrap();
        assert_eq!(config.ground.callsign, "W1AW");
        assert_eq!(config.satellite.callsign, "PARSAT");
        assert_eq!(config.max_info_len, 240);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let too_big = LinkConfig {
            max_info_len: 241,
            ..LinkConfig::default()
        };
        assert!(matches!(
            too_big.validate(),
            Err(FrameError::InvalidLength {
                field: "max info",
                ..
            })
        ));

        let bad_ctrl = LinkConfig {
            control_len: 3,
            ..LinkConfig::default()
        };
        assert!(bad_ctrl.validate().is_err());

        let bad_run = LinkConfig {
            max_ones_run: 5,
            ..LinkConfig::default()
        };
        assert!(matches!(bad_run.validate(), Err(FrameError::Config(_))));

        let bad_station = LinkConfig {
            satellite: Station {
                callsign: "SATELLITE".to_string(),
                ssid: 0,
            },
            ..LinkConfig::default()
        };
        assert!(bad_station.validate().is_err());
    }
}
