use crate::error::{YncaError, YncaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a logical functional unit of a receiver
///
/// Subunits are addressed independently on the wire (`@MAIN:...`,
/// `@TUN:...`). The set below covers the zones, the system subunit and the
/// input sources known to appear on receivers speaking YNCA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubunitId {
    Sys,
    Main,
    Zone2,
    Zone3,
    Zone4,
    Tun,
    Dab,
    NetRadio,
    Usb,
    Server,
    Pc,
    AirPlay,
    Spotify,
    Bt,
    Ipod,
    IpodUsb,
    Pandora,
    Napster,
    Rhap,
    Sirius,
    SiriusIr,
    SiriusXm,
    Uaw,
    Deezer,
    Tidal,
}

impl SubunitId {
    /// Every known subunit, in sweep order
    pub const ALL: [SubunitId; 25] = [
        SubunitId::Sys,
        SubunitId::Main,
        SubunitId::Zone2,
        SubunitId::Zone3,
        SubunitId::Zone4,
        SubunitId::Tun,
        SubunitId::Dab,
        SubunitId::NetRadio,
        SubunitId::Usb,
        SubunitId::Server,
        SubunitId::Pc,
        SubunitId::AirPlay,
        SubunitId::Spotify,
        SubunitId::Bt,
        SubunitId::Ipod,
        SubunitId::IpodUsb,
        SubunitId::Pandora,
        SubunitId::Napster,
        SubunitId::Rhap,
        SubunitId::Sirius,
        SubunitId::SiriusIr,
        SubunitId::SiriusXm,
        SubunitId::Uaw,
        SubunitId::Deezer,
        SubunitId::Tidal,
    ];

    /// Wire name as used between `@` and `:`
    pub fn as_str(&self) -> &'static str {
        match self {
            SubunitId::Sys => "SYS",
            SubunitId::Main => "MAIN",
            SubunitId::Zone2 => "ZONE2",
            SubunitId::Zone3 => "ZONE3",
            SubunitId::Zone4 => "ZONE4",
            SubunitId::Tun => "TUN",
            SubunitId::Dab => "DAB",
            SubunitId::NetRadio => "NETRADIO",
            SubunitId::Usb => "USB",
            SubunitId::Server => "SERVER",
            SubunitId::Pc => "PC",
            SubunitId::AirPlay => "AIRPLAY",
            SubunitId::Spotify => "SPOTIFY",
            SubunitId::Bt => "BT",
            SubunitId::Ipod => "IPOD",
            SubunitId::IpodUsb => "IPODUSB",
            SubunitId::Pandora => "PANDORA",
            SubunitId::Napster => "NAPSTER",
            SubunitId::Rhap => "RHAP",
            SubunitId::Sirius => "SIRIUS",
            SubunitId::SiriusIr => "SIRIUSIR",
            SubunitId::SiriusXm => "SIRIUSXM",
            SubunitId::Uaw => "UAW",
            SubunitId::Deezer => "DEEZER",
            SubunitId::Tidal => "TIDAL",
        }
    }

    /// Whether this subunit is one of the zones
    pub fn is_zone(&self) -> bool {
        matches!(
            self,
            SubunitId::Main | SubunitId::Zone2 | SubunitId::Zone3 | SubunitId::Zone4
        )
    }

    /// Parse a subunit identifier from its wire name
    ///
    /// # Returns
    ///
    /// Returns `Err(YncaError::Usage)` for names that are not known subunits
    pub fn from_string(s: &str) -> YncaResult<Self> {
        SubunitId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| YncaError::Usage(format!("Unknown subunit: {}", s)))
    }
}

impl FromStr for SubunitId {
    type Err = YncaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl fmt::Display for SubunitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subunit_id_from_string() {
        assert_eq!(SubunitId::from_string("MAIN").unwrap(), SubunitId::Main);
        assert_eq!("NETRADIO".parse::<SubunitId>().unwrap(), SubunitId::NetRadio);
        assert!(SubunitId::from_string("main").is_err());
        assert!(SubunitId::from_string("FOO").is_err());
    }

    #[test]
    fn test_subunit_id_display() {
        assert_eq!(format!("{}", SubunitId::Zone2), "ZONE2");
    }

    #[test]
    fn test_wire_names_are_unique() {
        for (i, a) in SubunitId::ALL.iter().enumerate() {
            for b in &SubunitId::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
            assert_eq!(SubunitId::from_string(a.as_str()).unwrap(), *a);
        }
    }

    #[test]
    fn test_is_zone() {
        assert!(SubunitId::Main.is_zone());
        assert!(SubunitId::Zone4.is_zone());
        assert!(!SubunitId::Sys.is_zone());
        assert!(!SubunitId::Tun.is_zone());
    }
}
