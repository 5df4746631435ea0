//! Static schemas for every subunit kind and the registry that maps a
//! subunit id to its schema

pub mod dab;
pub mod media;
pub mod sys;
pub mod tun;
pub mod zone;

use crate::function::SubunitSchema;
use ynca_core::SubunitId;

/// Look up the function table for a subunit
pub fn schema_for(id: SubunitId) -> &'static SubunitSchema {
    match id {
        SubunitId::Sys => &sys::SYS,
        SubunitId::Main => &zone::MAIN,
        SubunitId::Zone2 => &zone::ZONE2,
        SubunitId::Zone3 => &zone::ZONE3,
        SubunitId::Zone4 => &zone::ZONE4,
        SubunitId::Tun => &tun::TUN,
        SubunitId::Dab => &dab::DAB,
        SubunitId::NetRadio => &media::NETRADIO,
        SubunitId::Usb => &media::USB,
        SubunitId::Server => &media::SERVER,
        SubunitId::Pc => &media::PC,
        SubunitId::AirPlay => &media::AIRPLAY,
        SubunitId::Spotify => &media::SPOTIFY,
        SubunitId::Bt => &media::BT,
        SubunitId::Ipod => &media::IPOD,
        SubunitId::IpodUsb => &media::IPODUSB,
        SubunitId::Pandora => &media::PANDORA,
        SubunitId::Napster => &media::NAPSTER,
        SubunitId::Rhap => &media::RHAP,
        SubunitId::Sirius => &media::SIRIUS,
        SubunitId::SiriusIr => &media::SIRIUSIR,
        SubunitId::SiriusXm => &media::SIRIUSXM,
        SubunitId::Uaw => &media::UAW,
        SubunitId::Deezer => &media::DEEZER,
        SubunitId::Tidal => &media::TIDAL,
    }
}
