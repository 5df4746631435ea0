//! Named value sets used by YNCA functions
//!
//! Each enum maps its variants one-to-one onto the exact tokens the receiver
//! sends and accepts. The lists below are the common subset; receivers that
//! report other tokens surface them as conversion errors on `get`.

/// Enum whose variants have a fixed wire token
pub trait WireEnum: Copy + Send + Sync + 'static {
    /// All variants, in declaration order
    const ALL: &'static [Self];

    /// Wire token of this variant
    fn as_wire(&self) -> &'static str;

    /// Look up the variant for a wire token
    fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_wire() == s)
    }
}

/// Declare an enum together with its wire tokens
///
/// ```
/// ynca_function::ynca_enum! {
///     pub enum Band {
///         Am => "AM",
///         Fm => "FM",
///     }
/// }
/// ```
#[macro_export]
macro_rules! ynca_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::enums::WireEnum for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_wire(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::enums::WireEnum::as_wire(self))
            }
        }
    };
}

ynca_enum! {
    pub enum Pwr {
        On => "On",
        Standby => "Standby",
    }
}

ynca_enum! {
    pub enum OnOff {
        On => "On",
        Off => "Off",
    }
}

pub type Straight = OnOff;
pub type Shuffle = OnOff;
pub type InitVolMode = OnOff;

ynca_enum! {
    pub enum Avail {
        Ready => "Ready",
        /// Present but not selected as input anywhere
        NotReady => "Not Ready",
    }
}

ynca_enum! {
    pub enum Mute {
        On => "On",
        Off => "Off",
        AttMinus20 => "Att -20 dB",
        AttMinus40 => "Att -40 dB",
    }
}

ynca_enum! {
    pub enum Sleep {
        Off => "Off",
        Min30 => "30 min",
        Min60 => "60 min",
        Min90 => "90 min",
        Min120 => "120 min",
    }
}

ynca_enum! {
    /// Relative volume change upwards, written to `VOL`
    pub enum VolumeUp {
        Step => "Up",
        Db1 => "Up 1 dB",
        Db2 => "Up 2 dB",
        Db5 => "Up 5 dB",
    }
}

ynca_enum! {
    pub enum VolumeDown {
        Step => "Down",
        Db1 => "Down 1 dB",
        Db2 => "Down 2 dB",
        Db5 => "Down 5 dB",
    }
}

ynca_enum! {
    pub enum Input {
        Hdmi1 => "HDMI1",
        Hdmi2 => "HDMI2",
        Hdmi3 => "HDMI3",
        Hdmi4 => "HDMI4",
        Hdmi5 => "HDMI5",
        Av1 => "AV1",
        Av2 => "AV2",
        Av3 => "AV3",
        Audio1 => "AUDIO1",
        Audio2 => "AUDIO2",
        Phono => "PHONO",
        Tuner => "TUNER",
        NetRadio => "NET RADIO",
        Usb => "USB",
        Server => "SERVER",
        Pc => "PC",
        AirPlay => "AirPlay",
        Spotify => "Spotify",
        Bluetooth => "Bluetooth",
        Ipod => "iPod",
        IpodUsb => "iPod (USB)",
        Deezer => "Deezer",
        Tidal => "TIDAL",
        MainZoneSync => "Main Zone Sync",
    }
}

ynca_enum! {
    pub enum SoundPrg {
        HallInMunich => "Hall in Munich",
        HallInVienna => "Hall in Vienna",
        Chamber => "Chamber",
        CellarClub => "Cellar Club",
        TheRoxyTheatre => "The Roxy Theatre",
        TheBottomLine => "The Bottom Line",
        Sports => "Sports",
        ActionGame => "Action Game",
        RoleplayingGame => "Roleplaying Game",
        MusicVideo => "Music Video",
        Standard => "Standard",
        Spectacle => "Spectacle",
        SciFi => "Sci-Fi",
        Adventure => "Adventure",
        Drama => "Drama",
        MonoMovie => "Mono Movie",
        TwoChStereo => "2ch Stereo",
        SevenChStereo => "7ch Stereo",
        AllChStereo => "All-Ch Stereo",
        SurroundDecoder => "Surround Decoder",
    }
}

ynca_enum! {
    pub enum TwoChDecoder {
        DolbyPl => "Dolby PL",
        DolbyPl2Movie => "Dolby PLII Movie",
        DolbyPl2Music => "Dolby PLII Music",
        DolbyPl2Game => "Dolby PLII Game",
        DolbyPl2xMovie => "Dolby PLIIx Movie",
        DolbyPl2xMusic => "Dolby PLIIx Music",
        DolbySurround => "Dolby Surround",
        DtsNeo6Cinema => "DTS NEO:6 Cinema",
        DtsNeo6Music => "DTS NEO:6 Music",
        DtsNeuralX => "DTS Neural:X",
        Auro3d => "AURO-3D",
    }
}

ynca_enum! {
    /// Non-numeric states of the initial volume level
    pub enum InitVolLvlState {
        Mute => "Mute",
        Off => "Off",
    }
}

ynca_enum! {
    pub enum Scene {
        Scene1 => "Scene 1",
        Scene2 => "Scene 2",
        Scene3 => "Scene 3",
        Scene4 => "Scene 4",
    }
}

ynca_enum! {
    pub enum Band {
        Am => "AM",
        Fm => "FM",
    }
}

ynca_enum! {
    pub enum BandDab {
        Dab => "DAB",
        Fm => "FM",
    }
}

ynca_enum! {
    pub enum Playback {
        Play => "Play",
        Pause => "Pause",
        Stop => "Stop",
        SkipFwd => "Skip Fwd",
        SkipRev => "Skip Rev",
    }
}

ynca_enum! {
    pub enum PlaybackInfo {
        Play => "Play",
        Pause => "Pause",
        Stop => "Stop",
    }
}

ynca_enum! {
    pub enum Repeat {
        Off => "Off",
        Single => "One",
        All => "All",
    }
}
