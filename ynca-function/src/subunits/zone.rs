//! Zone subunits (`MAIN`, `ZONE2`, `ZONE3`, `ZONE4`)
//!
//! All zones share one function table. Functions a particular zone does not
//! support are answered with `@UNDEFINED` during initialization and simply
//! stay uncached.

use crate::converter::{Converter, EnumConverter, FloatConverter, MappedConverter, MultiConverter, StrConverter};
use crate::enums::{
    InitVolLvlState, InitVolMode, Input, Mute, Pwr, Scene, Sleep, SoundPrg, Straight, TwoChDecoder,
    VolumeDown, VolumeUp,
};
use crate::function::{Function, FunctionDescriptor, FunctionSpec, SubunitSchema};

/// Initial volume level: a level in dB or one of the named states
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitVolLvl {
    Level(f64),
    State(InitVolLvlState),
}

fn lvl_from_level(value: f64) -> InitVolLvl {
    InitVolLvl::Level(value)
}

fn lvl_to_level(value: &InitVolLvl) -> Option<f64> {
    match value {
        InitVolLvl::Level(level) => Some(*level),
        InitVolLvl::State(_) => None,
    }
}

fn lvl_from_state(value: InitVolLvlState) -> InitVolLvl {
    InitVolLvl::State(value)
}

fn lvl_to_state(value: &InitVolLvl) -> Option<InitVolLvlState> {
    match value {
        InitVolLvl::State(state) => Some(*state),
        InitVolLvl::Level(_) => None,
    }
}

static INITVOLLVL_LEVEL: MappedConverter<FloatConverter, InitVolLvl> = MappedConverter::new(
    FloatConverter::with_step(0.5, 1).ranged(-80.0, 16.0),
    lvl_from_level,
    lvl_to_level,
);
static INITVOLLVL_STATE: MappedConverter<EnumConverter<InitVolLvlState>, InitVolLvl> =
    MappedConverter::new(EnumConverter::new(), lvl_from_state, lvl_to_state);
// Numeric first so that a level is never taken for a state token
static INITVOLLVL_CHAIN: [&dyn Converter<Value = InitVolLvl>; 2] =
    [&INITVOLLVL_LEVEL, &INITVOLLVL_STATE];

pub static PWR: Function<EnumConverter<Pwr>> =
    Function::new(FunctionDescriptor::get_put("PWR"), EnumConverter::new());
pub static INP: Function<EnumConverter<Input>> =
    Function::new(FunctionDescriptor::get_put("INP"), EnumConverter::new());
pub static VOL: Function<FloatConverter> = Function::new(
    FunctionDescriptor::get_put("VOL"),
    FloatConverter::with_step(0.5, 1).ranged(-80.5, 16.5),
);
pub static VOLUP: Function<EnumConverter<VolumeUp>> =
    Function::new(FunctionDescriptor::put("VOL").attribute("volup"), EnumConverter::new());
pub static VOLDOWN: Function<EnumConverter<VolumeDown>> =
    Function::new(FunctionDescriptor::put("VOL").attribute("voldown"), EnumConverter::new());
pub static MUTE: Function<EnumConverter<Mute>> =
    Function::new(FunctionDescriptor::get_put("MUTE"), EnumConverter::new());
pub static SLEEP: Function<EnumConverter<Sleep>> =
    Function::new(FunctionDescriptor::get_put("SLEEP"), EnumConverter::new());
pub static ZONENAME: Function<StrConverter> =
    Function::new(FunctionDescriptor::get_put("ZONENAME"), StrConverter::bounded(0, 9));
pub static SOUNDPRG: Function<EnumConverter<SoundPrg>> =
    Function::new(FunctionDescriptor::get_put("SOUNDPRG"), EnumConverter::new());
pub static STRAIGHT: Function<EnumConverter<Straight>> =
    Function::new(FunctionDescriptor::get_put("STRAIGHT"), EnumConverter::new());
pub static ENHANCER: Function<EnumConverter<Straight>> =
    Function::new(FunctionDescriptor::get_put("ENHANCER"), EnumConverter::new());
pub static TWOCHDECODER: Function<EnumConverter<TwoChDecoder>> = Function::new(
    FunctionDescriptor::get_put("2CHDECODER").attribute("twochdecoder"),
    EnumConverter::new(),
);
pub static INITVOLMODE: Function<EnumConverter<InitVolMode>> =
    Function::new(FunctionDescriptor::get_put("INITVOLMODE"), EnumConverter::new());
pub static INITVOLLVL: Function<MultiConverter<InitVolLvl>> = Function::new(
    FunctionDescriptor::get_put("INITVOLLVL"),
    MultiConverter::new(&INITVOLLVL_CHAIN),
);
pub static MAXVOL: Function<FloatConverter> = Function::new(
    FunctionDescriptor::get_put("MAXVOL"),
    FloatConverter::with_step(0.5, 1).ranged(-30.0, 16.5),
);
pub static SPBASS: Function<FloatConverter> = Function::new(
    FunctionDescriptor::get_put("SPBASS"),
    FloatConverter::with_step(0.5, 1).ranged(-6.0, 6.0),
);
pub static SPTREBLE: Function<FloatConverter> = Function::new(
    FunctionDescriptor::get_put("SPTREBLE"),
    FloatConverter::with_step(0.5, 1).ranged(-6.0, 6.0),
);
pub static SCENE: Function<EnumConverter<Scene>> =
    Function::new(FunctionDescriptor::put("SCENE"), EnumConverter::new());

static ZONE_FUNCTIONS: [&dyn FunctionSpec; 18] = [
    &PWR,
    &INP,
    &VOL,
    &VOLUP,
    &VOLDOWN,
    &MUTE,
    &SLEEP,
    &ZONENAME,
    &SOUNDPRG,
    &STRAIGHT,
    &ENHANCER,
    &TWOCHDECODER,
    &INITVOLMODE,
    &INITVOLLVL,
    &MAXVOL,
    &SPBASS,
    &SPTREBLE,
    &SCENE,
];

pub static MAIN: SubunitSchema = SubunitSchema::new("MAIN", &ZONE_FUNCTIONS);
pub static ZONE2: SubunitSchema = SubunitSchema::new("ZONE2", &ZONE_FUNCTIONS);
pub static ZONE3: SubunitSchema = SubunitSchema::new("ZONE3", &ZONE_FUNCTIONS);
pub static ZONE4: SubunitSchema = SubunitSchema::new("ZONE4", &ZONE_FUNCTIONS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initvollvl_reads_level_or_state() {
        let converter = INITVOLLVL.converter();
        assert_eq!(converter.to_value("-20.0").unwrap(), InitVolLvl::Level(-20.0));
        assert_eq!(
            converter.to_value("Mute").unwrap(),
            InitVolLvl::State(InitVolLvlState::Mute)
        );
        assert_eq!(converter.to_str(&InitVolLvl::Level(-20.0)).unwrap(), "-20.0");
        assert_eq!(
            converter.to_str(&InitVolLvl::State(InitVolLvlState::Off)).unwrap(),
            "Off"
        );
        assert!(converter.to_value("Loud").is_err());
    }

    #[test]
    fn test_twochdecoder_alias() {
        assert_eq!(MAIN.find("twochdecoder").unwrap().descriptor().name(), "2CHDECODER");
        assert_eq!(MAIN.find("2CHDECODER").unwrap().descriptor().attribute_name(), "twochdecoder");
    }

    #[test]
    fn test_volume_steps_are_put_only_aliases() {
        let volup = MAIN.find("volup").unwrap().descriptor();
        assert_eq!(volup.name(), "VOL");
        assert!(!volup.cmd().can_get());
        // Plain lookup by protocol name finds the readable volume first
        assert!(MAIN.find("VOL").unwrap().descriptor().cmd().can_get());
    }

    #[test]
    fn test_zone_initializers_skip_put_only() {
        let initializers = ZONE2.initializers();
        assert!(initializers.contains(&"VOL"));
        assert!(initializers.contains(&"2CHDECODER"));
        assert!(!initializers.contains(&"SCENE"));
        assert_eq!(initializers.iter().filter(|n| **n == "VOL").count(), 1);
    }
}
