//! System subunit

use crate::converter::{EnumConverter, StrConverter};
use crate::enums::{OnOff, Pwr};
use crate::function::{Function, FunctionDescriptor, FunctionSpec, SubunitSchema};

pub static MODELNAME: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("MODELNAME"), StrConverter::new());
pub static VERSION: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("VERSION"), StrConverter::new());
pub static PWR: Function<EnumConverter<Pwr>> =
    Function::new(FunctionDescriptor::get_put("PWR"), EnumConverter::new());
pub static PARTY: Function<EnumConverter<OnOff>> =
    Function::new(FunctionDescriptor::get_put("PARTY"), EnumConverter::new());

/// Infrared remote code, eight hex digits
pub static REMOTECODE: Function<StrConverter> =
    Function::new(FunctionDescriptor::put("REMOTECODE"), StrConverter::bounded(8, 8));

// Input names are all reported by a single INPNAME query
pub static INPNAMEHDMI1: Function<StrConverter> = Function::new(
    FunctionDescriptor::get_put("INPNAMEHDMI1").init("INPNAME"),
    StrConverter::bounded(0, 9),
);
pub static INPNAMEHDMI2: Function<StrConverter> = Function::new(
    FunctionDescriptor::get_put("INPNAMEHDMI2").init("INPNAME"),
    StrConverter::bounded(0, 9),
);
pub static INPNAMEHDMI3: Function<StrConverter> = Function::new(
    FunctionDescriptor::get_put("INPNAMEHDMI3").init("INPNAME"),
    StrConverter::bounded(0, 9),
);
pub static INPNAMEHDMI4: Function<StrConverter> = Function::new(
    FunctionDescriptor::get_put("INPNAMEHDMI4").init("INPNAME"),
    StrConverter::bounded(0, 9),
);
pub static INPNAMEAV1: Function<StrConverter> = Function::new(
    FunctionDescriptor::get_put("INPNAMEAV1").init("INPNAME"),
    StrConverter::bounded(0, 9),
);
pub static INPNAMEAUDIO1: Function<StrConverter> = Function::new(
    FunctionDescriptor::get_put("INPNAMEAUDIO1").init("INPNAME"),
    StrConverter::bounded(0, 9),
);

static SYS_FUNCTIONS: [&dyn FunctionSpec; 11] = [
    &MODELNAME,
    &VERSION,
    &PWR,
    &PARTY,
    &REMOTECODE,
    &INPNAMEHDMI1,
    &INPNAMEHDMI2,
    &INPNAMEHDMI3,
    &INPNAMEHDMI4,
    &INPNAMEAV1,
    &INPNAMEAUDIO1,
];

pub static SYS: SubunitSchema = SubunitSchema::new("SYS", &SYS_FUNCTIONS);
