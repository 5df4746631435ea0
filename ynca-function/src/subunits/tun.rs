//! AM/FM tuner subunit

use crate::converter::{EnumConverter, FloatConverter, IntConverter, StrConverter};
use crate::enums::{Avail, Band};
use crate::function::{Function, FunctionDescriptor, FunctionSpec, SubunitSchema};

pub static AVAIL: Function<EnumConverter<Avail>> =
    Function::new(FunctionDescriptor::get("AVAIL"), EnumConverter::new());
pub static BAND: Function<EnumConverter<Band>> =
    Function::new(FunctionDescriptor::get_put("BAND"), EnumConverter::new());

/// AM frequency in kHz
pub static AMFREQ: Function<IntConverter> =
    Function::new(FunctionDescriptor::get_put("AMFREQ"), IntConverter::ranged(530, 1710));

/// FM frequency in MHz
pub static FMFREQ: Function<FloatConverter> = Function::new(
    FunctionDescriptor::get_put("FMFREQ"),
    FloatConverter::with_step(0.05, 2).ranged(87.5, 108.0),
);
pub static PRESET: Function<IntConverter> =
    Function::new(FunctionDescriptor::get_put("PRESET"), IntConverter::ranged(1, 40));

pub static RDSPRGTYPE: Function<StrConverter> = Function::new(
    FunctionDescriptor::get("RDSPRGTYPE").init("RDSINFO"),
    StrConverter::new(),
);
pub static RDSPRGSERVICE: Function<StrConverter> = Function::new(
    FunctionDescriptor::get("RDSPRGSERVICE").init("RDSINFO"),
    StrConverter::new(),
);
pub static RDSTXTA: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("RDSTXTA").init("RDSINFO"), StrConverter::new());
pub static RDSTXTB: Function<StrConverter> =
    Function::new(FunctionDescriptor::get("RDSTXTB").init("RDSINFO"), StrConverter::new());

static TUN_FUNCTIONS: [&dyn FunctionSpec; 9] = [
    &AVAIL,
    &BAND,
    &AMFREQ,
    &FMFREQ,
    &PRESET,
    &RDSPRGTYPE,
    &RDSPRGSERVICE,
    &RDSTXTA,
    &RDSTXTB,
];

pub static TUN: SubunitSchema = SubunitSchema::new("TUN", &TUN_FUNCTIONS);
