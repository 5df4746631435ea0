//! DAB tuner subunit

use crate::converter::{EnumConverter, IntConverter, StrConverter};
use crate::enums::{Avail, BandDab};
use crate::function::{Function, FunctionDescriptor, FunctionSpec, SubunitSchema};

pub static AVAIL: Function<EnumConverter<Avail>> =
    Function::new(FunctionDescriptor::get("AVAIL"), EnumConverter::new());
pub static BAND: Function<EnumConverter<BandDab>> =
    Function::new(FunctionDescriptor::get_put("BAND"), EnumConverter::new());
pub static DABPRESET: Function<IntConverter> =
    Function::new(FunctionDescriptor::get_put("DABPRESET"), IntConverter::ranged(1, 40));

// Labels of the current service are reported together
pub static DABCHLABEL: Function<StrConverter> = Function::new(
    FunctionDescriptor::get("DABCHLABEL").init("DABSERVICE"),
    StrConverter::new(),
);
pub static DABSRVLABEL: Function<StrConverter> = Function::new(
    FunctionDescriptor::get("DABSRVLABEL").init("DABSERVICE"),
    StrConverter::new(),
);
pub static DABENSEMBLELABEL: Function<StrConverter> = Function::new(
    FunctionDescriptor::get("DABENSEMBLELABEL").init("DABSERVICE"),
    StrConverter::new(),
);

static DAB_FUNCTIONS: [&dyn FunctionSpec; 6] = [
    &AVAIL,
    &BAND,
    &DABPRESET,
    &DABCHLABEL,
    &DABSRVLABEL,
    &DABENSEMBLELABEL,
];

pub static DAB: SubunitSchema = SubunitSchema::new("DAB", &DAB_FUNCTIONS);
