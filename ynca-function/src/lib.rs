//! Function descriptors and converters for the YNCA protocol
//!
//! A receiver exposes named functions per subunit (`PWR`, `VOL`, `INP`, ...).
//! This crate binds each function name to a converter between its wire
//! string and a typed value, records which directions (GET/PUT) are
//! permitted and how it is initialized, and groups the functions into one
//! static schema per subunit kind.

#[macro_use]
pub mod enums;
pub mod converter;
pub mod function;
pub mod subunits;

pub use converter::{
    Converter, DurationConverter, EnumConverter, FloatConverter, IntConverter,
    MappedConverter, MultiConverter, StrConverter,
};
pub use enums::WireEnum;
pub use function::{Cmd, Function, FunctionDescriptor, FunctionSpec, SubunitSchema};
pub use subunits::schema_for;
