//! Function descriptors and subunit schemas
//!
//! A [`FunctionDescriptor`] names a protocol function and records how it may
//! be used. A [`Function`] binds a descriptor to a converter so the typed
//! value of the function is known at compile time. [`SubunitSchema`] groups
//! the functions of one subunit kind into a static table that the subunit
//! engine dispatches through.

use crate::converter::Converter;
use std::fmt;
use ynca_core::YncaResult;

/// Permitted command directions of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cmd {
    /// Read only
    Get,
    /// Write only
    Put,
    /// Read and write
    GetPut,
}

impl Cmd {
    /// Check if GET is allowed
    pub const fn can_get(&self) -> bool {
        matches!(self, Cmd::Get | Cmd::GetPut)
    }

    /// Check if PUT is allowed
    pub const fn can_put(&self) -> bool {
        matches!(self, Cmd::Put | Cmd::GetPut)
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::Get => write!(f, "GET"),
            Cmd::Put => write!(f, "PUT"),
            Cmd::GetPut => write!(f, "GET/PUT"),
        }
    }
}

/// Static description of one protocol function
///
/// Built with `const` methods so descriptors can be declared in statics:
///
/// ```
/// use ynca_function::FunctionDescriptor;
///
/// const ARTIST: FunctionDescriptor = FunctionDescriptor::get("ARTIST").init("METAINFO");
/// assert_eq!(ARTIST.initializer(), "METAINFO");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDescriptor {
    name: &'static str,
    cmd: Cmd,
    initializer: Option<&'static str>,
    no_initialize: bool,
    attribute: Option<&'static str>,
}

impl FunctionDescriptor {
    const fn with_cmd(name: &'static str, cmd: Cmd) -> Self {
        Self {
            name,
            cmd,
            initializer: None,
            // Nothing can be read back from a write-only function
            no_initialize: !cmd.can_get(),
            attribute: None,
        }
    }

    /// Read-only function
    pub const fn get(name: &'static str) -> Self {
        Self::with_cmd(name, Cmd::Get)
    }

    /// Write-only function; never initialized
    pub const fn put(name: &'static str) -> Self {
        Self::with_cmd(name, Cmd::Put)
    }

    /// Read-write function
    pub const fn get_put(name: &'static str) -> Self {
        Self::with_cmd(name, Cmd::GetPut)
    }

    /// Initialize through another function name
    ///
    /// Several descriptors may share one initializer; it is requested once.
    pub const fn init(self, initializer: &'static str) -> Self {
        Self {
            initializer: Some(initializer),
            ..self
        }
    }

    /// Exclude this function from subunit initialization
    pub const fn no_initialize(self) -> Self {
        Self {
            no_initialize: true,
            ..self
        }
    }

    /// Give the function an identifier alias, for names such as `2CHDECODER`
    /// that are not valid identifiers
    pub const fn attribute(self, alias: &'static str) -> Self {
        Self {
            attribute: Some(alias),
            ..self
        }
    }

    /// Protocol function name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn cmd(&self) -> Cmd {
        self.cmd
    }

    /// Function name requested during initialization
    pub const fn initializer(&self) -> &'static str {
        match self.initializer {
            Some(initializer) => initializer,
            None => self.name,
        }
    }

    /// Whether this function takes part in subunit initialization
    pub const fn initializes(&self) -> bool {
        !self.no_initialize
    }

    /// Identifier of the function: the alias if set, else the lowercase name
    pub fn attribute_name(&self) -> String {
        match self.attribute {
            Some(alias) => alias.to_string(),
            None => self.name.to_lowercase(),
        }
    }

    /// Whether `key` refers to this function, by protocol name or identifier
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.attribute_name() == key
    }
}

/// Function descriptor bound to a converter
pub struct Function<C> {
    descriptor: FunctionDescriptor,
    converter: C,
}

impl<C: Converter> Function<C> {
    pub const fn new(descriptor: FunctionDescriptor, converter: C) -> Self {
        Self {
            descriptor,
            converter,
        }
    }

    pub const fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub const fn name(&self) -> &'static str {
        self.descriptor.name
    }
}

impl<C> fmt::Debug for Function<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Type-erased view of a [`Function`], as stored in a schema
pub trait FunctionSpec: Send + Sync {
    fn descriptor(&self) -> &FunctionDescriptor;

    /// Check that a wire value converts with this function's converter
    fn validate(&self, raw: &str) -> YncaResult<()>;
}

impl<C: Converter> FunctionSpec for Function<C> {
    fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    fn validate(&self, raw: &str) -> YncaResult<()> {
        self.converter.to_value(raw).map(|_| ())
    }
}

/// The functions of one subunit kind
pub struct SubunitSchema {
    name: &'static str,
    functions: &'static [&'static dyn FunctionSpec],
}

impl SubunitSchema {
    pub const fn new(name: &'static str, functions: &'static [&'static dyn FunctionSpec]) -> Self {
        Self { name, functions }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn functions(&self) -> &'static [&'static dyn FunctionSpec] {
        self.functions
    }

    /// Look up a function by protocol name or identifier alias
    pub fn find(&self, key: &str) -> Option<&'static dyn FunctionSpec> {
        self.functions
            .iter()
            .copied()
            .find(|f| f.descriptor().matches(key))
    }

    /// Distinct initializer names, in declaration order
    pub fn initializers(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for function in self.functions {
            let descriptor = function.descriptor();
            if descriptor.initializes() && !names.contains(&descriptor.initializer()) {
                names.push(descriptor.initializer());
            }
        }
        names
    }
}

impl fmt::Debug for SubunitSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubunitSchema")
            .field("name", &self.name)
            .field(
                "functions",
                &self.functions.iter().map(|s| s.descriptor().name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
