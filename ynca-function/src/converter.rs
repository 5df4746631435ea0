//! Converters between wire strings and typed values
//!
//! Converters are stateless and `const`-constructible so that function
//! descriptors can live in statics. For every representable value `v`,
//! `to_value(to_str(v)) == v`. The opposite direction may normalize
//! (`"-30.50"` reads as `-30.5` and writes back as `"-30.5"`).

use crate::enums::WireEnum;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;
use ynca_core::{YncaError, YncaResult};

/// Bidirectional transform between a wire string and a typed value
///
/// A converter that cannot handle its input must return
/// `YncaError::Conversion`; it never substitutes a default.
pub trait Converter: Send + Sync {
    type Value;

    /// Convert a wire string into a value
    fn to_value(&self, raw: &str) -> YncaResult<Self::Value>;

    /// Convert a value into its wire string
    fn to_str(&self, value: &Self::Value) -> YncaResult<String>;
}

fn conversion_error(what: &str, raw: impl fmt::Display) -> YncaError {
    YncaError::Conversion(format!("Cannot convert {:?} {}", raw.to_string(), what))
}

/// Converter for [`WireEnum`] value sets
pub struct EnumConverter<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: WireEnum> EnumConverter<E> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: WireEnum> Default for EnumConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: WireEnum> Converter for EnumConverter<E> {
    type Value = E;

    fn to_value(&self, raw: &str) -> YncaResult<E> {
        E::from_wire(raw).ok_or_else(|| {
            conversion_error(&format!("to {}", std::any::type_name::<E>()), raw)
        })
    }

    fn to_str(&self, value: &E) -> YncaResult<String> {
        Ok(value.as_wire().to_string())
    }
}

/// Integer converter with optional inclusive bounds
#[derive(Debug, Clone, Copy)]
pub struct IntConverter {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntConverter {
    pub const fn new() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn ranged(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn check(&self, value: i64) -> YncaResult<i64> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if below || above {
            return Err(conversion_error("to an integer within range", value));
        }
        Ok(value)
    }
}

impl Default for IntConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for IntConverter {
    type Value = i64;

    fn to_value(&self, raw: &str) -> YncaResult<i64> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| conversion_error("to an integer", raw))?;
        self.check(value)
    }

    fn to_str(&self, value: &i64) -> YncaResult<String> {
        Ok(self.check(*value)?.to_string())
    }
}

/// Floating point converter
///
/// With a step size, written values are snapped to the nearest multiple of
/// the step and formatted with a fixed number of decimals (`VOL` uses a
/// 0.5 step and one decimal, `FMFREQ` a 0.05 step and two decimals).
#[derive(Debug, Clone, Copy)]
pub struct FloatConverter {
    step: Option<f64>,
    decimals: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl FloatConverter {
    pub const fn new() -> Self {
        Self {
            step: None,
            decimals: 0,
            min: None,
            max: None,
        }
    }

    pub const fn with_step(step: f64, decimals: usize) -> Self {
        Self {
            step: Some(step),
            decimals,
            min: None,
            max: None,
        }
    }

    pub const fn ranged(self, min: f64, max: f64) -> Self {
        Self {
            step: self.step,
            decimals: self.decimals,
            min: Some(min),
            max: Some(max),
        }
    }

    fn check(&self, value: f64) -> YncaResult<f64> {
        if !value.is_finite() {
            return Err(conversion_error("to a finite number", value));
        }
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if below || above {
            return Err(conversion_error("to a number within range", value));
        }
        Ok(value)
    }
}

impl Default for FloatConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for FloatConverter {
    type Value = f64;

    fn to_value(&self, raw: &str) -> YncaResult<f64> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| conversion_error("to a number", raw))?;
        self.check(value)
    }

    fn to_str(&self, value: &f64) -> YncaResult<String> {
        let value = self.check(*value)?;
        match self.step {
            Some(step) => {
                let snapped = (value / step).round() * step;
                Ok(format!("{:.*}", self.decimals, snapped))
            }
            None => Ok(value.to_string()),
        }
    }
}

/// Text converter with inclusive character length bounds
#[derive(Debug, Clone, Copy)]
pub struct StrConverter {
    min_len: usize,
    max_len: Option<usize>,
}

impl StrConverter {
    pub const fn new() -> Self {
        Self {
            min_len: 0,
            max_len: None,
        }
    }

    pub const fn bounded(min_len: usize, max_len: usize) -> Self {
        Self {
            min_len,
            max_len: Some(max_len),
        }
    }

    fn check(&self, value: &str) -> YncaResult<String> {
        let len = value.chars().count();
        if len < self.min_len || self.max_len.is_some_and(|max| len > max) {
            return Err(conversion_error("to a string of permitted length", value));
        }
        Ok(value.to_string())
    }
}

impl Default for StrConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for StrConverter {
    type Value = String;

    fn to_value(&self, raw: &str) -> YncaResult<String> {
        self.check(raw)
    }

    fn to_str(&self, value: &String) -> YncaResult<String> {
        self.check(value)
    }
}

/// Converter for play times such as `"3:07"` or `"1:02:03"`
///
/// Whole seconds only. Durations under an hour are written as `M:SS`,
/// longer ones as `H:MM:SS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationConverter;

impl DurationConverter {
    pub const fn new() -> Self {
        Self
    }
}

impl Converter for DurationConverter {
    type Value = Duration;

    fn to_value(&self, raw: &str) -> YncaResult<Duration> {
        let parts = raw
            .trim()
            .split(':')
            .map(|p| p.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| conversion_error("to a duration", raw))?;

        let (hours, minutes, seconds) = match parts.as_slice() {
            [m, s] => (0, *m, *s),
            [h, m, s] if *m < 60 => (*h, *m, *s),
            _ => return Err(conversion_error("to a duration", raw)),
        };
        if seconds >= 60 {
            return Err(conversion_error("to a duration", raw));
        }

        Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
    }

    fn to_str(&self, value: &Duration) -> YncaResult<String> {
        if value.subsec_nanos() != 0 {
            return Err(conversion_error("to whole seconds", format!("{:?}", value)));
        }
        let total = value.as_secs();
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            Ok(format!("{}:{:02}:{:02}", hours, minutes, seconds))
        } else {
            Ok(format!("{}:{:02}", minutes, seconds))
        }
    }
}

/// Lifts a converter into a wider value type
///
/// `into` wraps a converted value, `from` extracts it again and returns
/// `None` when the wider value is not one this converter produces. Used to
/// give the members of a [`MultiConverter`] a common value type.
pub struct MappedConverter<C: Converter, V> {
    inner: C,
    into: fn(C::Value) -> V,
    from: fn(&V) -> Option<C::Value>,
}

impl<C: Converter, V> MappedConverter<C, V> {
    pub const fn new(inner: C, into: fn(C::Value) -> V, from: fn(&V) -> Option<C::Value>) -> Self {
        Self { inner, into, from }
    }
}

impl<C: Converter, V> Converter for MappedConverter<C, V> {
    type Value = V;

    fn to_value(&self, raw: &str) -> YncaResult<V> {
        self.inner.to_value(raw).map(self.into)
    }

    fn to_str(&self, value: &V) -> YncaResult<String> {
        match (self.from)(value) {
            Some(inner) => self.inner.to_str(&inner),
            None => Err(YncaError::Conversion(
                "Value not handled by this converter".to_string(),
            )),
        }
    }
}

/// Fallback chain of converters
///
/// Both directions try the members in order and return the first success.
/// Order matters where a token could satisfy several members: put the
/// numeric converter first when a number might also match an enum token.
pub struct MultiConverter<V: 'static> {
    converters: &'static [&'static (dyn Converter<Value = V> + 'static)],
}

impl<V: 'static> MultiConverter<V> {
    pub const fn new(converters: &'static [&'static (dyn Converter<Value = V> + 'static)]) -> Self {
        Self { converters }
    }
}

impl<V: fmt::Debug + 'static> Converter for MultiConverter<V> {
    type Value = V;

    fn to_value(&self, raw: &str) -> YncaResult<V> {
        self.converters
            .iter()
            .find_map(|c| c.to_value(raw).ok())
            .ok_or_else(|| conversion_error("with any converter in the chain", raw))
    }

    fn to_str(&self, value: &V) -> YncaResult<String> {
        self.converters
            .iter()
            .find_map(|c| c.to_str(value).ok())
            .ok_or_else(|| {
                conversion_error("with any converter in the chain", format!("{:?}", value))
            })
    }
}
