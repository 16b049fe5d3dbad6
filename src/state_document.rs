//! Flat state document
//!
//! The retained state payload is a single JSON object with one string field
//! per logical channel or group, e.g. `{"porch":"ON","candle":"OFF"}`. Keys
//! and values are tokens, so no escaping is performed.

use core::fmt::Write;

use heapless::String;

use crate::payload::Token;

/// Error returned when the document does not fit into its buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError;

impl From<core::fmt::Error> for CapacityError {
    fn from(_: core::fmt::Error) -> Self {
        Self
    }
}

/// Builder for a flat key/value JSON object of capacity `N` bytes
#[derive(Debug, Clone, Default)]
pub struct StateDocument<const N: usize> {
    buffer: String<N>,
    fields: usize,
}

impl<const N: usize> StateDocument<N> {
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
            fields: 0,
        }
    }

    /// Append a string field.
    ///
    /// After an error the document is incomplete and should be dropped.
    pub fn field(&mut self, key: &str, value: &str) -> Result<&mut Self, CapacityError> {
        let separator = if self.fields == 0 { '{' } else { ',' };
        write!(self.buffer, "{separator}\"{key}\":\"{value}\"")?;
        self.fields += 1;
        Ok(self)
    }

    /// Append a token field
    pub fn token<T: Token>(&mut self, key: &str, value: T) -> Result<&mut Self, CapacityError> {
        self.field(key, value.as_str())
    }

    /// Close the object and return the payload
    pub fn finish(mut self) -> Result<String<N>, CapacityError> {
        if self.fields == 0 {
            self.buffer.push('{').map_err(|()| CapacityError)?;
        }
        self.buffer.push('}').map_err(|()| CapacityError)?;
        Ok(self.buffer)
    }
}
