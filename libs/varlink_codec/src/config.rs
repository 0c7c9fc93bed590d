//! Allocation settings for an [`Encoder`](crate::Encoder).
//!
//! These only affect how much memory is reserved up front. The encoded bytes
//! are the same for every configuration.

const fn default_initial_capacity() -> usize {
    64
}

const fn default_offset_capacity() -> usize {
    4
}

/// Configures buffer pre-allocation for new encoders.
///
/// Can be embedded in a host application's config file:
///
/// ```toml
/// [codec]
/// initial_capacity = 4096
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct EncoderConfig {
    /// Bytes reserved for the message buffer.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Framing offsets reserved before the first string write.
    #[serde(default = "default_offset_capacity")]
    pub offset_capacity: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            offset_capacity: default_offset_capacity(),
        }
    }
}
