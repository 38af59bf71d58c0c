//! Codec configuration.

use serde::{Deserialize, Serialize};

/// How a nested `MODEL` value delimits its byte span.
///
/// Model bodies carry no field count; they end where their byte range ends.
/// The top-level model always spans the whole input, but a nested one needs
/// its own boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelFraming {
    /// Every nested model is preceded by a `u32` byte length.
    #[default]
    LengthPrefixed,
    /// A nested model runs to the end of its enclosing range, so it must be
    /// the final value written there.
    Trailing,
}

/// Options shared by [`WireDecoder`](crate::WireDecoder) and
/// [`WireEncoder`](crate::WireEncoder). Both sides must agree on
/// `model_framing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecOptions {
    pub model_framing: ModelFraming,
    /// Maximum nesting of models and maps accepted by the decoder.
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            model_framing: ModelFraming::LengthPrefixed,
            max_depth: 64,
        }
    }
}

impl CodecOptions {
    pub fn trailing() -> Self {
        Self {
            model_framing: ModelFraming::Trailing,
            ..Self::default()
        }
    }

    /// Loads options from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
