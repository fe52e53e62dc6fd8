use crate::error::Error;

/// Lowest accepted background detection sensitivity.
pub const MIN_SENSITIVITY: u8 = 15;
/// Highest accepted background detection sensitivity.
pub const MAX_SENSITIVITY: u8 = 60;

/// Caller-supplied settings for one background removal run.
///
/// Lower sensitivity keeps more of the subject when it resembles the
/// background; higher sensitivity removes more aggressively.
///
/// With the `serde` feature, deserialization goes through
/// [`ProcessingSettings::new`] and rejects out-of-range sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", try_from = "RawProcessingSettings")
)]
pub struct ProcessingSettings {
    sensitivity: u8,
    edge_smoothing: bool,
    conservative_mode: bool,
}

impl ProcessingSettings {
    /// Create validated settings.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - When `sensitivity` is outside `[15, 60]`
    pub fn new(sensitivity: u8, edge_smoothing: bool, conservative_mode: bool) -> Result<Self, Error> {
        if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&sensitivity) {
            return Err(Error::InvalidParameter {
                name: "sensitivity",
                reason: format!(
                    "{sensitivity} is outside [{MIN_SENSITIVITY}, {MAX_SENSITIVITY}]"
                ),
            });
        }
        Ok(Self {
            sensitivity,
            edge_smoothing,
            conservative_mode,
        })
    }

    #[inline]
    #[must_use]
    pub const fn sensitivity(&self) -> u8 {
        self.sensitivity
    }

    #[inline]
    #[must_use]
    pub const fn edge_smoothing(&self) -> bool {
        self.edge_smoothing
    }

    #[inline]
    #[must_use]
    pub const fn conservative_mode(&self) -> bool {
        self.conservative_mode
    }
}

/// Unvalidated wire form of [`ProcessingSettings`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProcessingSettings {
    sensitivity: u8,
    edge_smoothing: bool,
    conservative_mode: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProcessingSettings> for ProcessingSettings {
    type Error = Error;

    fn try_from(raw: RawProcessingSettings) -> Result<Self, Self::Error> {
        Self::new(raw.sensitivity, raw.edge_smoothing, raw.conservative_mode)
    }
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            sensitivity: 35,
            edge_smoothing: true,
            conservative_mode: true,
        }
    }
}
