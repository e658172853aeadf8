use core::fmt;

/// Errors reported by the checked producer surface of [`ChannelStore`](crate::ChannelStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Channel index outside `0..count`.
    ChannelOutOfRange { channel: usize, count: usize },
    /// Bulk write whose length differs from the channel count.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ChannelOutOfRange { channel, count } => {
                write!(f, "channel {} out of range (0..{})", channel, count)
            }
            StoreError::LengthMismatch { expected, actual } => {
                write!(f, "expected {} duty values, got {}", expected, actual)
            }
        }
    }
}
