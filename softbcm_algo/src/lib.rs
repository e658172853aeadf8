#![cfg_attr(not(test), no_std)]

//! Software binary code modulation: several PWM-like outputs from one timer.
//!
//! Producers write 8-bit duty values into a [`ChannelStore`]; a [`BcmEngine`]
//! bound to a timer interrupt turns them into binary-weighted output slices.

pub mod bcm_engine;
pub mod channel_store;
pub mod error;
pub mod hardware;

pub use bcm_engine::bit_plane::{BitPlane, CYCLE_UNITS, PLANE_COUNT};
pub use bcm_engine::BcmEngine;
pub use channel_store::ChannelStore;
pub use error::StoreError;
pub use hardware::{BcmHardware, NoHardware, SliceReload};

/// Number of BCM outputs in the reference configuration.
pub const CHANNEL_COUNT: usize = 5;

/// Duty store sized for the reference configuration.
pub type DutyStore = ChannelStore<CHANNEL_COUNT>;

/// Engine sized for the reference configuration, reading a `'static` store.
pub type Bcm<H> = BcmEngine<'static, H, CHANNEL_COUNT>;
