//! Output lines driven by the BCM engine.
//!
//! Channel i sits on pin `FIRST_PIN + i` of `PORT`, so a whole output word is
//! applied with a single BSRR write. CH2..CH4 are the on-board RGB LED.
use super::PinDef;
use super::{PinMode, Port};

use hal::pac::GPIOB;

use softbcm_algo::CHANNEL_COUNT;

/// Port carrying every BCM line.
pub const PORT: Port = Port::B;

/// Register block of `PORT`, written by the BCM driver. Change both together.
pub type PortRegs = GPIOB;

/// Pin of channel 0; the remaining channels follow contiguously.
pub const FIRST_PIN: u8 = 11;

pub const CH0: PinDef = PinDef {
    port: PORT,
    pin: FIRST_PIN,
    mode: PinMode::Output,
};

pub const CH1: PinDef = PinDef {
    port: PORT,
    pin: FIRST_PIN + 1,
    mode: PinMode::Output,
};

/// Blue LED
pub const CH2: PinDef = PinDef {
    port: PORT,
    pin: FIRST_PIN + 2,
    mode: PinMode::Output,
};

/// Green LED
pub const CH3: PinDef = PinDef {
    port: PORT,
    pin: FIRST_PIN + 3,
    mode: PinMode::Output,
};

/// Red LED
pub const CH4: PinDef = PinDef {
    port: PORT,
    pin: FIRST_PIN + 4,
    mode: PinMode::Output,
};

/// All lines in channel order.
pub const LINES: [PinDef; CHANNEL_COUNT] = [CH0, CH1, CH2, CH3, CH4];
