// Implements the BCM cycle engine: the timer interrupt body that turns the duty
// store into binary-weighted output slices.

// Key Features:
// - Owns the bit-plane counter; nothing outside the handler can change it
// - Reads every channel once per slice straight from the lock-free store
// - Writes the whole output word in one call and re-arms the timer with the
//   weight of the plane just driven
// - Generic over the hardware, so unsupported targets plug in `NoHardware`

// Detailed Operation:
// A plain PWM needs 256 timer events per period to resolve 8-bit duty values.
// BCM gets away with 8: slice k lasts 2^k units and the outputs during slice k
// are bit k of each duty value, so the total high time of a channel over a
// cycle is exactly its duty value out of 255 units.
//
// `tick` is the whole interrupt handler:
//   1. acknowledge the timer event
//   2. assemble the output word for the current plane
//   3. write the word to the port
//   4. set the slice length to the plane's weight
//   5. advance the plane (128 wraps to 1)
// A duty change is picked up by the next slice; slices already driven in the
// current cycle are not corrected.
//
// The handler must not preempt itself. Bind it to a single interrupt at a
// single priority (RTIC hardware task, or an NVIC vector that is not re-entered).

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

pub mod bit_plane;
pub mod output_word;

use crate::channel_store::ChannelStore;
use crate::hardware::BcmHardware;

use bit_plane::BitPlane;

/// Drives `N` BCM outputs from `store` through the hardware `H`.
pub struct BcmEngine<'a, H: BcmHardware, const N: usize> {
    /// Timer and output port
    hw: H,
    /// Duty targets written by producers
    store: &'a ChannelStore<N>,
    /// Plane driven by the next `tick`
    plane: BitPlane,
    /// Set once the hardware has been configured
    initialized: bool,
}

impl<'a, H: BcmHardware, const N: usize> BcmEngine<'a, H, N> {
    /// The output word is one byte wide.
    const FITS_PORT: () = assert!(
        N >= 1 && N <= u8::BITS as usize,
        "BCM supports 1 to 8 channels"
    );

    /// Creates an engine starting at the least significant plane.
    /// The hardware is left untouched until [`init`](Self::init).
    pub fn new(hw: H, store: &'a ChannelStore<N>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_PORT;
        Self {
            hw,
            store,
            plane: BitPlane::FIRST,
            initialized: false,
        }
    }

    /// Configures the timer and output lines. Call before enabling interrupts.
    ///
    /// Repeated calls do nothing: the hardware is configured once, no output
    /// is written and the plane sequence is left where it is.
    pub fn init(&mut self) {
        if self.initialized {
            #[cfg(feature = "defmt")]
            defmt::debug!("BCM: init skipped, engine already running");
            return;
        }
        self.hw.init();
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::info!("BCM: {} channels, {} slices per cycle", N, bit_plane::PLANE_COUNT);
    }

    /// Interrupt handler body. Run once per timer event.
    #[inline(always)]
    pub fn tick(&mut self) {
        self.hw.acknowledge();

        let plane = self.plane;
        let word = output_word::assemble(plane, self.store.iter());
        self.hw.write_outputs(word);
        self.hw.set_slice(plane.mask());

        self.plane = plane.next();
    }

    /// Plane the next `tick` will drive.
    #[inline(always)]
    pub fn plane(&self) -> BitPlane {
        self.plane
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }
}
