// Defines the hardware seam of the BCM engine: one timer and one output port.

// Key Features:
// - `BcmHardware` trait implemented by board drivers
// - `NoHardware` stand-in for targets without a usable timer
// - `SliceReload` period arithmetic for up-counting reload timers

// Detailed Operation:
// The engine never touches registers. Board support code implements
// `BcmHardware` for its timer and port and hands it to `BcmEngine::new`. On a
// target without the timer feature the build selects `NoHardware` instead: setup
// does nothing, no interrupt is ever raised and the outputs stay untouched.
//
// A reload timer without preload takes the new period at once. If the handler
// ran longer than the slice it is about to set, the counter is already past the
// new reload value and would only overflow at its wrap. Drivers check
// `SliceReload::overdue` after every reload write and force an update event.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

/// Timer and output port driven by the BCM engine.
pub trait BcmHardware {
    /// Configures the timer (continuous counting, reloadable period, interrupt
    /// per period) and the output lines. Runs once before interrupts are enabled.
    fn init(&mut self);

    /// Clears the pending timer event. Called first in every handler run.
    #[inline(always)]
    fn acknowledge(&mut self) {}

    /// Drives all output lines at once: bit i of `word` is line i.
    fn write_outputs(&mut self, word: u8);

    /// Makes the slice that is starting last `weight` base time units.
    fn set_slice(&mut self, weight: u8);
}

/// Hardware stand-in for targets lacking the required timer. Every call is a no-op.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoHardware;

impl BcmHardware for NoHardware {
    fn init(&mut self) {}

    fn write_outputs(&mut self, _word: u8) {}

    fn set_slice(&mut self, _weight: u8) {}
}

/// Reload values of an up-counting timer that ends a slice on overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliceReload {
    /// Timer ticks per slice unit
    unit_ticks: u32,
}

impl SliceReload {
    pub const fn new(unit_ticks: u32) -> Self {
        Self { unit_ticks }
    }

    pub const fn unit_ticks(self) -> u32 {
        self.unit_ticks
    }

    /// Last counter value of a slice lasting `weight` units.
    #[inline(always)]
    pub const fn reload(self, weight: u8) -> u32 {
        (weight as u32 * self.unit_ticks).saturating_sub(1)
    }

    /// True when `count` already passed `reload`: the timer would run to its
    /// wrap before the next overflow.
    #[inline(always)]
    pub const fn overdue(count: u32, reload: u32) -> bool {
        count > reload
    }
}
