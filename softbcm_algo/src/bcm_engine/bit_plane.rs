// Implements the bit-plane counter of the BCM cycle.

// Key Features:
// - Holds exactly one set bit at all times (1, 2, 4, ..., 128)
// - Advances by a left shift and wraps from the MSB back to the LSB
// - Doubles as the weight of the time slice it selects

// Detailed Operation:
// Every duty value is evaluated one bit at a time. The plane picks the bit, and
// because the slice for plane P lasts P time units, the sum of the slices in
// which a channel is high equals its duty value. Eight advances bring the plane
// back to where it started, so a full modulation cycle spans 255 units.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

/// Number of bit-planes in a modulation cycle (one per duty bit).
pub const PLANE_COUNT: usize = u8::BITS as usize;

/// Length of a full modulation cycle in slice units (1 + 2 + ... + 128).
pub const CYCLE_UNITS: u16 = u8::MAX as u16;

/// Single-bit mask selecting which duty bit is currently driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitPlane(u8);

impl BitPlane {
    /// Least significant plane, the start of every cycle.
    pub const FIRST: BitPlane = BitPlane(1);
    /// Most significant plane, the end of every cycle.
    pub const LAST: BitPlane = BitPlane(1 << 7);

    /// Builds a plane from a raw mask. Returns `None` unless exactly one bit is set.
    pub const fn from_mask(mask: u8) -> Option<BitPlane> {
        if mask.count_ones() == 1 {
            Some(BitPlane(mask))
        } else {
            None
        }
    }

    /// Raw mask, also the slice weight in time units.
    #[inline(always)]
    pub const fn mask(self) -> u8 {
        self.0
    }

    /// Bit position of the plane (0 for the LSB plane).
    #[inline(always)]
    pub const fn index(self) -> u32 {
        self.0.trailing_zeros()
    }

    /// Next plane of the cycle. A shift past bit 7 yields zero, which restarts at bit 0.
    #[inline(always)]
    pub const fn next(self) -> BitPlane {
        let shifted = self.0 << 1;
        if shifted == 0 {
            BitPlane::FIRST
        } else {
            BitPlane(shifted)
        }
    }

    /// True when `duty` has this plane's bit set.
    #[inline(always)]
    pub const fn selects(self, duty: u8) -> bool {
        duty & self.0 != 0
    }

    /// The planes of one cycle in the order the engine visits them.
    pub fn cycle() -> impl Iterator<Item = BitPlane> {
        (0..PLANE_COUNT).map(|i| BitPlane(1u8 << i))
    }
}

impl Default for BitPlane {
    fn default() -> Self {
        BitPlane::FIRST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_every_plane_in_ascending_order() {
        let mut plane = BitPlane::default();
        let mut seen = [0u8; PLANE_COUNT];
        for slot in seen.iter_mut() {
            *slot = plane.mask();
            plane = plane.next();
        }
        assert_eq!(seen, [1, 2, 4, 8, 16, 32, 64, 128]);
        assert_eq!(plane, BitPlane::FIRST);
    }

    #[test]
    fn period_is_exactly_eight() {
        let start = BitPlane::FIRST;
        let mut plane = start.next();
        let mut steps = 1;
        while plane != start {
            plane = plane.next();
            steps += 1;
        }
        assert_eq!(steps, PLANE_COUNT);
    }

    #[test]
    fn last_plane_wraps_to_first() {
        assert_eq!(BitPlane::LAST.next(), BitPlane::FIRST);
    }

    #[test]
    fn from_mask_rejects_zero_and_multi_bit() {
        assert_eq!(BitPlane::from_mask(0), None);
        assert_eq!(BitPlane::from_mask(0b0000_0110), None);
        assert_eq!(BitPlane::from_mask(0xFF), None);
        assert_eq!(BitPlane::from_mask(64), Some(BitPlane(64)));
    }

    #[test]
    fn cycle_weights_sum_to_cycle_units() {
        let total: u16 = BitPlane::cycle().map(|p| p.mask() as u16).sum();
        assert_eq!(total, CYCLE_UNITS);
        assert_eq!(BitPlane::cycle().count(), PLANE_COUNT);
    }

    #[test]
    fn index_matches_bit_position() {
        for (i, plane) in BitPlane::cycle().enumerate() {
            assert_eq!(plane.index() as usize, i);
        }
    }
}
