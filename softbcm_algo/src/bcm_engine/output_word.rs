// Assembles the port word driven during one BCM slice.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use super::bit_plane::BitPlane;

/// Builds the output word for `plane`: bit i is high when duty i has the plane's bit set.
///
/// With the `legacy-ch0` feature channel 0 contributes its raw masked value
/// (`duty[0] & plane`) instead of a single bit, reproducing boards wired for
/// the older bit assembly. Planes above bit 0 then land on other channels' lines.
#[inline(always)]
pub fn assemble(plane: BitPlane, duty: impl IntoIterator<Item = u8>) -> u8 {
    let mut word = 0u8;
    for (i, value) in duty.into_iter().enumerate() {
        word |= channel_bits(i, plane, value);
    }
    word
}

#[inline(always)]
fn channel_bits(channel: usize, plane: BitPlane, value: u8) -> u8 {
    if cfg!(feature = "legacy-ch0") && channel == 0 {
        return value & plane.mask();
    }
    (plane.selects(value) as u8) << channel
}
