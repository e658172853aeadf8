// Implements the per-channel duty store shared between producers and the BCM interrupt.

// Key Features:
// - One atomic byte per channel, so the ISR never sees a torn duty value
// - Lock-free writes from any context, including while the ISR is running
// - Checked and bulk accessors for external producers (command interfaces)

// Detailed Operation:
// The store is meant to live in a `static` for the whole program. Producers call
// `set` whenever a target changes; the engine reads every channel once per
// slice. Each value is loaded and stored with relaxed ordering since channels are
// independent: there is no ordering between channels and none is required.
// A bulk `load` is validated up front and then written channel by channel, so
// the ISR may observe a mix of old and new channels for one slice.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::sync::atomic::{AtomicU8, Ordering};

use crate::error::StoreError;

/// Fixed set of 8-bit duty values, one per BCM channel.
pub struct ChannelStore<const N: usize> {
    duty: [AtomicU8; N],
}

impl<const N: usize> ChannelStore<N> {
    /// Creates a store with every channel at duty 0 (output low).
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const OFF: AtomicU8 = AtomicU8::new(0);
        Self { duty: [OFF; N] }
    }

    /// Number of channels.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Stores the duty value of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= N`.
    #[inline(always)]
    pub fn set(&self, channel: usize, value: u8) {
        self.duty[channel].store(value, Ordering::Relaxed);
    }

    /// Returns the duty value of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= N`.
    #[inline(always)]
    pub fn get(&self, channel: usize) -> u8 {
        self.duty[channel].load(Ordering::Relaxed)
    }

    /// Like [`set`](Self::set), but reports an invalid channel instead of panicking.
    pub fn try_set(&self, channel: usize, value: u8) -> Result<(), StoreError> {
        self.cell(channel)?.store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Like [`get`](Self::get), but reports an invalid channel instead of panicking.
    pub fn try_get(&self, channel: usize) -> Result<u8, StoreError> {
        Ok(self.cell(channel)?.load(Ordering::Relaxed))
    }

    /// Writes all channels from `values`. Nothing is written unless `values.len() == N`.
    pub fn load(&self, values: &[u8]) -> Result<(), StoreError> {
        if values.len() != N {
            return Err(StoreError::LengthMismatch {
                expected: N,
                actual: values.len(),
            });
        }
        for (cell, &value) in self.duty.iter().zip(values) {
            cell.store(value, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Copies the current duty values. Each value is read atomically, the set as a whole is not.
    pub fn snapshot(&self) -> [u8; N] {
        core::array::from_fn(|i| self.get(i))
    }

    /// Iterates over the current duty values in channel order.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.duty.iter().map(|cell| cell.load(Ordering::Relaxed))
    }

    fn cell(&self, channel: usize) -> Result<&AtomicU8, StoreError> {
        self.duty.get(channel).ok_or(StoreError::ChannelOutOfRange {
            channel,
            count: N,
        })
    }
}

impl<const N: usize> Default for ChannelStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SHARED: ChannelStore<5> = ChannelStore::new();

    #[test]
    fn starts_with_all_channels_off() {
        let store = ChannelStore::<5>::new();
        assert_eq!(store.snapshot(), [0; 5]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn set_then_get() {
        let store = ChannelStore::<5>::new();
        store.set(0, 255);
        store.set(4, 17);
        assert_eq!(store.get(0), 255);
        assert_eq!(store.get(4), 17);
        assert_eq!(store.get(2), 0);
    }

    #[test]
    fn usable_as_static() {
        SHARED.set(3, 99);
        assert_eq!(SHARED.get(3), 99);
    }

    #[test]
    #[should_panic]
    fn set_out_of_range_panics() {
        let store = ChannelStore::<5>::new();
        store.set(5, 1);
    }

    #[test]
    fn checked_accessors_report_out_of_range() {
        let store = ChannelStore::<5>::new();
        let err = StoreError::ChannelOutOfRange {
            channel: 7,
            count: 5,
        };
        assert_eq!(store.try_set(7, 1), Err(err));
        assert_eq!(store.try_get(7), Err(err));
        assert_eq!(store.try_set(1, 42), Ok(()));
        assert_eq!(store.try_get(1), Ok(42));
    }

    #[test]
    fn load_rejects_wrong_length_without_writing() {
        let store = ChannelStore::<5>::new();
        store.set(0, 10);
        assert_eq!(
            store.load(&[1, 2, 3]),
            Err(StoreError::LengthMismatch {
                expected: 5,
                actual: 3
            })
        );
        assert_eq!(store.snapshot(), [10, 0, 0, 0, 0]);
    }

    #[test]
    fn load_writes_every_channel() {
        let store = ChannelStore::<5>::new();
        store.load(&[255, 0, 128, 1, 64]).unwrap();
        assert_eq!(store.snapshot(), [255, 0, 128, 1, 64]);
        assert!(store.iter().eq([255, 0, 128, 1, 64]));
    }

    #[test]
    fn concurrent_writers_never_tear_values() {
        let store = ChannelStore::<2>::new();
        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..10_000 {
                    store.set(0, 0x0F);
                    store.set(0, 0xF0);
                }
            });
            for _ in 0..10_000 {
                let v = store.get(0);
                assert!(v == 0 || v == 0x0F || v == 0xF0, "torn value {:#x}", v);
            }
        });
    }
}
