#![no_std]

pub mod bcm;
pub mod pinout;
