//! SPI-mode SD/MMC memory card driver.
//!
//! Brings an unknown card from cold power-up through identification and
//! capacity discovery, then exposes 512-byte block read/write and sector
//! range erase on top of any byte transport implementing [`SdBusOps`].
//! The card variant (legacy MMC, SDSC v1/v2, SDHC) is detected once at
//! init and drives the addressing mode of every later operation.

#![cfg_attr(not(test), no_std)]

pub mod card;
pub mod common;
pub mod constants;
pub mod host;
pub mod sd;

pub use card::info::SdCardInfo;
pub use card::status::SdStatus;
pub use card::CardVariant;
pub use constants::SD_BLOCK_SIZE;
pub use host::{SdBusOps, SdError, SdResult};
pub use sd::SdHost;
