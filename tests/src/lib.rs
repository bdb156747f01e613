// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests for NEO N3 hardware wallet integration.
//!
//! Generic over [ledger_neo::Exchange] for reuse against emulated
//! engines and simulators.
//!

pub mod keys;

pub mod tx;

pub mod app_info;

pub mod public_key;

pub mod sign;

pub mod parser;
