//! Shipping tariff pricing and margin calculation engine.
//!
//! This crate turns carrier weight-band tariffs, a stack of discounts and a
//! carrier fuel and toll policy into the price quoted to the customer and
//! the margin retained by the reseller.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
