//! Core domain types and logic.

pub mod account;
pub mod backtest;
pub mod bar;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod position;
pub mod series;
