//! Interface adapters: the CSV edge and display-currency conversion.
//!
//! Everything human-facing lives here; the core works in integer minor
//! units and kilograms only.

pub mod csv;
pub mod currency;
