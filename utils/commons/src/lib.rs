//! Types, errors and registry helpers shared by the marketplace contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{cis2::*, constants::*, errors::*, structs::*, types::*};
use concordium_cis2::*;
use concordium_std::*;

pub mod test;

mod cis2;
mod constants;
mod errors;
mod structs;
mod types;
