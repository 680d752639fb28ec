//! Fixed-price marketplace for CIS-2 tokens.
//!
//! Owners list a token at a price, buyers pay exactly that price to receive
//! it, and sellers withdraw their accumulated proceeds. The marketplace never
//! holds the tokens: it must be an operator of the seller in the token
//! contract, and it performs the transfer on the buyer's behalf.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{events::*, structs::*};
use commons::*;
use concordium_cis2::*;
use concordium_std::*;

mod contract;
mod events;
mod impls;
mod structs;
