use super::*;

mod marketplace;

pub use self::marketplace::*;
