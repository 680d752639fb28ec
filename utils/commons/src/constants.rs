/// Tag for the Item Listed event. Also logged when a listing price is updated.
pub const ITEM_LISTED_TAG: u8 = u8::MAX - 8;

/// Tag for the Item Canceled event.
pub const ITEM_CANCELED_TAG: u8 = u8::MAX - 6;

/// Tag for the Item Bought event.
pub const ITEM_BOUGHT_TAG: u8 = u8::MAX - 7;

/// Tag for the Proceeds Withdrawn event.
pub const PROCEEDS_WITHDRAWN_TAG: u8 = u8::MAX - 14;

/// Entrypoints of the CIS-2 registry contracts.
pub const CIS2_BALANCE_OF: &str = "balanceOf";
pub const CIS2_OPERATOR_OF: &str = "operatorOf";
pub const CIS2_TRANSFER: &str = "transfer";
