use super::*;

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Active listings. A token without an entry is not for sale.
    pub listings: StateMap<Token, Listing, S>,
    /// Withdrawable sale proceeds per seller.
    pub proceeds: StateMap<AccountAddress, Amount, S>,
}

/// A standing offer to sell one token at a fixed price.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    pub seller: AccountAddress,
    pub price: Amount,
}

#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Token to put up for sale
    pub token: Token,
    /// Asking price
    pub price: Amount,
}

/// Update Listing Params.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct UpdateListingParams {
    /// Token to update price
    pub token: Token,
    /// New asking price
    pub price: Amount,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct ViewListingsParams {
    pub skip: u32,
    pub show: u32,
}

#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub token: Token,
    pub listing: Listing,
}
