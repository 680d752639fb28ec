use super::*;

/// A token held by a CIS-2 registry contract. Key of a marketplace listing.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Token {
    /// Registry contract holding the token.
    pub contract: ContractAddress,
    /// Token identifier inside the registry.
    pub id: ContractTokenId,
}

impl Token {
    pub fn new(contract: ContractAddress, id: ContractTokenId) -> Self {
        Self { contract, id }
    }
}
