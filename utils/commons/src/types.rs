use super::*;

pub type ContractResult<A> = Result<A, CustomContractError>;

/// Token ID type of the registry contracts the marketplace trades in.
/// Variable length, so any CIS-2 token ID can be listed.
pub type ContractTokenId = TokenIdVec;

/// Token amount type used when talking to registry contracts. CIS-2 amounts
/// are LEB128 encoded, so `u64` covers every non-fungible balance.
pub type ContractTokenAmount = TokenAmountU64;

pub type TransferParameter = TransferParams<ContractTokenId, ContractTokenAmount>;

/// Parameter type for the CIS-2 function `balanceOf` specialized to the
/// token IDs used by the marketplace.
pub type ContractBalanceOfQueryParams = BalanceOfQueryParams<ContractTokenId>;

/// Response type for the CIS-2 function `balanceOf`.
pub type ContractBalanceOfQueryResponse = BalanceOfQueryResponse<ContractTokenAmount>;
