use super::*;

/// The custom errors the marketplace can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Listing price must be above zero (Error code: -4).
    PriceMustBePositive,
    /// Token is already listed for sale (Error code: -5).
    AlreadyListed,
    /// Token is not listed for sale (Error code: -6).
    NotListed,
    /// Sender does not own the token (Error code: -7).
    NotOwner,
    /// Marketplace is not an operator of the token owner (Error code: -8).
    NotApprovedForMarketplace,
    /// Attached amount differs from the listing price (Error code: -9).
    PriceNotMet,
    /// Sender has nothing to withdraw (Error code: -10).
    NoProceeds,
    /// Only account addresses can trade or withdraw (Error code: -11).
    OnlyAccountAddress,
    /// Failed to invoke a contract (Error code: -12).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -13).
    InvokeTransferError,
    /// Incompatible registry contract (Error code: -14)
    Incompatible,
    /// Crediting a sale would overflow the seller's proceeds (Error code: -15).
    ProceedsOverflow,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(cce: CallContractError<T>) -> Self {
        match cce {
            CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
                Self::Incompatible
            }
            _ => Self::InvokeContractError,
        }
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

#[derive(Debug)]
pub enum ContractReadError<R> {
    Call(CallContractError<R>),
    Compatibility,
    Parse,
}

/// Mapping errors of read-only registry queries to CustomContractError.
impl<R> From<ContractReadError<R>> for CustomContractError {
    fn from(cre: ContractReadError<R>) -> Self {
        match cre {
            ContractReadError::Call(e) => e.into(),
            ContractReadError::Compatibility | ContractReadError::Parse => Self::Incompatible,
        }
    }
}

/// Extracts the account behind an address, rejecting contract senders.
pub fn get_account_address(address: Address) -> ContractResult<AccountAddress> {
    match address {
        Address::Account(addr) => Ok(addr),
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const ACCOUNT: AccountAddress = AccountAddress([1; 32]);
    const CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    #[concordium_test]
    fn test_call_errors() {
        claim_eq!(
            CustomContractError::from(CallContractError::<()>::MissingEntrypoint),
            CustomContractError::Incompatible
        );
        claim_eq!(
            CustomContractError::from(CallContractError::<()>::MessageFailed),
            CustomContractError::Incompatible
        );
        claim_eq!(
            CustomContractError::from(CallContractError::<()>::Trap),
            CustomContractError::InvokeContractError
        );
        claim_eq!(
            CustomContractError::from(ContractReadError::<()>::Parse),
            CustomContractError::Incompatible
        );
    }

    #[concordium_test]
    fn test_get_account_address() {
        claim_eq!(get_account_address(Address::Account(ACCOUNT)), Ok(ACCOUNT));
        claim_eq!(
            get_account_address(Address::Contract(CONTRACT)),
            Err(CustomContractError::OnlyAccountAddress)
        );
    }
}
