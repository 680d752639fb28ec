use concordium_cis2::*;
use concordium_std::*;

use crate::{
    ContractBalanceOfQueryParams, ContractBalanceOfQueryResponse, ContractReadError,
    ContractTokenAmount, ContractTokenId, Token, TransferParameter, CIS2_BALANCE_OF,
    CIS2_OPERATOR_OF, CIS2_TRANSFER,
};

/// Calls into a CIS-2 registry contract. The registry stays the only
/// authority on ownership and operator approval.
pub trait HostCis2Ext<S>: HasHost<S> {
    fn cis2_balance_of(
        &self,
        contract: &ContractAddress,
        token_id: &ContractTokenId,
        address: Address,
    ) -> Result<ContractTokenAmount, ContractReadError<Self::ReturnValueType>> {
        let params = ContractBalanceOfQueryParams {
            queries: vec![BalanceOfQuery {
                token_id: token_id.clone(),
                address,
            }],
        };

        let mut result = self
            .invoke_contract_read_only(
                contract,
                &params,
                EntrypointName::new_unchecked(CIS2_BALANCE_OF),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        let response = ContractBalanceOfQueryResponse::deserial(&mut result)
            .map_err(|_| ContractReadError::Parse)?;

        // One query was sent, so exactly one balance must come back.
        response
            .0
            .first()
            .copied()
            .ok_or(ContractReadError::Compatibility)
    }

    fn cis2_is_owner(
        &self,
        token: &Token,
        address: Address,
    ) -> Result<bool, ContractReadError<Self::ReturnValueType>> {
        let balance = self.cis2_balance_of(&token.contract, &token.id, address)?;
        Ok(balance != ContractTokenAmount::from(0))
    }

    fn cis2_is_operator(
        &self,
        contract: &ContractAddress,
        owner: Address,
        operator: Address,
    ) -> Result<bool, ContractReadError<Self::ReturnValueType>> {
        let params = OperatorOfQueryParams {
            queries: vec![OperatorOfQuery {
                owner,
                address: operator,
            }],
        };

        let mut result = self
            .invoke_contract_read_only(
                contract,
                &params,
                EntrypointName::new_unchecked(CIS2_OPERATOR_OF),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        let response =
            OperatorOfQueryResponse::deserial(&mut result).map_err(|_| ContractReadError::Parse)?;

        response
            .0
            .first()
            .copied()
            .ok_or(ContractReadError::Compatibility)
    }

    /// Moves a single unit of `token` from `from` to the account `to`. The
    /// registry rejects if the caller is not an operator of `from` or if
    /// `from` no longer holds the token.
    fn cis2_transfer(
        &mut self,
        token: &Token,
        from: Address,
        to: AccountAddress,
    ) -> Result<(), CallContractError<Self::ReturnValueType>> {
        let parameter: TransferParameter = TransferParams(vec![Transfer {
            token_id: token.id.clone(),
            amount: ContractTokenAmount::from(1),
            from,
            to: Receiver::from_account(to),
            data: AdditionalData::empty(),
        }]);

        self.invoke_contract(
            &token.contract,
            &parameter,
            EntrypointName::new_unchecked(CIS2_TRANSFER),
            Amount::zero(),
        )?;

        Ok(())
    }
}

impl<S, H: HasHost<S>> HostCis2Ext<S> for H {}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::test::*;
    use concordium_std::test_infrastructure::*;

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    const USER_1: AccountAddress = AccountAddress([1; 32]);
    const USER_2: AccountAddress = AccountAddress([2; 32]);

    fn token() -> Token {
        Token::new(NFT_CONTRACT, TokenIdVec(vec![0]))
    }

    fn default_host() -> TestHost<()> {
        TestHost::new((), TestStateBuilder::new())
    }

    #[concordium_test]
    fn test_is_owner() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_BALANCE_OF)),
            balance_of_mock(TokenIdVec(vec![0]), Address::Account(USER_1)),
        );

        let response = host.cis2_is_owner(&token(), Address::Account(USER_1));
        claim!(matches!(response, Ok(true)));

        let response = host.cis2_is_owner(&token(), Address::Account(USER_2));
        claim!(matches!(response, Ok(false)));
    }

    #[concordium_test]
    fn test_balance_of_empty_response() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_BALANCE_OF)),
            parse_and_ok_mock::<ContractBalanceOfQueryParams, _>(
                ContractBalanceOfQueryResponse::from(Vec::new()),
            ),
        );

        let response = host.cis2_balance_of(
            &NFT_CONTRACT,
            &TokenIdVec(vec![0]),
            Address::Account(USER_1),
        );
        claim!(matches!(response, Err(ContractReadError::Compatibility)));
    }

    #[concordium_test]
    fn test_is_operator() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_OPERATOR_OF)),
            operator_of_mock(Address::Account(USER_1), Address::Contract(MARKETPLACE)),
        );

        let response = host.cis2_is_operator(
            &NFT_CONTRACT,
            Address::Account(USER_1),
            Address::Contract(MARKETPLACE),
        );
        claim!(matches!(response, Ok(true)));

        let response = host.cis2_is_operator(
            &NFT_CONTRACT,
            Address::Account(USER_2),
            Address::Contract(MARKETPLACE),
        );
        claim!(matches!(response, Ok(false)));
    }

    #[concordium_test]
    fn test_transfer() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_TRANSFER)),
            parse_and_check_mock::<TransferParameter, _>(
                |params| {
                    params.0.len() == 1
                        && params.0[0].token_id == TokenIdVec(vec![0])
                        && params.0[0].amount == ContractTokenAmount::from(1)
                        && params.0[0].from == Address::Account(USER_1)
                        && matches!(params.0[0].to, Receiver::Account(to) if to == USER_2)
                },
                (),
            ),
        );

        let response = host.cis2_transfer(&token(), Address::Account(USER_1), USER_2);
        claim!(response.is_ok());
    }

    #[concordium_test]
    fn test_transfer_rejected() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_TRANSFER)),
            parse_and_check_mock::<TransferParameter, _>(|_| false, ()),
        );

        let response = host.cis2_transfer(&token(), Address::Account(USER_1), USER_2);
        claim!(matches!(response, Err(CallContractError::Trap)));
    }
}
