use concordium_std::concordium_cfg_test;

#[concordium_cfg_test]
pub use inner::*;

#[concordium_cfg_test]
mod inner {
    use concordium_cis2::*;
    use concordium_std::test_infrastructure::MockFn;
    use concordium_std::*;

    use crate::{ContractBalanceOfQueryParams, ContractBalanceOfQueryResponse, ContractTokenAmount};

    pub fn parse_and_ok_mock<D: Deserial, S>(
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _amount, _balance, _state| {
            D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            Ok((false, Some(return_value.clone())))
        })
    }

    /// Mock that traps unless `check` accepts the parsed parameter.
    pub fn parse_and_check_mock<D: Deserial, S>(
        check: impl Fn(&D) -> bool + 'static,
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            let value =
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            if !check(&value) {
                return Err(CallContractError::Trap);
            }
            Ok((false, Some(return_value.clone())))
        })
    }

    /// Mock that computes its answer from the parsed parameter. `None` traps.
    pub fn parse_and_map_mock<D: Deserial, T: Serial, S>(
        f: impl Fn(&D) -> Option<T> + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            let value =
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            f(&value)
                .map(|r| (false, Some(r)))
                .ok_or(CallContractError::Trap)
        })
    }

    /// `balanceOf` of a registry where `holder` owns exactly one unit of
    /// `token_id` and nobody owns anything else.
    pub fn balance_of_mock<S>(token_id: TokenIdVec, holder: Address) -> MockFn<S> {
        parse_and_map_mock(move |params: &ContractBalanceOfQueryParams| {
            let balances = params
                .queries
                .iter()
                .map(|query| {
                    if query.token_id == token_id && query.address == holder {
                        ContractTokenAmount::from(1)
                    } else {
                        ContractTokenAmount::from(0)
                    }
                })
                .collect::<Vec<_>>();
            Some(ContractBalanceOfQueryResponse::from(balances))
        })
    }

    /// `operatorOf` of a registry where `operator` is the only operator, and
    /// only for `owner`.
    pub fn operator_of_mock<S>(owner: Address, operator: Address) -> MockFn<S> {
        parse_and_map_mock(move |params: &OperatorOfQueryParams| {
            let answers = params
                .queries
                .iter()
                .map(|query| query.owner == owner && query.address == operator)
                .collect::<Vec<_>>();
            Some(OperatorOfQueryResponse::from(answers))
        })
    }
}
