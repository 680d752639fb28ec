use super::*;

/// Initialize the marketplace with no listings and no proceeds.
#[init(contract = "NftMarketplace")]
fn init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::empty(state_builder))
}

/// Put a token up for sale at a fixed price.
///
/// The marketplace must already be an operator of the sender in the token
/// contract, otherwise it could not deliver the token to a buyer.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - The price is zero.
/// - The token is already listed.
/// - Sender is a contract address.
/// - Sender does not own the token.
/// - The marketplace is not an operator of the sender.
#[receive(
    contract = "NftMarketplace",
    name = "list",
    parameter = "ListParams",
    mutable,
    enable_logger
)]
fn list<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: ListParams = ctx.parameter_cursor().get()?;

    ensure!(
        params.price > Amount::zero(),
        CustomContractError::PriceMustBePositive
    );
    ensure!(
        !host.state().is_listed(&params.token),
        CustomContractError::AlreadyListed
    );

    let seller = get_account_address(ctx.sender())?;
    ensure!(
        host.cis2_is_owner(&params.token, Address::Account(seller))?,
        CustomContractError::NotOwner
    );
    ensure!(
        host.cis2_is_operator(
            &params.token.contract,
            Address::Account(seller),
            Address::Contract(ctx.self_address()),
        )?,
        CustomContractError::NotApprovedForMarketplace
    );

    host.state_mut().list(&params.token, seller, params.price);

    logger.log(&MarketplaceEvent::ItemListed(ItemListedEvent {
        seller,
        token: params.token,
        price: params.price,
    }))?;

    Ok(())
}

/// Change the price of a listed token.
///
/// Ownership is checked against the token contract on every call, so after
/// the token changed hands only the new owner can reprice it, and the new
/// owner becomes the seller.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - The token is not listed.
/// - Sender does not own the token.
/// - Sender is a contract address.
/// - The new price is zero.
#[receive(
    contract = "NftMarketplace",
    name = "updateListing",
    parameter = "UpdateListingParams",
    mutable,
    enable_logger
)]
fn update_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: UpdateListingParams = ctx.parameter_cursor().get()?;

    host.state().active_listing(&params.token)?;

    ensure!(
        host.cis2_is_owner(&params.token, ctx.sender())?,
        CustomContractError::NotOwner
    );
    let seller = get_account_address(ctx.sender())?;
    ensure!(
        params.price > Amount::zero(),
        CustomContractError::PriceMustBePositive
    );

    host.state_mut().list(&params.token, seller, params.price);

    // Repricing is reported as a fresh listing
    logger.log(&MarketplaceEvent::ItemListed(ItemListedEvent {
        seller,
        token: params.token,
        price: params.price,
    }))?;

    Ok(())
}

/// Remove a token from sale.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - The token is not listed.
/// - Sender does not own the token.
/// - Sender is a contract address.
#[receive(
    contract = "NftMarketplace",
    name = "cancelListing",
    parameter = "Token",
    mutable,
    enable_logger
)]
fn cancel_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let token: Token = ctx.parameter_cursor().get()?;

    host.state().active_listing(&token)?;

    ensure!(
        host.cis2_is_owner(&token, ctx.sender())?,
        CustomContractError::NotOwner
    );
    let seller = get_account_address(ctx.sender())?;

    host.state_mut().unlist(&token)?;

    logger.log(&MarketplaceEvent::ItemCanceled(ItemCanceledEvent {
        seller,
        token,
    }))?;

    Ok(())
}

/// Buy a listed token by paying exactly its price.
///
/// The seller is credited and the listing is removed before the token
/// contract is asked to move the token, so a call back into the marketplace
/// from the token contract finds the token already sold.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - The token is not listed.
/// - The attached amount differs from the price.
/// - Sender is a contract address.
/// - The seller's proceeds would overflow.
/// - The token contract rejects the transfer.
#[receive(
    contract = "NftMarketplace",
    name = "buy",
    parameter = "Token",
    mutable,
    payable,
    enable_logger
)]
fn buy<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let token: Token = ctx.parameter_cursor().get()?;

    let listing = host.state().active_listing(&token)?;
    ensure_eq!(amount, listing.price, CustomContractError::PriceNotMet);
    let buyer = get_account_address(ctx.sender())?;

    host.state_mut().settle_purchase(&token, listing)?;

    host.cis2_transfer(&token, Address::Account(listing.seller), buyer)?;

    logger.log(&MarketplaceEvent::ItemBought(ItemBoughtEvent {
        buyer,
        token,
        price: listing.price,
    }))?;

    Ok(())
}

/// Pay out the proceeds of the sender.
///
/// The balance is zeroed before the transfer. A failed transfer rejects
/// the whole call, so the balance is kept for a later attempt.
///
/// Rejects if:
/// - The sender has no proceeds. Contracts never have any.
/// - The transfer fails.
#[receive(contract = "NftMarketplace", name = "withdrawProceeds", mutable, enable_logger)]
fn withdraw_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let seller =
        get_account_address(ctx.sender()).map_err(|_| CustomContractError::NoProceeds)?;

    let amount = host.state_mut().take_proceeds(&seller)?;

    host.invoke_transfer(&seller, amount)?;

    logger.log(&MarketplaceEvent::ProceedsWithdrawn(ProceedsWithdrawnEvent {
        seller,
        amount,
    }))?;

    Ok(())
}

/// View the listing of a token, if any.
#[receive(
    contract = "NftMarketplace",
    name = "getListing",
    parameter = "Token",
    return_value = "Option<Listing>"
)]
fn get_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<Listing>> {
    let token: Token = ctx.parameter_cursor().get()?;
    Ok(host.state().get_listing(&token))
}

/// View the withdrawable proceeds of an account.
#[receive(
    contract = "NftMarketplace",
    name = "getProceeds",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn get_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let seller: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().proceeds_of(&seller))
}

/// View a page of the active listings, skipping the first `skip` and
/// returning at most `show`.
#[receive(
    contract = "NftMarketplace",
    name = "viewListings",
    parameter = "ViewListingsParams",
    return_value = "Vec<ListingEntry>"
)]
fn view_listings<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<ListingEntry>> {
    let params: ViewListingsParams = ctx.parameter_cursor().get()?;
    Ok(host.state().view_listings(params.skip, params.show))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use concordium_std::test_infrastructure::*;

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const BUYER_CONTRACT: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };

    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BUYER: AccountAddress = AccountAddress([2; 32]);
    const STRANGER: AccountAddress = AccountAddress([3; 32]);

    const PRICE: Amount = Amount::from_ccd(1);

    fn token_id() -> ContractTokenId {
        TokenIdVec(vec![0])
    }

    fn token() -> Token {
        Token::new(NFT_CONTRACT, token_id())
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let state = State::empty(&mut state_builder);
        TestHost::new(state, state_builder)
    }

    /// Host with `token()` listed by `SELLER` at `PRICE`.
    fn listed_host() -> TestHost<State<TestStateApi>> {
        let mut host = default_host();
        host.state_mut().list(&token(), SELLER, PRICE);
        host
    }

    fn receive_ctx<'a>(sender: Address, parameter: &'a [u8]) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(MARKETPLACE)
            .set_parameter(parameter);
        ctx
    }

    /// Registry where `owner` holds `token()` and approved the marketplace.
    fn setup_registry(host: &mut TestHost<State<TestStateApi>>, owner: AccountAddress) {
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_BALANCE_OF)),
            balance_of_mock(token_id(), Address::Account(owner)),
        );
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_OPERATOR_OF)),
            operator_of_mock(Address::Account(owner), Address::Contract(MARKETPLACE)),
        );
    }

    /// Registry transfer that only accepts moving `token()` from `from` to `to`.
    fn setup_transfer(
        host: &mut TestHost<State<TestStateApi>>,
        from: AccountAddress,
        to: AccountAddress,
    ) {
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_TRANSFER)),
            parse_and_check_mock::<TransferParameter, _>(
                move |params| {
                    params.0.len() == 1
                        && params.0[0].token_id == token_id()
                        && params.0[0].amount == ContractTokenAmount::from(1)
                        && params.0[0].from == Address::Account(from)
                        && matches!(params.0[0].to, Receiver::Account(account) if account == to)
                },
                (),
            ),
        );
    }

    fn call_list(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        price: Amount,
        logger: &mut TestLogger,
    ) -> ContractResult<()> {
        let params = ListParams {
            token: token(),
            price,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(sender, &bytes);
        list(&ctx, host, logger)
    }

    fn call_update(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        price: Amount,
        logger: &mut TestLogger,
    ) -> ContractResult<()> {
        let params = UpdateListingParams {
            token: token(),
            price,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(sender, &bytes);
        update_listing(&ctx, host, logger)
    }

    fn call_cancel(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        logger: &mut TestLogger,
    ) -> ContractResult<()> {
        let bytes = to_bytes(&token());
        let ctx = receive_ctx(sender, &bytes);
        cancel_listing(&ctx, host, logger)
    }

    fn call_buy(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        amount: Amount,
        logger: &mut TestLogger,
    ) -> ContractResult<()> {
        let bytes = to_bytes(&token());
        let ctx = receive_ctx(sender, &bytes);
        buy(&ctx, host, amount, logger)
    }

    fn call_withdraw(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        logger: &mut TestLogger,
    ) -> ContractResult<()> {
        let ctx = receive_ctx(sender, &[]);
        withdraw_proceeds(&ctx, host, logger)
    }

    #[concordium_test]
    fn test_init() {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();

        let state = init(&ctx, &mut state_builder).expect_report("Init should pass");

        claim_eq!(state.get_listing(&token()), None);
        claim_eq!(state.proceeds_of(&SELLER), Amount::zero());
        claim!(state.view_listings(0, 10).is_empty());
    }

    #[concordium_test]
    fn test_list() {
        let mut host = default_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_list(&mut host, Address::Account(SELLER), PRICE, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE
            })
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::ItemListed(ItemListedEvent {
                seller: SELLER,
                token: token(),
                price: PRICE,
            }))
        );
    }

    #[concordium_test]
    fn test_list_zero_price() {
        let mut host = default_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_list(&mut host, Address::Account(SELLER), Amount::zero(), &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceMustBePositive));
        claim_eq!(host.state().get_listing(&token()), None);
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_list_already_listed() {
        let mut host = listed_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_list(&mut host, Address::Account(SELLER), PRICE * 2, &mut logger);

        claim_eq!(result, Err(CustomContractError::AlreadyListed));
        // The first listing is untouched
        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE
            })
        );
    }

    #[concordium_test]
    fn test_list_not_owner() {
        let mut host = default_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_list(&mut host, Address::Account(STRANGER), PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotOwner));
        claim_eq!(host.state().get_listing(&token()), None);
    }

    #[concordium_test]
    fn test_list_not_approved() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_BALANCE_OF)),
            balance_of_mock(token_id(), Address::Account(SELLER)),
        );
        // Some other contract is the operator, not the marketplace
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_OPERATOR_OF)),
            operator_of_mock(Address::Account(SELLER), Address::Contract(BUYER_CONTRACT)),
        );
        let mut logger = TestLogger::init();

        let result = call_list(&mut host, Address::Account(SELLER), PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotApprovedForMarketplace));
        claim_eq!(host.state().get_listing(&token()), None);
    }

    #[concordium_test]
    fn test_list_from_contract() {
        let mut host = default_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_list(
            &mut host,
            Address::Contract(BUYER_CONTRACT),
            PRICE,
            &mut logger,
        );

        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress));
    }

    #[concordium_test]
    fn test_update_listing() {
        let mut host = listed_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_update(&mut host, Address::Account(SELLER), PRICE * 3, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE * 3
            })
        );
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::ItemListed(ItemListedEvent {
                seller: SELLER,
                token: token(),
                price: PRICE * 3,
            }))
        );
    }

    #[concordium_test]
    fn test_update_listing_new_owner() {
        // Token moved to STRANGER outside of the marketplace
        let mut host = listed_host();
        setup_registry(&mut host, STRANGER);
        let mut logger = TestLogger::init();

        let result = call_update(&mut host, Address::Account(SELLER), PRICE * 2, &mut logger);
        claim_eq!(result, Err(CustomContractError::NotOwner));

        let result = call_update(&mut host, Address::Account(STRANGER), PRICE * 2, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: STRANGER,
                price: PRICE * 2
            })
        );
    }

    #[concordium_test]
    fn test_update_listing_not_listed() {
        let mut host = default_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_update(&mut host, Address::Account(SELLER), PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed));
        claim_eq!(host.state().get_listing(&token()), None);
    }

    #[concordium_test]
    fn test_update_listing_zero_price() {
        let mut host = listed_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_update(&mut host, Address::Account(SELLER), Amount::zero(), &mut logger);
        claim_eq!(result, Err(CustomContractError::PriceMustBePositive));

        // Ownership is checked before the price
        let result = call_update(&mut host, Address::Account(STRANGER), Amount::zero(), &mut logger);
        claim_eq!(result, Err(CustomContractError::NotOwner));

        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE
            })
        );
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_cancel_listing() {
        let mut host = listed_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_cancel(&mut host, Address::Account(STRANGER), &mut logger);
        claim_eq!(result, Err(CustomContractError::NotOwner));
        claim!(host.state().is_listed(&token()));

        let result = call_cancel(&mut host, Address::Account(SELLER), &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().get_listing(&token()), None);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::ItemCanceled(ItemCanceledEvent {
                seller: SELLER,
                token: token(),
            }))
        );

        let result = call_cancel(&mut host, Address::Account(SELLER), &mut logger);
        claim_eq!(result, Err(CustomContractError::NotListed));
    }

    #[concordium_test]
    fn test_cancel_listing_new_owner() {
        let mut host = listed_host();
        setup_registry(&mut host, STRANGER);
        let mut logger = TestLogger::init();

        let result = call_cancel(&mut host, Address::Account(SELLER), &mut logger);
        claim_eq!(result, Err(CustomContractError::NotOwner));

        let result = call_cancel(&mut host, Address::Account(STRANGER), &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().get_listing(&token()), None);
    }

    #[concordium_test]
    fn test_contract_not_owner() {
        let mut host = listed_host();
        setup_registry(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let result = call_cancel(&mut host, Address::Contract(BUYER_CONTRACT), &mut logger);
        claim_eq!(result, Err(CustomContractError::NotOwner));

        let result = call_update(
            &mut host,
            Address::Contract(BUYER_CONTRACT),
            PRICE * 2,
            &mut logger,
        );
        claim_eq!(result, Err(CustomContractError::NotOwner));

        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE
            })
        );
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_cancel_listing_owned_by_contract() {
        // Token moved to a contract outside of the marketplace
        let mut host = listed_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_BALANCE_OF)),
            balance_of_mock(token_id(), Address::Contract(BUYER_CONTRACT)),
        );
        let mut logger = TestLogger::init();

        let result = call_cancel(&mut host, Address::Contract(BUYER_CONTRACT), &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress));

        let result = call_cancel(&mut host, Address::Account(SELLER), &mut logger);
        claim_eq!(result, Err(CustomContractError::NotOwner));
        claim!(host.state().is_listed(&token()));
    }

    #[concordium_test]
    fn test_buy() {
        let mut host = listed_host();
        setup_transfer(&mut host, SELLER, BUYER);
        let mut logger = TestLogger::init();

        let result = call_buy(&mut host, Address::Account(BUYER), PRICE, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(host.state().get_listing(&token()), None);
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::ItemBought(ItemBoughtEvent {
                buyer: BUYER,
                token: token(),
                price: PRICE,
            }))
        );

        // Sold only once
        let result = call_buy(&mut host, Address::Account(STRANGER), PRICE, &mut logger);
        claim_eq!(result, Err(CustomContractError::NotListed));
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE);
    }

    #[concordium_test]
    fn test_buy_price_not_met() {
        let mut host = listed_host();
        setup_transfer(&mut host, SELLER, BUYER);
        let mut logger = TestLogger::init();

        let underpaid = call_buy(
            &mut host,
            Address::Account(BUYER),
            Amount::from_micro_ccd(999_999),
            &mut logger,
        );
        claim_eq!(underpaid, Err(CustomContractError::PriceNotMet));

        let overpaid = call_buy(&mut host, Address::Account(BUYER), PRICE * 2, &mut logger);
        claim_eq!(overpaid, Err(CustomContractError::PriceNotMet));

        claim_eq!(
            host.state().get_listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE
            })
        );
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_buy_not_listed() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        let result = call_buy(&mut host, Address::Account(BUYER), PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed));
    }

    #[concordium_test]
    fn test_buy_from_contract() {
        let mut host = listed_host();
        let mut logger = TestLogger::init();

        let result = call_buy(
            &mut host,
            Address::Contract(BUYER_CONTRACT),
            PRICE,
            &mut logger,
        );

        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress));
        claim!(host.state().is_listed(&token()));
    }

    #[concordium_test]
    fn test_buy_transfer_rejected() {
        let mut host = listed_host();
        // The seller no longer owns the token or revoked the marketplace
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_TRANSFER)),
            parse_and_check_mock::<TransferParameter, _>(|_| false, ()),
        );
        let mut logger = TestLogger::init();

        let result = call_buy(&mut host, Address::Account(BUYER), PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::InvokeContractError));
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_buy_updates_state_before_transfer() {
        let mut host = listed_host();
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(CIS2_TRANSFER)),
            MockFn::new_v1(|param, _, _, state: &mut State<TestStateApi>| {
                TransferParameter::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;

                // A re-entrant buy would find nothing to buy, and the seller
                // is already paid.
                if state.active_listing(&token()) != Err(CustomContractError::NotListed)
                    || state.proceeds_of(&SELLER) != PRICE
                {
                    return Err(CallContractError::Trap);
                }

                Ok((false, ()))
            }),
        );
        let mut logger = TestLogger::init();

        let result = call_buy(&mut host, Address::Account(BUYER), PRICE, &mut logger);

        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_withdraw_proceeds() {
        let mut host = default_host();
        host.state_mut()
            .credit_proceeds(SELLER, PRICE * 2)
            .expect_report("Crediting should pass");
        host.set_self_balance(PRICE * 2);
        let mut logger = TestLogger::init();

        let result = call_withdraw(&mut host, Address::Account(SELLER), &mut logger);

        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, PRICE * 2));
        claim_eq!(host.get_transfers().len(), 1);
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::ProceedsWithdrawn(ProceedsWithdrawnEvent {
                seller: SELLER,
                amount: PRICE * 2,
            }))
        );

        // Nothing left to withdraw
        let result = call_withdraw(&mut host, Address::Account(SELLER), &mut logger);
        claim_eq!(result, Err(CustomContractError::NoProceeds));
        claim_eq!(host.get_transfers().len(), 1);
    }

    #[concordium_test]
    fn test_withdraw_no_proceeds() {
        let mut host = default_host();
        host.state_mut()
            .credit_proceeds(SELLER, PRICE)
            .expect_report("Crediting should pass");
        let mut logger = TestLogger::init();

        let result = call_withdraw(&mut host, Address::Account(STRANGER), &mut logger);
        claim_eq!(result, Err(CustomContractError::NoProceeds));

        let result = call_withdraw(&mut host, Address::Contract(BUYER_CONTRACT), &mut logger);
        claim_eq!(result, Err(CustomContractError::NoProceeds));

        claim!(host.get_transfers().is_empty());
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE);
    }

    #[concordium_test]
    fn test_withdraw_transfer_failed() {
        let mut host = default_host();
        host.state_mut()
            .credit_proceeds(SELLER, PRICE)
            .expect_report("Crediting should pass");
        // The contract cannot cover the payout
        host.set_self_balance(Amount::zero());
        let mut logger = TestLogger::init();

        let result = call_withdraw(&mut host, Address::Account(SELLER), &mut logger);

        claim_eq!(result, Err(CustomContractError::InvokeTransferError));
        claim!(host.get_transfers().is_empty());
        claim!(logger.logs.is_empty());
        // The balance was zeroed before the transfer. Restoring it is left to
        // the chain, which discards every state change of a rejected call.
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_views() {
        let mut host = listed_host();
        host.state_mut()
            .credit_proceeds(SELLER, PRICE)
            .expect_report("Crediting should pass");

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(Address::Account(STRANGER), &bytes);
        claim_eq!(
            get_listing(&ctx, &host),
            Ok(Some(Listing {
                seller: SELLER,
                price: PRICE
            }))
        );

        let bytes = to_bytes(&Token::new(NFT_CONTRACT, TokenIdVec(vec![1])));
        let ctx = receive_ctx(Address::Account(STRANGER), &bytes);
        claim_eq!(get_listing(&ctx, &host), Ok(None));

        let bytes = to_bytes(&SELLER);
        let ctx = receive_ctx(Address::Account(STRANGER), &bytes);
        claim_eq!(get_proceeds(&ctx, &host), Ok(PRICE));

        let bytes = to_bytes(&BUYER);
        let ctx = receive_ctx(Address::Account(STRANGER), &bytes);
        claim_eq!(get_proceeds(&ctx, &host), Ok(Amount::zero()));

        let bytes = to_bytes(&ViewListingsParams { skip: 0, show: 10 });
        let ctx = receive_ctx(Address::Account(STRANGER), &bytes);
        claim_eq!(
            view_listings(&ctx, &host),
            Ok(vec![ListingEntry {
                token: token(),
                listing: Listing {
                    seller: SELLER,
                    price: PRICE
                },
            }])
        );
    }

    #[concordium_test]
    fn test_sale_scenario() {
        let mut host = default_host();
        setup_registry(&mut host, SELLER);
        setup_transfer(&mut host, SELLER, BUYER);
        let mut logger = TestLogger::init();

        let result = call_list(&mut host, Address::Account(SELLER), PRICE, &mut logger);
        claim_eq!(result, Ok(()));

        let result = call_update(&mut host, Address::Account(SELLER), PRICE * 2, &mut logger);
        claim_eq!(result, Ok(()));

        let result = call_buy(&mut host, Address::Account(BUYER), PRICE * 2, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().get_listing(&token()), None);
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE * 2);

        host.set_self_balance(PRICE * 2);
        let result = call_withdraw(&mut host, Address::Account(SELLER), &mut logger);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, PRICE * 2));
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());

        claim_eq!(logger.logs.len(), 4);
    }
}
