use super::*;

// Functions for creating and updating the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new state with no listings and no proceeds.
    pub fn empty(state_builder: &mut StateBuilder<S>) -> Self {
        Self {
            listings: state_builder.new_map(),
            proceeds: state_builder.new_map(),
        }
    }

    pub fn get_listing(&self, token: &Token) -> Option<Listing> {
        self.listings.get(token).map(|listing| *listing)
    }

    pub fn is_listed(&self, token: &Token) -> bool {
        self.listings.get(token).is_some()
    }

    /// Returns the listing of `token` or fails with `NotListed`.
    pub fn active_listing(&self, token: &Token) -> ContractResult<Listing> {
        self.get_listing(token).ok_or(CustomContractError::NotListed)
    }

    /// Add/overwrite the listing of `token`.
    pub fn list(&mut self, token: &Token, seller: AccountAddress, price: Amount) {
        self.listings.insert(token.clone(), Listing { seller, price });
    }

    /// Remove a listing and fails with NotListed, if token is not listed.
    /// Returns the removed listing if successful.
    pub fn unlist(&mut self, token: &Token) -> ContractResult<Listing> {
        self.listings
            .remove_and_get(token)
            .ok_or(CustomContractError::NotListed)
    }

    /// Books a purchase of `listing`: the seller is credited and the listing
    /// is removed. Must run before the token transfer is requested, so that
    /// a re-entrant purchase of the same token finds nothing to buy.
    pub fn settle_purchase(&mut self, token: &Token, listing: Listing) -> ContractResult<()> {
        self.credit_proceeds(listing.seller, listing.price)?;
        self.listings.remove(token);

        Ok(())
    }

    pub fn proceeds_of(&self, seller: &AccountAddress) -> Amount {
        self.proceeds
            .get(seller)
            .map(|balance| *balance)
            .unwrap_or_else(Amount::zero)
    }

    /// Adds `amount` to the proceeds of `seller`. Fails with ProceedsOverflow
    /// if the balance would not fit.
    pub fn credit_proceeds(
        &mut self,
        seller: AccountAddress,
        amount: Amount,
    ) -> ContractResult<()> {
        let balance = self
            .proceeds_of(&seller)
            .micro_ccd
            .checked_add(amount.micro_ccd)
            .map(Amount::from_micro_ccd)
            .ok_or(CustomContractError::ProceedsOverflow)?;
        self.proceeds.insert(seller, balance);

        Ok(())
    }

    /// Zeroes the proceeds of `seller` and returns the previous balance.
    /// Fails with NoProceeds if there is nothing to withdraw.
    pub fn take_proceeds(&mut self, seller: &AccountAddress) -> ContractResult<Amount> {
        let balance = self.proceeds_of(seller);
        ensure!(balance > Amount::zero(), CustomContractError::NoProceeds);

        self.proceeds.insert(*seller, Amount::zero());

        Ok(balance)
    }

    pub fn view_listings(&self, skip: u32, show: u32) -> Vec<ListingEntry> {
        self.listings
            .iter()
            .skip(skip as usize)
            .take(show as usize)
            .map(|(token, listing)| ListingEntry {
                token: Token::clone(&token),
                listing: *listing,
            })
            .collect()
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const OTHER_SELLER: AccountAddress = AccountAddress([2; 32]);

    const PRICE: Amount = Amount::from_ccd(1);

    fn token(id: u8) -> Token {
        Token::new(NFT_CONTRACT, TokenIdVec(vec![id]))
    }

    fn empty_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::empty(&mut state_builder)
    }

    #[concordium_test]
    fn test_list_and_unlist() {
        let mut state = empty_state();

        claim_eq!(state.get_listing(&token(0)), None);
        claim_eq!(
            state.active_listing(&token(0)),
            Err(CustomContractError::NotListed)
        );

        state.list(&token(0), SELLER, PRICE);
        claim!(state.is_listed(&token(0)));
        claim!(!state.is_listed(&token(1)));
        claim_eq!(
            state.get_listing(&token(0)),
            Some(Listing {
                seller: SELLER,
                price: PRICE
            })
        );

        claim_eq!(
            state.unlist(&token(0)),
            Ok(Listing {
                seller: SELLER,
                price: PRICE
            })
        );
        claim_eq!(state.get_listing(&token(0)), None);
        claim_eq!(state.unlist(&token(0)), Err(CustomContractError::NotListed));
    }

    #[concordium_test]
    fn test_settle_purchase() {
        let mut state = empty_state();
        state.list(&token(0), SELLER, PRICE);
        state.list(&token(1), SELLER, PRICE * 2);

        let listing = state
            .active_listing(&token(0))
            .expect_report("Token 0 should be listed");
        claim_eq!(state.settle_purchase(&token(0), listing), Ok(()));

        claim_eq!(state.get_listing(&token(0)), None);
        claim_eq!(state.proceeds_of(&SELLER), PRICE);

        // Proceeds accumulate across sales
        let listing = state
            .active_listing(&token(1))
            .expect_report("Token 1 should be listed");
        claim_eq!(state.settle_purchase(&token(1), listing), Ok(()));
        claim_eq!(state.proceeds_of(&SELLER), PRICE * 3);
        claim_eq!(state.proceeds_of(&OTHER_SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_take_proceeds() {
        let mut state = empty_state();

        claim_eq!(
            state.take_proceeds(&SELLER),
            Err(CustomContractError::NoProceeds)
        );

        claim_eq!(state.credit_proceeds(SELLER, PRICE), Ok(()));
        claim_eq!(state.credit_proceeds(OTHER_SELLER, PRICE * 5), Ok(()));

        claim_eq!(state.take_proceeds(&SELLER), Ok(PRICE));
        claim_eq!(state.proceeds_of(&SELLER), Amount::zero());
        // The balance is already zero, so a nested withdrawal gets nothing
        claim_eq!(
            state.take_proceeds(&SELLER),
            Err(CustomContractError::NoProceeds)
        );

        // Other sellers are untouched
        claim_eq!(state.proceeds_of(&OTHER_SELLER), PRICE * 5);
    }

    #[concordium_test]
    fn test_credit_proceeds_overflow() {
        let mut state = empty_state();
        let max = Amount::from_micro_ccd(u64::MAX);
        claim_eq!(state.credit_proceeds(SELLER, max), Ok(()));

        claim_eq!(
            state.credit_proceeds(SELLER, Amount::from_micro_ccd(1)),
            Err(CustomContractError::ProceedsOverflow)
        );
        claim_eq!(state.proceeds_of(&SELLER), max);

        // A sale that cannot be credited keeps its listing
        state.list(&token(0), SELLER, PRICE);
        let listing = state
            .active_listing(&token(0))
            .expect_report("Token 0 should be listed");
        claim_eq!(
            state.settle_purchase(&token(0), listing),
            Err(CustomContractError::ProceedsOverflow)
        );
        claim!(state.is_listed(&token(0)));
        claim_eq!(state.proceeds_of(&SELLER), max);
    }

    #[concordium_test]
    fn test_view_listings() {
        let mut state = empty_state();
        for id in 0..5u8 {
            state.list(&token(id), SELLER, PRICE * (id as u64 + 1));
        }

        let mut seen = Vec::new();
        let mut skip = 0;
        loop {
            let page = state.view_listings(skip, 2);
            let page_len = page.len() as u32;
            seen.extend(page);

            if page_len != 2 {
                break;
            }
            skip += page_len;
        }

        claim_eq!(seen.len(), 5);
        for id in 0..5u8 {
            claim!(seen.contains(&ListingEntry {
                token: token(id),
                listing: Listing {
                    seller: SELLER,
                    price: PRICE * (id as u64 + 1),
                },
            }));
        }

        claim!(state.view_listings(5, 10).is_empty());
    }
}
