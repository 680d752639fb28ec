use super::*;

/// An untagged event of a token being put up for sale or repriced.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ItemListedEvent {
    /// Account selling the token.
    pub seller: AccountAddress,
    /// The listed token.
    pub token: Token,
    /// Asking price.
    pub price: Amount,
}

/// An untagged event of a listing being withdrawn by its owner.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ItemCanceledEvent {
    pub seller: AccountAddress,
    pub token: Token,
}

/// An untagged event of a listed token being purchased.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ItemBoughtEvent {
    /// Account receiving the token.
    pub buyer: AccountAddress,
    /// The purchased token.
    pub token: Token,
    /// Amount paid, now credited to the seller.
    pub price: Amount,
}

#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ProceedsWithdrawnEvent {
    pub seller: AccountAddress,
    pub amount: Amount,
}

/// Tagged marketplace event to be serialized for the event log.
#[derive(Debug, PartialEq, Eq)]
pub enum MarketplaceEvent {
    /// Listing created or repriced
    ItemListed(ItemListedEvent),
    /// Listing canceled
    ItemCanceled(ItemCanceledEvent),
    /// Token bought
    ItemBought(ItemBoughtEvent),
    /// Proceeds paid out
    ProceedsWithdrawn(ProceedsWithdrawnEvent),
}

impl Serial for MarketplaceEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            MarketplaceEvent::ItemListed(event) => {
                out.write_u8(ITEM_LISTED_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::ItemCanceled(event) => {
                out.write_u8(ITEM_CANCELED_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::ItemBought(event) => {
                out.write_u8(ITEM_BOUGHT_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::ProceedsWithdrawn(event) => {
                out.write_u8(PROCEEDS_WITHDRAWN_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for MarketplaceEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            ITEM_LISTED_TAG => ItemListedEvent::deserial(source).map(MarketplaceEvent::ItemListed),
            ITEM_CANCELED_TAG => {
                ItemCanceledEvent::deserial(source).map(MarketplaceEvent::ItemCanceled)
            }
            ITEM_BOUGHT_TAG => ItemBoughtEvent::deserial(source).map(MarketplaceEvent::ItemBought),
            PROCEEDS_WITHDRAWN_TAG => {
                ProceedsWithdrawnEvent::deserial(source).map(MarketplaceEvent::ProceedsWithdrawn)
            }
            _ => Err(ParseError::default()),
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const SELLER: AccountAddress = AccountAddress([1; 32]);

    #[concordium_test]
    fn test_event_tags() {
        let event = MarketplaceEvent::ProceedsWithdrawn(ProceedsWithdrawnEvent {
            seller: SELLER,
            amount: Amount::from_ccd(3),
        });
        let bytes = to_bytes(&event);
        claim_eq!(bytes[0], PROCEEDS_WITHDRAWN_TAG);

        let parsed = from_bytes::<MarketplaceEvent>(&bytes).expect_report("Event should parse");
        claim_eq!(parsed, event);

        claim!(from_bytes::<MarketplaceEvent>(&[0]).is_err());
    }
}
