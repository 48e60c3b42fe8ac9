//! Marketplace contract interface.
//!
//! The energy marketplace lives in an external smart contract; this crate is
//! the typed boundary to it: entities, function selectors, calldata encoding,
//! return-data decoding, and base-unit arithmetic. The dashboard never holds
//! listing state of its own — it only encodes calls and decodes results.
//!
//! The surface is split in two. [`declared`] covers the functions and events
//! present in the contract's published interface description. [`extended`]
//! covers calls the dashboard makes that the published description does not
//! list (`getListing`, `isListingActive`, `isVerifiedSeller`,
//! `getPendingWithdrawal`, `withdraw`, and the wider `listEnergy` /
//! `buyEnergy` shapes); their signatures are taken from observed behavior,
//! not from a published ABI, so they are kept apart and stubbed in tests
//! rather than merged into the declared set.

use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, H256, U256};
use ethers_core::utils;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 4-byte function selector.
pub type Selector = [u8; 4];

#[derive(Debug, Error)]
pub enum MarketAbiError {
    #[error("abi decode failed: {0}")]
    Decode(#[from] abi::Error),
    #[error("unexpected return shape for {0}")]
    ReturnShape(&'static str),
    #[error("invalid hex data: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid rpc quantity: {0:?}")]
    Quantity(String),
    #[error("invalid decimal amount: {0}")]
    Amount(String),
    #[error("price * amount overflows 256 bits")]
    CostOverflow,
}

// ── Entities ──

/// Listing tuple as returned by the declared `listings(uint256)` getter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub amount: U256,
    pub price: U256,
    pub seller: Address,
    pub buyer: Address,
    pub sold: bool,
}

/// Listing detail as returned by the extended `getListing(uint256)` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub amount_available: U256,
    pub price_per_unit: U256,
    pub seller: Address,
    pub expiry: U256,
    pub active: bool,
}

// ── Call encoding ──

fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = utils::id(signature).to_vec();
    data.extend(abi::encode(args));
    data
}

/// Functions and events from the contract's published interface description.
pub mod declared {
    use super::*;

    pub fn listing_count() -> Vec<u8> {
        encode_call("listingCount()", &[])
    }

    pub fn listings(index: U256) -> Vec<u8> {
        encode_call("listings(uint256)", &[Token::Uint(index)])
    }

    /// `buyEnergy(uint256)` — payable, as declared.
    pub fn buy_energy(listing_id: U256) -> Vec<u8> {
        encode_call("buyEnergy(uint256)", &[Token::Uint(listing_id)])
    }

    pub fn cancel_listing(listing_id: U256) -> Vec<u8> {
        encode_call("cancelListing(uint256)", &[Token::Uint(listing_id)])
    }

    /// `listEnergy(uint256,uint256)` — amount, price — as declared.
    pub fn list_energy(amount: U256, price: U256) -> Vec<u8> {
        encode_call(
            "listEnergy(uint256,uint256)",
            &[Token::Uint(amount), Token::Uint(price)],
        )
    }

    pub fn decode_listing(data: &[u8]) -> Result<Listing, MarketAbiError> {
        let tokens = abi::decode(
            &[
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Address,
                ParamType::Address,
                ParamType::Bool,
            ],
            data,
        )?;
        match tokens.as_slice() {
            [
                Token::Uint(amount),
                Token::Uint(price),
                Token::Address(seller),
                Token::Address(buyer),
                Token::Bool(sold),
            ] => Ok(Listing {
                amount: *amount,
                price: *price,
                seller: *seller,
                buyer: *buyer,
                sold: *sold,
            }),
            _ => Err(MarketAbiError::ReturnShape("listings(uint256)")),
        }
    }

    /// Event topic hashes (topic0) for the declared events.
    pub mod events {
        use ethers_core::types::H256;
        use ethers_core::utils;

        pub fn energy_listed() -> H256 {
            H256(utils::keccak256("EnergyListed(uint256,uint256,uint256,address)"))
        }

        pub fn energy_purchased() -> H256 {
            H256(utils::keccak256("EnergyPurchased(uint256,address,uint256,uint256)"))
        }

        pub fn listing_cancelled() -> H256 {
            H256(utils::keccak256("ListingCancelled(uint256,address)"))
        }
    }
}

/// Calls invoked against the contract that its published interface does not
/// declare. Signatures reconstructed from observed call sites.
pub mod extended {
    use super::*;

    pub fn get_pending_withdrawal(account: Address) -> Vec<u8> {
        encode_call("getPendingWithdrawal(address)", &[Token::Address(account)])
    }

    pub fn withdraw() -> Vec<u8> {
        encode_call("withdraw()", &[])
    }

    pub fn is_verified_seller(account: Address) -> Vec<u8> {
        encode_call("isVerifiedSeller(address)", &[Token::Address(account)])
    }

    pub fn get_listing(listing_id: U256) -> Vec<u8> {
        encode_call("getListing(uint256)", &[Token::Uint(listing_id)])
    }

    pub fn is_listing_active(listing_id: U256) -> Vec<u8> {
        encode_call("isListingActive(uint256)", &[Token::Uint(listing_id)])
    }

    /// `listEnergy(uint256,uint256,uint256)` — amount, price, expiry — the
    /// three-argument shape the listing form submits.
    pub fn list_energy(amount: U256, price: U256, expiry: U256) -> Vec<u8> {
        encode_call(
            "listEnergy(uint256,uint256,uint256)",
            &[Token::Uint(amount), Token::Uint(price), Token::Uint(expiry)],
        )
    }

    /// `buyEnergy(uint256,uint256)` — listing id, amount — payable, the
    /// two-argument shape the buy action submits.
    pub fn buy_energy(listing_id: U256, amount: U256) -> Vec<u8> {
        encode_call(
            "buyEnergy(uint256,uint256)",
            &[Token::Uint(listing_id), Token::Uint(amount)],
        )
    }

    pub fn decode_listing_detail(data: &[u8]) -> Result<ListingDetail, MarketAbiError> {
        let tokens = abi::decode(
            &[
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Bool,
            ],
            data,
        )?;
        match tokens.as_slice() {
            [
                Token::Uint(amount_available),
                Token::Uint(price_per_unit),
                Token::Address(seller),
                Token::Uint(expiry),
                Token::Bool(active),
            ] => Ok(ListingDetail {
                amount_available: *amount_available,
                price_per_unit: *price_per_unit,
                seller: *seller,
                expiry: *expiry,
                active: *active,
            }),
            _ => Err(MarketAbiError::ReturnShape("getListing(uint256)")),
        }
    }
}

// ── Return-data decoding ──

pub fn decode_uint(data: &[u8]) -> Result<U256, MarketAbiError> {
    let tokens = abi::decode(&[ParamType::Uint(256)], data)?;
    match tokens.as_slice() {
        [Token::Uint(v)] => Ok(*v),
        _ => Err(MarketAbiError::ReturnShape("uint256")),
    }
}

pub fn decode_bool(data: &[u8]) -> Result<bool, MarketAbiError> {
    let tokens = abi::decode(&[ParamType::Bool], data)?;
    match tokens.as_slice() {
        [Token::Bool(v)] => Ok(*v),
        _ => Err(MarketAbiError::ReturnShape("bool")),
    }
}

// ── Hex / rpc quantity helpers ──

/// `0x`-prefixed lowercase hex for calldata.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, MarketAbiError> {
    Ok(hex::decode(s.trim().trim_start_matches("0x"))?)
}

/// Parse a JSON-RPC quantity (`0x`-prefixed hex integer).
pub fn parse_quantity(s: &str) -> Result<U256, MarketAbiError> {
    let digits = s.trim().trim_start_matches("0x");
    if digits.is_empty() {
        return Err(MarketAbiError::Quantity(s.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| MarketAbiError::Quantity(s.to_string()))
}

pub fn to_quantity(v: U256) -> String {
    format!("{v:#x}")
}

// ── Base-unit conversion and cost arithmetic ──

/// Convert a decimal display-unit amount (e.g. "0.05" ETH) to base units.
pub fn to_base_units(display: &str) -> Result<U256, MarketAbiError> {
    utils::parse_ether(display)
        .map_err(|e| MarketAbiError::Amount(format!("{display}: {e}")))
}

/// Convert a base-unit amount to a display-unit decimal string, with the
/// trailing fractional zeros trimmed.
pub fn from_base_units(amount: U256) -> String {
    let s = match utils::format_units(amount, "ether") {
        Ok(s) => s,
        Err(_) => return amount.to_string(),
    };
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Total purchase cost in base units. Wide multiplication, no rounding;
/// overflow is an error, never a wrap.
pub fn total_cost(price_per_unit: U256, amount: U256) -> Result<U256, MarketAbiError> {
    price_per_unit
        .checked_mul(amount)
        .ok_or(MarketAbiError::CostOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from([byte; 20])
    }

    #[test]
    fn buy_calldata_layout() {
        let data = extended::buy_energy(U256::from(7u64), U256::from(3u64));
        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[..4], &utils::id("buyEnergy(uint256,uint256)"));
        // big-endian words: listing id then amount
        assert_eq!(data[35], 7);
        assert_eq!(data[67], 3);
    }

    #[test]
    fn view_calldata_is_selector_only_when_nullary() {
        assert_eq!(declared::listing_count().len(), 4);
        assert_eq!(extended::withdraw().len(), 4);
        assert_ne!(declared::listing_count(), extended::withdraw());
    }

    #[test]
    fn declared_and_extended_buy_have_distinct_selectors() {
        let one_arg = declared::buy_energy(U256::one());
        let two_arg = extended::buy_energy(U256::one(), U256::one());
        assert_ne!(one_arg[..4], two_arg[..4]);
    }

    #[test]
    fn total_cost_is_exact_product() {
        // 0.05 ETH/kWh * 12 kWh = 0.6 ETH, computed in wei with no rounding
        let price = to_base_units("0.05").unwrap();
        let cost = total_cost(price, U256::from(12u64)).unwrap();
        assert_eq!(cost, to_base_units("0.6").unwrap());
    }

    #[test]
    fn total_cost_overflow_is_an_error() {
        let err = total_cost(U256::MAX, U256::from(2u64)).unwrap_err();
        assert!(matches!(err, MarketAbiError::CostOverflow));
    }

    #[test]
    fn base_unit_conversion() {
        assert_eq!(to_base_units("1").unwrap(), U256::exp10(18));
        assert_eq!(to_base_units("0.05").unwrap(), U256::exp10(16) * 5);
        assert!(to_base_units("not-a-number").is_err());

        assert_eq!(from_base_units(U256::exp10(18)), "1");
        assert_eq!(from_base_units(U256::exp10(18) * 3 / 2), "1.5");
        assert_eq!(from_base_units(U256::zero()), "0");
    }

    #[test]
    fn decode_listing_tuple() {
        let encoded = abi::encode(&[
            Token::Uint(U256::from(250u64)),
            Token::Uint(U256::exp10(16)),
            Token::Address(addr(0xaa)),
            Token::Address(addr(0x00)),
            Token::Bool(false),
        ]);
        let listing = declared::decode_listing(&encoded).unwrap();
        assert_eq!(listing.amount, U256::from(250u64));
        assert_eq!(listing.price, U256::exp10(16));
        assert_eq!(listing.seller, addr(0xaa));
        assert!(!listing.sold);
    }

    #[test]
    fn decode_listing_detail_tuple() {
        let encoded = abi::encode(&[
            Token::Uint(U256::from(40u64)),
            Token::Uint(U256::exp10(17)),
            Token::Address(addr(0x11)),
            Token::Uint(U256::from(1_900_000_000u64)),
            Token::Bool(true),
        ]);
        let detail = extended::decode_listing_detail(&encoded).unwrap();
        assert_eq!(detail.amount_available, U256::from(40u64));
        assert_eq!(detail.price_per_unit, U256::exp10(17));
        assert!(detail.active);
    }

    #[test]
    fn decode_scalar_returns() {
        let word = abi::encode(&[Token::Uint(U256::from(9u64))]);
        assert_eq!(decode_uint(&word).unwrap(), U256::from(9u64));

        let flag = abi::encode(&[Token::Bool(true)]);
        assert!(decode_bool(&flag).unwrap());

        assert!(decode_uint(&[0u8; 3]).is_err());
    }

    #[test]
    fn rpc_quantities() {
        assert_eq!(parse_quantity("0x2a").unwrap(), U256::from(42u64));
        assert_eq!(parse_quantity("0x0").unwrap(), U256::zero());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("").is_err());
        assert_eq!(to_quantity(U256::from(255u64)), "0xff");
    }

    #[test]
    fn hex_helpers_roundtrip_prefix() {
        let data = vec![0xde, 0xad, 0xbe, 0xef];
        let s = to_hex(&data);
        assert_eq!(s, "0xdeadbeef");
        assert_eq!(from_hex(&s).unwrap(), data);
        assert_eq!(from_hex("deadbeef").unwrap(), data);
    }

    #[test]
    fn event_topics_are_distinct() {
        let topics = [
            declared::events::energy_listed(),
            declared::events::energy_purchased(),
            declared::events::listing_cancelled(),
        ];
        assert_ne!(topics[0], topics[1]);
        assert_ne!(topics[1], topics[2]);
        assert_ne!(topics[0], topics[2]);
    }
}
