//! Checkout handoff
//!
//! The builder hands its state to checkout as a [`CheckoutPayload`] value,
//! both directly (the "navigation-carried" copy) and through the durable
//! [`SessionStore`] so a restarted checkout can still find it. Checkout then
//! prices the snapshot on its own with the same rules as the builder, plus
//! its local delivery fee and promo codes.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use crate::builder::{BuilderSession, QuantityMap, Selection};
use crate::error::StoreError;
use crate::money::Lkr;
use crate::pricing::{self, CartLine};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Store key holding the latest builder snapshot
pub const CHECKOUT_KEY: &str = "gigahz_checkout";
/// Older key some builds were saved under
pub const LEGACY_BUILD_KEY: &str = "gigahz_build";
/// Store key holding the last placed demo order
pub const LAST_ORDER_KEY: &str = "gigahz_last_order";

/// Orders at or above this subtotal ship free
pub const FREE_DELIVERY_THRESHOLD: Lkr = Lkr::from_rupees(250_000);
/// Flat delivery fee below the threshold
pub const DELIVERY_FEE: Lkr = Lkr::from_rupees(1_500);
/// Upper bound of the `GIGAHZ10` promo
pub const GIGAHZ10_CAP: Lkr = Lkr::from_rupees(10_000);

/// Snapshot of a build handed to checkout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutPayload {
    pub selections: Selection,
    #[serde(default, alias = "qtyByKey")]
    pub quantities: QuantityMap,
}

impl CheckoutPayload {
    /// Value copy of the session's selections and quantities
    pub fn snapshot(session: &BuilderSession) -> Self {
        Self {
            selections: session.selection().clone(),
            quantities: *session.quantities(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Snapshot the session for checkout ("Add to Cart").
///
/// The payload is written to `store` under [`CHECKOUT_KEY`] and returned for
/// direct handoff.
pub fn prepare_checkout(
    session: &BuilderSession,
    store: &mut dyn SessionStore,
) -> Result<CheckoutPayload, StoreError> {
    let payload = CheckoutPayload::snapshot(session);
    store.set(CHECKOUT_KEY, serde_json::to_string(&payload)?)?;
    info!(parts = payload.selections.count(), "checkout prepared");
    Ok(payload)
}

/// Where a checkout payload was recovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadOrigin {
    Navigation,
    Stored,
    Legacy,
    Empty,
}

fn read_payload(store: &dyn SessionStore, key: &str) -> Option<CheckoutPayload> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable checkout payload");
            None
        }
    }
}

/// Recover the cart for checkout.
///
/// Precedence: a directly carried payload (persisted again for later
/// reloads), then [`CHECKOUT_KEY`], then [`LEGACY_BUILD_KEY`], then an empty
/// cart.
pub fn resolve_payload(
    carried: Option<CheckoutPayload>,
    store: &mut dyn SessionStore,
) -> (CheckoutPayload, PayloadOrigin) {
    if let Some(payload) = carried {
        match serde_json::to_string(&payload) {
            Ok(json) => {
                if let Err(e) = store.set(CHECKOUT_KEY, json) {
                    warn!(error = %e, "failed to persist carried checkout payload");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode carried checkout payload"),
        }
        return (payload, PayloadOrigin::Navigation);
    }
    if let Some(payload) = read_payload(store, CHECKOUT_KEY) {
        return (payload, PayloadOrigin::Stored);
    }
    if let Some(payload) = read_payload(store, LEGACY_BUILD_KEY) {
        return (payload, PayloadOrigin::Legacy);
    }
    debug!("no checkout payload found, starting with an empty cart");
    (CheckoutPayload::default(), PayloadOrigin::Empty)
}

/// How the customer intends to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Card,
    Bank,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cod => "Cash on delivery",
            Self::Card => "Card",
            Self::Bank => "Bank transfer",
        }
    }
}

/// Contact and delivery details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub province: String,
    pub postal: String,
}

/// An applied promo code and the amount it takes off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promo {
    pub code: String,
    pub amount: Lkr,
}

/// Inline notices shown on the checkout surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutNotice {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("Please enter your full name.")]
    MissingName,
    #[error("Please enter your phone number.")]
    MissingPhone,
    #[error("Please enter your address.")]
    MissingAddress,
    #[error("Please enter your city.")]
    MissingCity,
    #[error("Invalid promo code.")]
    InvalidPromo,
    #[error("Delivery is already free for this order.")]
    DeliveryAlreadyFree,
    #[error("Could not save the order: {0}")]
    SaveFailed(String),
}

/// Successful promo actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoOutcome {
    Applied(Promo),
    Cleared,
}

/// Checkout totals. Discounts and the delivery fee compose additively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Lkr,
    pub build_discount: Lkr,
    pub promo_discount: Lkr,
    pub delivery_fee: Lkr,
    pub payable: Lkr,
}

/// A placed demo order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub id: String,
    /// Unix timestamp in milliseconds
    pub created_at: u64,
    pub customer: CustomerDetails,
    pub payment: PaymentMethod,
    pub promo: Option<Promo>,
    pub totals: CheckoutTotals,
    pub items: Vec<CartLine>,
}

/// The checkout surface's own copy of the cart
#[derive(Debug, Clone)]
pub struct Checkout {
    payload: CheckoutPayload,
    origin: PayloadOrigin,
    promo: Option<Promo>,
    pub customer: CustomerDetails,
    pub payment: PaymentMethod,
}

impl Checkout {
    pub fn new(payload: CheckoutPayload, origin: PayloadOrigin) -> Self {
        Self {
            payload,
            origin,
            promo: None,
            customer: CustomerDetails::default(),
            payment: PaymentMethod::default(),
        }
    }

    /// Open checkout from a carried payload or the store
    pub fn open(carried: Option<CheckoutPayload>, store: &mut dyn SessionStore) -> Self {
        let (payload, origin) = resolve_payload(carried, store);
        info!(?origin, parts = payload.selections.count(), "checkout opened");
        Self::new(payload, origin)
    }

    pub fn payload(&self) -> &CheckoutPayload {
        &self.payload
    }

    pub fn origin(&self) -> PayloadOrigin {
        self.origin
    }

    pub fn promo(&self) -> Option<&Promo> {
        self.promo.as_ref()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        pricing::cart_lines(&self.payload.selections, &self.payload.quantities)
    }

    fn subtotal_and_count(&self) -> (Lkr, usize) {
        let lines = self.lines();
        (pricing::subtotal(&lines), lines.len())
    }

    /// Delivery fee: nothing for an empty cart, free over the threshold
    pub fn delivery_fee(&self) -> Lkr {
        let (subtotal, count) = self.subtotal_and_count();
        if count == 0 || subtotal >= FREE_DELIVERY_THRESHOLD {
            Lkr::ZERO
        } else {
            DELIVERY_FEE
        }
    }

    pub fn totals(&self) -> CheckoutTotals {
        let (subtotal, count) = self.subtotal_and_count();
        let build_discount = pricing::build_discount(subtotal, count);
        let promo_discount = self.promo.as_ref().map(|p| p.amount).unwrap_or_default();
        let delivery_fee = self.delivery_fee();
        CheckoutTotals {
            subtotal,
            build_discount,
            promo_discount,
            delivery_fee,
            payable: (subtotal + delivery_fee)
                .saturating_sub(build_discount)
                .saturating_sub(promo_discount),
        }
    }

    /// Apply (or with an empty code, remove) a promo code
    pub fn apply_promo(&mut self, code: &str) -> Result<PromoOutcome, CheckoutNotice> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            self.promo = None;
            return Ok(PromoOutcome::Cleared);
        }

        let amount = match code.as_str() {
            "GIGAHZ10" => {
                let (subtotal, _) = self.subtotal_and_count();
                subtotal.percent_rounded(3).min(GIGAHZ10_CAP)
            }
            "FREESHIP" => {
                let fee = self.delivery_fee();
                if fee.is_zero() {
                    self.promo = None;
                    return Err(CheckoutNotice::DeliveryAlreadyFree);
                }
                fee
            }
            _ => {
                self.promo = None;
                return Err(CheckoutNotice::InvalidPromo);
            }
        };

        let promo = Promo { code, amount };
        info!(code = %promo.code, amount = %promo.amount, "promo applied");
        self.promo = Some(promo.clone());
        Ok(PromoOutcome::Applied(promo))
    }

    /// First problem blocking order placement, if any
    pub fn validate(&self) -> Result<(), CheckoutNotice> {
        let c = &self.customer;
        if self.payload.is_empty() {
            return Err(CheckoutNotice::EmptyCart);
        }
        if c.full_name.trim().is_empty() {
            return Err(CheckoutNotice::MissingName);
        }
        if c.phone.trim().is_empty() {
            return Err(CheckoutNotice::MissingPhone);
        }
        if c.address1.trim().is_empty() {
            return Err(CheckoutNotice::MissingAddress);
        }
        if c.city.trim().is_empty() {
            return Err(CheckoutNotice::MissingCity);
        }
        Ok(())
    }

    /// Validate and record a demo order under [`LAST_ORDER_KEY`]
    pub fn place_order(
        &self,
        store: &mut dyn SessionStore,
        now_millis: u64,
    ) -> Result<OrderDraft, CheckoutNotice> {
        self.validate()?;

        let order = OrderDraft {
            id: format!("GHZ-{now_millis}"),
            created_at: now_millis,
            customer: self.customer.clone(),
            payment: self.payment,
            promo: self.promo.clone(),
            totals: self.totals(),
            items: self.lines(),
        };

        let json = serde_json::to_string(&order)
            .map_err(|e| CheckoutNotice::SaveFailed(e.to_string()))?;
        store
            .set(LAST_ORDER_KEY, json)
            .map_err(|e| CheckoutNotice::SaveFailed(e.to_string()))?;

        info!(id = %order.id, payable = %order.totals.payable, "order placed");
        Ok(order)
    }
}

/// Milliseconds since the Unix epoch
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::types::{PartCategory, StockStatus};

    fn item(category: PartCategory, rupees: u64) -> CatalogItem {
        CatalogItem {
            id: category.to_string(),
            category,
            brand: String::new(),
            name: category.label().to_string(),
            image: None,
            price: Lkr::from_rupees(rupees),
            stock: StockStatus::InStock,
            socket: None,
            memory_type: None,
            wattage: None,
        }
    }

    fn payload(prices: &[(PartCategory, u64)]) -> CheckoutPayload {
        let mut selections = Selection::new();
        for &(c, p) in prices {
            selections = selections.with_choice(c, item(c, p));
        }
        CheckoutPayload {
            selections,
            quantities: QuantityMap::new(),
        }
    }

    fn filled_customer() -> CustomerDetails {
        CustomerDetails {
            full_name: "Nimal Perera".to_string(),
            phone: "0771234567".to_string(),
            address1: "12 Galle Road".to_string(),
            city: "Colombo".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_delivery_fee_rules() {
        let empty = Checkout::new(CheckoutPayload::default(), PayloadOrigin::Empty);
        assert_eq!(empty.delivery_fee(), Lkr::ZERO);

        let small = Checkout::new(payload(&[(PartCategory::Gpu, 100_000)]), PayloadOrigin::Stored);
        assert_eq!(small.delivery_fee(), DELIVERY_FEE);

        let big = Checkout::new(payload(&[(PartCategory::Gpu, 250_000)]), PayloadOrigin::Stored);
        assert_eq!(big.delivery_fee(), Lkr::ZERO);
    }

    #[test]
    fn test_gigahz10_is_capped() {
        let mut c = Checkout::new(payload(&[(PartCategory::Gpu, 1_000_000)]), PayloadOrigin::Stored);
        let outcome = c.apply_promo(" gigahz10 ").unwrap();
        assert_eq!(
            outcome,
            PromoOutcome::Applied(Promo {
                code: "GIGAHZ10".to_string(),
                amount: GIGAHZ10_CAP
            })
        );

        let mut c = Checkout::new(payload(&[(PartCategory::Gpu, 100_000)]), PayloadOrigin::Stored);
        c.apply_promo("GIGAHZ10").unwrap();
        assert_eq!(c.promo().unwrap().amount, Lkr::from_rupees(3_000));
    }

    #[test]
    fn test_freeship_refused_when_delivery_free() {
        let mut c = Checkout::new(payload(&[(PartCategory::Gpu, 300_000)]), PayloadOrigin::Stored);
        assert_eq!(c.apply_promo("FREESHIP"), Err(CheckoutNotice::DeliveryAlreadyFree));
        assert!(c.promo().is_none());
    }

    #[test]
    fn test_freeship_cancels_delivery() {
        let mut c = Checkout::new(payload(&[(PartCategory::Gpu, 100_000)]), PayloadOrigin::Stored);
        c.apply_promo("FREESHIP").unwrap();
        let t = c.totals();
        assert_eq!(t.delivery_fee, DELIVERY_FEE);
        assert_eq!(t.promo_discount, DELIVERY_FEE);
        assert_eq!(t.payable, Lkr::from_rupees(100_000));
    }

    #[test]
    fn test_invalid_and_cleared_promo() {
        let mut c = Checkout::new(payload(&[(PartCategory::Gpu, 100_000)]), PayloadOrigin::Stored);
        c.apply_promo("GIGAHZ10").unwrap();
        assert_eq!(c.apply_promo("BOGUS"), Err(CheckoutNotice::InvalidPromo));
        assert!(c.promo().is_none());
        assert_eq!(c.apply_promo("  "), Ok(PromoOutcome::Cleared));
    }

    #[test]
    fn test_validation_order() {
        let mut c = Checkout::new(CheckoutPayload::default(), PayloadOrigin::Empty);
        assert_eq!(c.validate(), Err(CheckoutNotice::EmptyCart));

        c = Checkout::new(payload(&[(PartCategory::Cpu, 10)]), PayloadOrigin::Stored);
        assert_eq!(c.validate(), Err(CheckoutNotice::MissingName));
        c.customer.full_name = "A".to_string();
        assert_eq!(c.validate(), Err(CheckoutNotice::MissingPhone));
        c.customer.phone = "1".to_string();
        assert_eq!(c.validate(), Err(CheckoutNotice::MissingAddress));
        c.customer.address1 = "x".to_string();
        assert_eq!(c.validate(), Err(CheckoutNotice::MissingCity));
        c.customer.city = "y".to_string();
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn test_place_order_stores_draft() {
        let mut store = MemorySessionStore::new();
        let mut c = Checkout::new(
            payload(&[
                (PartCategory::Cpu, 100_000),
                (PartCategory::Motherboard, 60_000),
                (PartCategory::Ram, 40_000),
            ]),
            PayloadOrigin::Navigation,
        );
        c.customer = filled_customer();
        c.payment = PaymentMethod::Card;

        let order = c.place_order(&mut store, 1_700_000_000_000).unwrap();
        assert_eq!(order.id, "GHZ-1700000000000");
        assert_eq!(order.items.len(), 3);
        assert_eq!(order.totals.build_discount, Lkr::from_rupees(2_000));
        assert_eq!(order.totals.delivery_fee, DELIVERY_FEE);
        assert_eq!(order.totals.payable, Lkr::from_rupees(199_500));

        let saved: OrderDraft =
            serde_json::from_str(&store.get(LAST_ORDER_KEY).unwrap()).unwrap();
        assert_eq!(saved, order);
    }

    #[test]
    fn test_payload_accepts_qty_by_key_alias() {
        let json = r#"{"selections":{"cpu":null},"qtyByKey":{"ram":3}}"#;
        let p: CheckoutPayload = serde_json::from_str(json).unwrap();
        assert_eq!(p.quantities.get(PartCategory::Ram), 3);
        assert!(p.is_empty());
    }
}
