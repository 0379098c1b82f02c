//! Checkout state machine.
//!
//! A [`CheckoutSession`] walks one order through
//! `Idle -> Configuring -> Sending -> AwaitingConfirmation` and back. The
//! session owns the staged items and the customer's payment/delivery
//! choices; submitting composes the WhatsApp message, waits out the
//! handoff-preparation delay, and yields a [`Handoff`] with the `wa.me`
//! URI. The order only reaches history once the caller confirms the
//! message was actually sent.

use chrono::{DateTime, Utc};
use mearim_core::{AddressId, DeliveryType, OrderId, OrderStatus, PaymentMethod, Price};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::addresses::AddressBook;
use crate::config::EngineConfig;
use crate::history::{OrderItem, OrderRecord};
use crate::message::{self, OrderSummary};
use crate::storage::StorageError;

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("A checkout is already in progress")]
    AlreadyActive,
    #[error("No items staged for checkout")]
    NothingSelected,
    #[error("No checkout is being configured")]
    NotConfiguring,
    #[error("Delivery orders need a delivery address")]
    MissingDeliveryAddress,
    #[error("No handoff is awaiting confirmation")]
    NotAwaitingConfirmation,
    #[error("Handoff URI: {0}")]
    HandoffUri(#[from] url::ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where the current checkout wants its order delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeliveryLocation {
    /// A saved address from the customer's address book.
    Saved(AddressId),
    /// Free-text address typed for this order only.
    Custom(String),
    /// Nothing chosen yet.
    #[default]
    Unspecified,
}

/// Phase of the checkout state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    /// No checkout in progress.
    #[default]
    Idle,
    /// Items staged, customer picking payment and delivery options.
    Configuring,
    /// Handoff being prepared; no transitions accepted.
    Sending,
    /// `wa.me` URI produced, waiting for the customer to confirm they
    /// sent the message.
    AwaitingConfirmation,
}

/// The product of a successful submission: the composed message and the
/// `wa.me` URI carrying it.
#[derive(Debug, Clone)]
pub struct Handoff {
    pub url: Url,
    pub message: String,
}

impl Handoff {
    /// Builds a `wa.me` handoff for `message`.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when `number` does not form a valid URI.
    pub fn new(number: &str, message: String) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(&format!("https://wa.me/{number}"))?;
        url.query_pairs_mut().append_pair("text", &message);
        Ok(Self { url, message })
    }
}

/// Snapshot of the order taken at submission, committed on confirmation.
#[derive(Debug, Clone)]
struct PendingOrder {
    items: Vec<OrderItem>,
    total: Price,
    payment_method: PaymentMethod,
    delivery_type: DeliveryType,
    address: String,
    customer_name: String,
    customer_phone: String,
}

/// One checkout attempt. Does not outlive the order it stages; confirming
/// or cancelling resets it to [`CheckoutPhase::Idle`].
#[derive(Debug, Default)]
pub struct CheckoutSession {
    phase: CheckoutPhase,
    bulk: bool,
    items: Vec<OrderItem>,
    payment_method: PaymentMethod,
    delivery_type: DeliveryType,
    location: DeliveryLocation,
    pending: Option<PendingOrder>,
}

impl CheckoutSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[must_use]
    pub const fn delivery_type(&self) -> DeliveryType {
        self.delivery_type
    }

    #[must_use]
    pub const fn location(&self) -> &DeliveryLocation {
        &self.location
    }

    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Stages a multi-item order and moves to [`CheckoutPhase::Configuring`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyActive`] outside `Idle` and
    /// [`CheckoutError::NothingSelected`] for an empty item list.
    pub fn begin_bulk(&mut self, items: Vec<OrderItem>) -> Result<(), CheckoutError> {
        self.begin(items, true)
    }

    /// Stages a single-item order. The composed message will omit the
    /// `Total:` block.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyActive`] outside `Idle`.
    pub fn begin_single(&mut self, item: OrderItem) -> Result<(), CheckoutError> {
        self.begin(vec![item], false)
    }

    fn begin(&mut self, items: Vec<OrderItem>, bulk: bool) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::Idle {
            return Err(CheckoutError::AlreadyActive);
        }
        if items.is_empty() {
            return Err(CheckoutError::NothingSelected);
        }
        self.items = items;
        self.bulk = bulk;
        self.payment_method = PaymentMethod::default();
        self.delivery_type = DeliveryType::default();
        self.location = DeliveryLocation::Unspecified;
        self.phase = CheckoutPhase::Configuring;
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub fn set_delivery_type(&mut self, delivery: DeliveryType) {
        self.delivery_type = delivery;
    }

    pub fn set_location(&mut self, location: DeliveryLocation) {
        self.location = location;
    }

    /// Resolves the staged delivery location to address text.
    ///
    /// Pickup orders resolve to the empty string regardless of location.
    /// A saved id that no longer exists in the book also resolves empty,
    /// which [`Self::can_submit`] then rejects for delivery orders.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the address book cannot be read.
    pub fn resolved_address(&self, book: Option<&AddressBook>) -> Result<String, StorageError> {
        if !self.delivery_type.requires_address() {
            return Ok(String::new());
        }
        match &self.location {
            DeliveryLocation::Saved(id) => Ok(book
                .map(|book| book.get(id))
                .transpose()?
                .flatten()
                .map(|address| address.address)
                .unwrap_or_default()),
            DeliveryLocation::Custom(text) => Ok(text.trim().to_owned()),
            DeliveryLocation::Unspecified => Ok(String::new()),
        }
    }

    /// Whether submission would be accepted right now: the session is
    /// configuring, items are staged, and delivery orders have a
    /// non-empty resolved address.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the address book cannot be read.
    pub fn can_submit(&self, book: Option<&AddressBook>) -> Result<bool, StorageError> {
        if self.phase != CheckoutPhase::Configuring || self.items.is_empty() {
            return Ok(false);
        }
        if !self.delivery_type.requires_address() {
            return Ok(true);
        }
        Ok(!self.resolved_address(book)?.is_empty())
    }

    /// Submits the configured order: composes the message, waits out the
    /// handoff-preparation delay, and returns the `wa.me` handoff. The
    /// session moves through `Sending` into `AwaitingConfirmation`.
    ///
    /// Dropping the returned future mid-delay leaves the session in
    /// `Sending`; call [`Self::cancel`] to tear it down.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotConfiguring`] outside `Configuring`,
    /// [`CheckoutError::MissingDeliveryAddress`] for a delivery order
    /// without an address, and storage or URI errors from resolution and
    /// handoff construction.
    pub async fn submit(
        &mut self,
        config: &EngineConfig,
        customer: Option<(&str, &str)>,
        book: Option<&AddressBook>,
    ) -> Result<Handoff, CheckoutError> {
        if self.phase != CheckoutPhase::Configuring {
            return Err(CheckoutError::NotConfiguring);
        }
        let address = self.resolved_address(book)?;
        if self.delivery_type.requires_address() && address.is_empty() {
            return Err(CheckoutError::MissingDeliveryAddress);
        }

        let summary = OrderSummary {
            items: &self.items,
            include_total: self.bulk,
            customer,
            payment_method: self.payment_method,
            delivery_type: self.delivery_type,
            address: &address,
        };
        let text = message::compose_order(&config.merchant_name, &summary);

        self.phase = CheckoutPhase::Sending;
        info!(items = self.items.len(), "preparing order handoff");
        tokio::time::sleep(config.handoff_delay).await;

        let (customer_name, customer_phone) = customer
            .map(|(name, phone)| (name.to_owned(), phone.to_owned()))
            .unwrap_or_default();
        self.pending = Some(PendingOrder {
            items: self.items.clone(),
            total: self.items.iter().map(OrderItem::line_total).sum(),
            payment_method: self.payment_method,
            delivery_type: self.delivery_type,
            address,
            customer_name,
            customer_phone,
        });

        let handoff = Handoff::new(&config.whatsapp_number, text)?;
        self.phase = CheckoutPhase::AwaitingConfirmation;
        Ok(handoff)
    }

    /// Confirms the customer sent the message, finalizing the pending
    /// order as an [`OrderRecord`] and resetting the session to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAwaitingConfirmation`] outside
    /// `AwaitingConfirmation`.
    pub fn confirm_sent(&mut self, now: DateTime<Utc>) -> Result<OrderRecord, CheckoutError> {
        if self.phase != CheckoutPhase::AwaitingConfirmation {
            return Err(CheckoutError::NotAwaitingConfirmation);
        }
        let pending = self
            .pending
            .take()
            .ok_or(CheckoutError::NotAwaitingConfirmation)?;

        let delivery_address = pending
            .delivery_type
            .requires_address()
            .then_some(pending.address);
        let record = OrderRecord {
            id: OrderId::generate(),
            date: now,
            items: pending.items,
            total: pending.total,
            payment_method: pending.payment_method,
            delivery_type: pending.delivery_type,
            delivery_address,
            customer_name: pending.customer_name,
            customer_phone: pending.customer_phone,
            status: OrderStatus::Completed,
        };
        self.reset();
        Ok(record)
    }

    /// Returns from `AwaitingConfirmation` to `Configuring`, keeping the
    /// staged items and choices so the customer can adjust and resend.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAwaitingConfirmation`] outside
    /// `AwaitingConfirmation`.
    pub fn retry(&mut self) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::AwaitingConfirmation {
            return Err(CheckoutError::NotAwaitingConfirmation);
        }
        self.pending = None;
        self.phase = CheckoutPhase::Configuring;
        Ok(())
    }

    /// Abandons the checkout from any phase without committing anything.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = CheckoutPhase::Idle;
        self.bulk = false;
        self.items.clear();
        self.payment_method = PaymentMethod::default();
        self.delivery_type = DeliveryType::default();
        self.location = DeliveryLocation::Unspecified;
        self.pending = None;
    }
}
