//! The order session facade.
//!
//! [`OrderSession`] wires the catalog, the customer profile, the
//! phone-scoped address book and order history, the selection set, the
//! recurring-order advisor, and the checkout state machine into one
//! entry point. Callers hold exactly one session per storefront instance
//! and drive every operation through it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mearim_core::{DeliveryType, OrderId, PaymentMethod, Phone, ProductId};
use tracing::info;

use crate::addresses::AddressBook;
use crate::catalog::{Product, ProductCatalog};
use crate::checkout::{
    CheckoutError, CheckoutPhase, CheckoutSession, DeliveryLocation, Handoff,
};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::history::{OrderHistoryStore, OrderItem, OrderRecord};
use crate::message;
use crate::profile::{CustomerProfile, CustomerProfileStore, ProfileError};
use crate::recurring::RecurringOrderAdvisor;
use crate::selection::SelectionSet;
use crate::storage::{Storage, StorageBackend};

/// Per-customer stores, rebuilt whenever the active profile changes.
struct CustomerScope {
    profile: CustomerProfile,
    addresses: AddressBook,
    history: OrderHistoryStore,
}

/// One storefront session: catalog, active customer, staged selection,
/// and the current checkout attempt.
pub struct OrderSession {
    config: EngineConfig,
    storage: Storage,
    catalog: ProductCatalog,
    profiles: CustomerProfileStore,
    selection: SelectionSet,
    checkout: CheckoutSession,
    advisor: RecurringOrderAdvisor,
    scope: Option<CustomerScope>,
}

impl OrderSession {
    /// Opens a session over `backend` with the bundled catalog, restoring
    /// the previously saved customer profile if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the persisted profile or legacy
    /// address cannot be read.
    pub fn new(backend: Arc<dyn StorageBackend>, config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_catalog(backend, config, ProductCatalog::bundled())
    }

    /// Opens a session with an explicit catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the persisted profile or legacy
    /// address cannot be read.
    pub fn with_catalog(
        backend: Arc<dyn StorageBackend>,
        config: EngineConfig,
        catalog: ProductCatalog,
    ) -> Result<Self, EngineError> {
        let storage = Storage::new(backend, config.namespace.clone());
        let profiles = CustomerProfileStore::new(storage.clone());
        let mut session = Self {
            config,
            storage,
            catalog,
            profiles,
            selection: SelectionSet::new(),
            checkout: CheckoutSession::new(),
            advisor: RecurringOrderAdvisor::new(),
            scope: None,
        };
        if let Some(profile) = session.profiles.load()? {
            session.activate(profile)?;
        }
        Ok(session)
    }

    fn activate(&mut self, profile: CustomerProfile) -> Result<(), EngineError> {
        let addresses = AddressBook::new(self.storage.clone(), profile.phone.clone());
        addresses.migrate_legacy(&profile)?;
        let history = OrderHistoryStore::new(self.storage.clone(), profile.phone.clone());
        self.scope = Some(CustomerScope {
            profile,
            addresses,
            history,
        });
        Ok(())
    }

    // ========================================================================
    // Catalog and selection
    // ========================================================================

    #[must_use]
    pub const fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Includes or excludes a product from the staged selection.
    pub fn toggle_selection(&mut self, id: &ProductId, included: bool) {
        self.selection.toggle(id, included);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Resolves the current selection against the catalog, in selection
    /// order.
    #[must_use]
    pub fn selected_products(&self) -> Vec<&Product> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    // ========================================================================
    // Customer profile
    // ========================================================================

    #[must_use]
    pub fn profile(&self) -> Option<&CustomerProfile> {
        self.scope.as_ref().map(|scope| &scope.profile)
    }

    /// Registers a callback invoked after every profile save or clear.
    pub fn subscribe_profile(
        &self,
        subscriber: impl Fn(Option<&CustomerProfile>) + Send + Sync + 'static,
    ) {
        self.profiles.subscribe(subscriber);
    }

    /// Saves the customer profile and rescopes the address book and
    /// order history to its phone.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingName`] for a blank name and
    /// [`ProfileError::Phone`] for an unusable phone number.
    pub fn save_profile(
        &mut self,
        name: &str,
        phone: &str,
        address: &str,
    ) -> Result<(), EngineError> {
        let phone = Phone::parse(phone).map_err(ProfileError::Phone)?;
        let profile = CustomerProfile {
            name: name.trim().to_owned(),
            phone,
            address: address.trim().to_owned(),
        };
        self.profiles.save(&profile)?;
        self.activate(profile)
    }

    /// Clears the active profile along with its saved addresses and
    /// order history, and abandons any checkout in progress.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] when the persistent layer fails.
    pub fn clear_profile(&mut self) -> Result<(), EngineError> {
        self.profiles.clear()?;
        self.scope = None;
        self.checkout.cancel();
        self.advisor = RecurringOrderAdvisor::new();
        Ok(())
    }

    /// The active customer's address book.
    #[must_use]
    pub fn addresses(&self) -> Option<&AddressBook> {
        self.scope.as_ref().map(|scope| &scope.addresses)
    }

    // ========================================================================
    // Order history and recurring orders
    // ========================================================================

    /// The active customer's past orders, most recent first. Empty when
    /// no customer is identified.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] when the persistent layer fails.
    pub fn history(&self) -> Result<Vec<OrderRecord>, EngineError> {
        match &self.scope {
            Some(scope) => Ok(scope.history.list()?),
            None => Ok(Vec::new()),
        }
    }

    /// The most recent order, when it is old enough to suggest repeating
    /// and the suggestion has not been dismissed or accepted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] when the persistent layer fails.
    pub fn suggestion(&self, now: DateTime<Utc>) -> Result<Option<OrderRecord>, EngineError> {
        let Some(scope) = &self.scope else {
            return Ok(None);
        };
        let records = scope.history.list()?;
        Ok(self.advisor.suggest(&records, now).cloned())
    }

    /// Accepts the current suggestion, adding its product ids to the
    /// selection. Returns whether a suggestion was available.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] when the persistent layer fails.
    pub fn accept_suggestion(&mut self, now: DateTime<Utc>) -> Result<bool, EngineError> {
        let Some(scope) = &self.scope else {
            return Ok(false);
        };
        let records = scope.history.list()?;
        match self.advisor.accept(&records, now) {
            Some(ids) => {
                self.selection.extend(ids);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Dismisses the recurring-order suggestion for the rest of this
    /// session.
    pub fn dismiss_suggestion(&mut self) {
        self.advisor.dismiss();
    }

    /// Builds an immediate handoff repeating a past order, without going
    /// through the checkout state machine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveCustomer`] without a profile and
    /// storage or URI errors otherwise. An unknown order id yields
    /// `Ok(None)`.
    pub fn reorder(&self, order_id: &OrderId) -> Result<Option<Handoff>, EngineError> {
        let scope = self.scope.as_ref().ok_or(EngineError::NoActiveCustomer)?;
        let Some(record) = scope
            .history
            .list()?
            .into_iter()
            .find(|record| &record.id == order_id)
        else {
            return Ok(None);
        };
        let text = message::compose_reorder(&self.config.merchant_name, &record);
        let handoff =
            Handoff::new(&self.config.whatsapp_number, text).map_err(CheckoutError::from)?;
        Ok(Some(handoff))
    }

    // ========================================================================
    // Checkout
    // ========================================================================

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutSession {
        &self.checkout
    }

    /// Stages the current selection as a bulk order and opens checkout,
    /// pre-selecting the customer's default address when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownProduct`] for a selected id missing
    /// from the catalog and [`CheckoutError`] for state violations.
    pub fn begin_checkout(&mut self) -> Result<(), EngineError> {
        let items = self.staged_items(self.selection.ids().to_vec())?;
        self.checkout.begin_bulk(items)?;
        self.preselect_default_address()?;
        Ok(())
    }

    /// Opens checkout for a single product, bypassing the selection set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownProduct`] for an id missing from the
    /// catalog and [`CheckoutError`] for state violations.
    pub fn buy_single(&mut self, id: &ProductId) -> Result<(), EngineError> {
        let mut items = self.staged_items(vec![id.clone()])?;
        let item = items.pop().ok_or(CheckoutError::NothingSelected)?;
        self.checkout.begin_single(item)?;
        self.preselect_default_address()?;
        Ok(())
    }

    fn staged_items(&self, ids: Vec<ProductId>) -> Result<Vec<OrderItem>, EngineError> {
        ids.into_iter()
            .map(|id| {
                let product = self
                    .catalog
                    .get(&id)
                    .ok_or_else(|| EngineError::UnknownProduct(id.clone()))?;
                Ok(OrderItem {
                    id,
                    name: product.name.clone(),
                    brand: product.brand.clone(),
                    price: product.price,
                    quantity: 1,
                })
            })
            .collect()
    }

    fn preselect_default_address(&mut self) -> Result<(), EngineError> {
        let default = match &self.scope {
            Some(scope) => scope.addresses.default_address()?,
            None => None,
        };
        if let Some(address) = default {
            self.checkout.set_location(DeliveryLocation::Saved(address.id));
        }
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.checkout.set_payment_method(method);
    }

    pub fn set_delivery_type(&mut self, delivery: DeliveryType) {
        self.checkout.set_delivery_type(delivery);
    }

    pub fn set_delivery_location(&mut self, location: DeliveryLocation) {
        self.checkout.set_location(location);
    }

    /// Whether [`Self::submit`] would be accepted right now.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] when the persistent layer fails.
    pub fn can_submit(&self) -> Result<bool, EngineError> {
        Ok(self.checkout.can_submit(self.addresses_ref())?)
    }

    /// Submits the configured checkout, producing the `wa.me` handoff
    /// after the preparation delay.
    ///
    /// # Errors
    ///
    /// Propagates [`CheckoutError`] from the state machine.
    pub async fn submit(&mut self) -> Result<Handoff, EngineError> {
        let customer = self
            .scope
            .as_ref()
            .map(|scope| (scope.profile.name.as_str(), scope.profile.phone.as_str()));
        let book = self.scope.as_ref().map(|scope| &scope.addresses);
        Ok(self.checkout.submit(&self.config, customer, book).await?)
    }

    /// Confirms the message was sent: finalizes the order, appends it to
    /// the active customer's history, and clears the selection.
    ///
    /// Walk-up orders (no active profile) are finalized and returned but
    /// recorded nowhere.
    ///
    /// # Errors
    ///
    /// Propagates [`CheckoutError`] and storage failures.
    pub fn confirm_sent(&mut self, now: DateTime<Utc>) -> Result<OrderRecord, EngineError> {
        let record = self.checkout.confirm_sent(now)?;
        if let Some(scope) = &self.scope {
            scope.history.append(record.clone())?;
        }
        self.selection.clear();
        info!(order = %record.id, total = %record.total, "order confirmed");
        Ok(record)
    }

    /// Returns an unconfirmed checkout to configuration for another try.
    ///
    /// # Errors
    ///
    /// Propagates [`CheckoutError::NotAwaitingConfirmation`].
    pub fn retry_checkout(&mut self) -> Result<(), EngineError> {
        Ok(self.checkout.retry()?)
    }

    /// Abandons the current checkout. The selection stays staged.
    pub fn cancel_checkout(&mut self) {
        self.checkout.cancel();
    }

    #[must_use]
    pub fn checkout_phase(&self) -> CheckoutPhase {
        self.checkout.phase()
    }

    fn addresses_ref(&self) -> Option<&AddressBook> {
        self.scope.as_ref().map(|scope| &scope.addresses)
    }
}
