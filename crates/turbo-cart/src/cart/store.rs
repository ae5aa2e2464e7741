//! The cart store: validated, persisted, serialized cart mutations.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use turbo_cache::Cache;

use crate::cart::{load_cart, save_cart, Cart, LineItem, CART_STORAGE_KEY};
use crate::error::{CartError, Failure};
use crate::notify::{Notice, NotificationSink};
use crate::services::{CatalogService, StockService};

/// Store behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the cart snapshot is persisted under.
    pub storage_key: String,
    /// Report an unknown product as "error adding product" instead of
    /// ignoring the add silently.
    pub report_missing_products: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: CART_STORAGE_KEY.to_string(),
            report_missing_products: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::Update => "update",
        }
    }

    fn failed(self, cause: impl Into<Failure>) -> CartError {
        match self {
            Operation::Add => CartError::AddFailed(cause.into()),
            Operation::Remove => CartError::RemoveFailed(cause.into()),
            Operation::Update => CartError::UpdateFailed(cause.into()),
        }
    }

    fn failure_notice(self) -> Notice {
        match self {
            Operation::Add => Notice::AddFailed,
            Operation::Remove => Notice::RemoveFailed,
            Operation::Update => Notice::UpdateFailed,
        }
    }
}

/// Owns the shopping cart.
///
/// Mutations run one at a time: each holds the store's lock from the first
/// remote lookup until the new snapshot is persisted and published, so
/// overlapping calls behave as if issued back to back. A mutation is
/// visible (through [`cart`](Self::cart) and [`subscribe`](Self::subscribe))
/// only after the snapshot write succeeded; on any failure both storage and
/// the in-memory cart are left untouched.
///
/// Failures are reported to the [`NotificationSink`] and returned; callers
/// driving a UI can ignore the returned error.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::open(cache, api.clone(), api, notifier, StoreOptions::default());
///
/// store.add_item(1).await.ok();
/// store.update_amount(1, 3).await.ok();
/// println!("{} items", store.cart().item_count());
/// ```
pub struct CartStore {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn CatalogService>,
    notifier: Arc<dyn NotificationSink>,
    cache: Cache,
    options: StoreOptions,
    working: Mutex<Cart>,
    published: watch::Sender<Cart>,
}

impl CartStore {
    /// Create a store, loading the persisted cart (empty if there is none or
    /// it can't be read).
    pub fn open(
        cache: Cache,
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn CatalogService>,
        notifier: Arc<dyn NotificationSink>,
        options: StoreOptions,
    ) -> Self {
        let cart = load_cart(&cache, &options.storage_key);
        let (published, _) = watch::channel(cart.clone());
        Self {
            stock,
            catalog,
            notifier,
            cache,
            options,
            working: Mutex::new(cart),
            published,
        }
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.published.borrow().clone()
    }

    /// Receive every committed cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.published.subscribe()
    }

    /// The options this store runs with.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_amount`](Self::update_amount) with its amount plus one.
    /// Otherwise the product must have stock and be known to the catalog; it
    /// is appended with amount 1.
    pub async fn add_item(&self, product_id: u64) -> Result<(), CartError> {
        let mut cart = self.working.lock().await;

        if let Some(existing) = cart.get(product_id) {
            let amount = i64::from(existing.amount) + 1;
            let result = self.apply_update(&mut cart, product_id, amount).await;
            return self.finish(Operation::Update, product_id, result);
        }

        let result = self.apply_add(&mut cart, product_id).await;
        self.finish(Operation::Add, product_id, result)
    }

    /// Remove a product's line from the cart.
    pub async fn remove_item(&self, product_id: u64) -> Result<(), CartError> {
        let mut cart = self.working.lock().await;

        let result = if cart.contains(product_id) {
            let mut next = cart.clone();
            next.remove(product_id);
            self.commit(&mut cart, next, Operation::Remove)
        } else {
            Err(CartError::ItemNotFound(product_id))
        };
        self.finish(Operation::Remove, product_id, result)
    }

    /// Set a product's amount, checked against current stock.
    ///
    /// An amount of zero or less is ignored: nothing is looked up, changed or
    /// reported.
    pub async fn update_amount(&self, product_id: u64, amount: i64) -> Result<(), CartError> {
        if amount <= 0 {
            tracing::debug!(product_id, amount, "ignoring non-positive amount");
            return Ok(());
        }

        let mut cart = self.working.lock().await;
        let result = self.apply_update(&mut cart, product_id, amount).await;
        self.finish(Operation::Update, product_id, result)
    }

    /// Empty the cart, e.g. after checkout.
    pub async fn clear(&self) -> Result<(), CartError> {
        let mut cart = self.working.lock().await;
        if cart.is_empty() {
            return Ok(());
        }
        let result = self.commit(&mut cart, Cart::new(), Operation::Remove);
        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to clear cart");
            self.notifier.notify(Notice::RemoveFailed);
        }
        result
    }

    async fn apply_add(&self, cart: &mut Cart, product_id: u64) -> Result<(), CartError> {
        let stock = self
            .stock
            .stock(product_id)
            .await
            .map_err(|e| Operation::Add.failed(e))?;
        if stock.amount <= 0 {
            return Err(CartError::OutOfStock { product_id });
        }

        let product = self
            .catalog
            .product(product_id)
            .await
            .map_err(|e| Operation::Add.failed(e))?
            // The record must describe the product that was asked for.
            .filter(|p| p.valid_id() == Some(product_id))
            .ok_or(CartError::ProductNotFound(product_id))?;

        let mut next = cart.clone();
        next.push(LineItem::new(product_id, product));
        self.commit(cart, next, Operation::Add)
    }

    async fn apply_update(
        &self,
        cart: &mut Cart,
        product_id: u64,
        amount: i64,
    ) -> Result<(), CartError> {
        if !cart.contains(product_id) {
            return Err(CartError::ItemNotFound(product_id));
        }
        let new_amount = u32::try_from(amount).map_err(|_| CartError::InvalidAmount(amount))?;

        let stock = self
            .stock
            .stock(product_id)
            .await
            .map_err(|e| Operation::Update.failed(e))?;
        if amount > stock.amount {
            return Err(CartError::InsufficientStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut next = cart.clone();
        next.set_amount(product_id, new_amount);
        self.commit(cart, next, Operation::Update)
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&self, current: &mut Cart, next: Cart, op: Operation) -> Result<(), CartError> {
        save_cart(&self.cache, &self.options.storage_key, &next).map_err(|e| op.failed(e))?;
        *current = next.clone();
        self.published.send_replace(next);
        Ok(())
    }

    /// Log the outcome and turn a failure into a notice.
    fn finish(
        &self,
        op: Operation,
        product_id: u64,
        result: Result<(), CartError>,
    ) -> Result<(), CartError> {
        let err = match &result {
            Ok(()) => {
                tracing::info!(operation = op.name(), product_id, "cart updated");
                return result;
            }
            Err(err) => err,
        };

        if err.is_rejection() {
            tracing::warn!(operation = op.name(), product_id, error = %err, "cart operation rejected");
        } else {
            tracing::error!(operation = op.name(), product_id, error = %err, "cart operation failed");
        }

        let notice = match err {
            CartError::OutOfStock { .. } | CartError::InsufficientStock { .. } => {
                Some(Notice::OutOfStock)
            }
            CartError::ProductNotFound(_) if !self.options.report_missing_products => None,
            _ => Some(op.failure_notice()),
        };
        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;
    use crate::services::{Product, StockRecord};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use turbo_cache::{CacheError, KvStore, MemoryStore};
    use turbo_data::FetchError;

    #[derive(Default)]
    struct FakeStock {
        levels: std::sync::Mutex<HashMap<u64, i64>>,
        offline: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeStock {
        fn set(&self, product_id: u64, amount: i64) {
            self.levels.lock().unwrap().insert(product_id, amount);
        }
    }

    #[async_trait]
    impl StockService for FakeStock {
        async fn stock(&self, product_id: u64) -> Result<StockRecord, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.offline.load(Ordering::SeqCst) {
                return Err(FetchError::Connection("stock service down".into()));
            }
            let amount = self.levels.lock().unwrap().get(&product_id).copied().unwrap_or(0);
            Ok(StockRecord {
                id: product_id,
                amount,
            })
        }
    }

    #[derive(Default)]
    struct FakeCatalog {
        products: HashMap<u64, Product>,
        offline: AtomicBool,
    }

    #[async_trait]
    impl CatalogService for FakeCatalog {
        async fn product(&self, product_id: u64) -> Result<Option<Product>, FetchError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(FetchError::Timeout);
            }
            Ok(self.products.get(&product_id).cloned())
        }
    }

    /// Accepts reads, refuses writes.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KvStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError("quota exceeded".into()))
        }

        fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.inner.delete(key)
        }
    }

    fn product(id: u64, name: &str, price: f64) -> Product {
        Product {
            id: Some(id),
            name: name.to_string(),
            price,
            image_url: format!("https://img/{}.jpg", id),
        }
    }

    struct Harness {
        store: CartStore,
        stock: Arc<FakeStock>,
        catalog: Arc<FakeCatalog>,
        sink: Arc<RecordingSink>,
        cache: Cache,
    }

    impl Harness {
        fn new(stock: &[(u64, i64)], products: Vec<Product>) -> Self {
            Self::with(Cache::in_memory(), stock, products, StoreOptions::default())
        }

        fn with(
            cache: Cache,
            stock: &[(u64, i64)],
            products: Vec<Product>,
            options: StoreOptions,
        ) -> Self {
            let fake_stock = Arc::new(FakeStock::default());
            for (id, amount) in stock {
                fake_stock.set(*id, *amount);
            }
            let catalog = Arc::new(FakeCatalog {
                products: products
                    .into_iter()
                    .map(|p| (p.id.unwrap_or_default(), p))
                    .collect(),
                offline: AtomicBool::new(false),
            });
            let sink = Arc::new(RecordingSink::new());
            let store = CartStore::open(
                cache.clone(),
                fake_stock.clone(),
                catalog.clone(),
                sink.clone(),
                options,
            );
            Self {
                store,
                stock: fake_stock,
                catalog,
                sink,
                cache,
            }
        }

        fn persisted(&self) -> Cart {
            load_cart(&self.cache, CART_STORAGE_KEY)
        }

        fn raw_snapshot(&self) -> Option<Vec<u8>> {
            self.cache.get_raw(CART_STORAGE_KEY).unwrap()
        }

        fn amount(&self, product_id: u64) -> Option<u32> {
            self.store.cart().get(product_id).map(|i| i.amount)
        }
    }

    fn shoe_shop() -> Harness {
        Harness::new(
            &[(1, 5), (2, 3), (3, 0)],
            vec![
                product(1, "Shoe", 100.0),
                product(2, "Boot", 150.0),
                product(3, "Sandal", 40.0),
            ],
        )
    }

    #[tokio::test]
    async fn test_add_new_item() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();

        let cart = h.store.cart();
        assert_eq!(cart.len(), 1);
        let item = cart.get(1).unwrap();
        assert_eq!(item.amount, 1);
        assert_eq!(item.name, "Shoe");
        assert_eq!(item.price, 100.0);
        assert_eq!(h.persisted(), cart);
        assert!(h.sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_add_keeps_insertion_order() {
        let h = shoe_shop();
        h.store.add_item(2).await.unwrap();
        h.store.add_item(1).await.unwrap();

        let ids: Vec<u64> = h.store.cart().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(h.persisted(), h.store.cart());
    }

    #[tokio::test]
    async fn test_add_existing_item_increments() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        h.store.add_item(1).await.unwrap();

        assert_eq!(h.store.cart().len(), 1);
        assert_eq!(h.amount(1), Some(2));
        assert_eq!(h.persisted(), h.store.cart());
    }

    #[tokio::test]
    async fn test_add_existing_item_matches_update() {
        let by_add = shoe_shop();
        by_add.store.add_item(2).await.unwrap();
        by_add.store.add_item(2).await.unwrap();
        by_add.store.add_item(2).await.unwrap();
        let by_add_err = by_add.store.add_item(2).await.unwrap_err();

        let by_update = shoe_shop();
        by_update.store.add_item(2).await.unwrap();
        by_update.store.update_amount(2, 2).await.unwrap();
        by_update.store.update_amount(2, 3).await.unwrap();
        let by_update_err = by_update.store.update_amount(2, 4).await.unwrap_err();

        assert_eq!(by_add.store.cart(), by_update.store.cart());
        assert_eq!(by_add.sink.notices(), by_update.sink.notices());
        assert_eq!(by_add.sink.notices(), vec![Notice::OutOfStock]);
        assert!(matches!(by_add_err, CartError::InsufficientStock { requested: 4, available: 3, .. }));
        assert!(matches!(by_update_err, CartError::InsufficientStock { requested: 4, available: 3, .. }));
    }

    #[tokio::test]
    async fn test_add_out_of_stock() {
        let h = shoe_shop();
        let err = h.store.add_item(3).await.unwrap_err();

        assert!(matches!(err, CartError::OutOfStock { product_id: 3 }));
        assert!(h.store.cart().is_empty());
        assert!(h.raw_snapshot().is_none());
        assert_eq!(h.sink.notices(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_add_negative_stock_is_out_of_stock() {
        let h = shoe_shop();
        h.stock.set(1, -2);
        assert!(matches!(
            h.store.add_item(1).await,
            Err(CartError::OutOfStock { .. })
        ));
        assert_eq!(h.sink.notices(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_silent() {
        let h = Harness::new(&[(7, 10)], Vec::new());
        let err = h.store.add_item(7).await.unwrap_err();

        assert!(matches!(err, CartError::ProductNotFound(7)));
        assert!(h.store.cart().is_empty());
        assert!(h.raw_snapshot().is_none());
        assert!(h.sink.notices().is_empty());
    }

    /// A store over `h`'s stock, storage and sink, with its own catalog.
    fn store_with_catalog(h: &Harness, products: HashMap<u64, Product>) -> CartStore {
        let catalog = Arc::new(FakeCatalog {
            products,
            offline: AtomicBool::new(false),
        });
        CartStore::open(
            h.cache.clone(),
            h.stock.clone(),
            catalog,
            h.sink.clone(),
            StoreOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_add_product_with_zero_id_is_not_found() {
        let mut bogus = product(7, "Ghost", 1.0);
        bogus.id = Some(0);
        let h = Harness::new(&[(7, 10)], Vec::new());
        let store = store_with_catalog(&h, HashMap::from([(7, bogus)]));

        assert!(matches!(store.add_item(7).await, Err(CartError::ProductNotFound(7))));
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_product_with_mismatched_id_is_not_found() {
        // Catalog answers for product 7 with product 8's record.
        let h = Harness::new(&[(7, 10), (8, 10)], Vec::new());
        let store = store_with_catalog(&h, HashMap::from([(7, product(8, "Boot", 150.0))]));

        let err = store.add_item(7).await.unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(7)));
        assert!(store.cart().is_empty());
        assert!(!store.cart().contains(8));
        assert!(h.raw_snapshot().is_none());
        assert!(h.sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product_reported_when_configured() {
        let options = StoreOptions {
            report_missing_products: true,
            ..StoreOptions::default()
        };
        let h = Harness::with(Cache::in_memory(), &[(7, 10)], Vec::new(), options);
        assert!(h.store.add_item(7).await.is_err());
        assert_eq!(h.sink.notices(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_stock_service_failure() {
        let h = shoe_shop();
        h.stock.offline.store(true, Ordering::SeqCst);

        let err = h.store.add_item(1).await.unwrap_err();
        assert!(matches!(err, CartError::AddFailed(Failure::Fetch(FetchError::Connection(_)))));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.sink.notices(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_catalog_failure() {
        let h = shoe_shop();
        h.catalog.offline.store(true, Ordering::SeqCst);

        let err = h.store.add_item(1).await.unwrap_err();
        assert!(matches!(err, CartError::AddFailed(Failure::Fetch(FetchError::Timeout))));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.sink.notices(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_storage_failure_leaves_cart_unchanged() {
        let cache = Cache::new(ReadOnlyStore::default());
        let h = Harness::with(
            cache,
            &[(1, 5)],
            vec![product(1, "Shoe", 100.0)],
            StoreOptions::default(),
        );

        let err = h.store.add_item(1).await.unwrap_err();
        assert!(matches!(err, CartError::AddFailed(Failure::Storage(_))));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.sink.notices(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_update_non_positive_is_noop() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        let before = h.raw_snapshot();
        let calls = h.stock.calls.load(Ordering::SeqCst);

        h.store.update_amount(1, 0).await.unwrap();
        h.store.update_amount(1, -4).await.unwrap();

        assert_eq!(h.amount(1), Some(1));
        assert_eq!(h.raw_snapshot(), before);
        assert_eq!(h.stock.calls.load(Ordering::SeqCst), calls);
        assert!(h.sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_update_within_stock() {
        let h = shoe_shop();
        h.store.add_item(2).await.unwrap();
        h.store.add_item(1).await.unwrap();
        h.store.update_amount(2, 3).await.unwrap();

        assert_eq!(h.amount(2), Some(3));
        let ids: Vec<u64> = h.store.cart().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(h.persisted(), h.store.cart());
    }

    #[tokio::test]
    async fn test_update_above_stock() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        let before = h.raw_snapshot();

        let err = h.store.update_amount(1, 6).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::InsufficientStock {
                product_id: 1,
                requested: 6,
                available: 5
            }
        ));
        assert_eq!(h.amount(1), Some(1));
        assert_eq!(h.raw_snapshot(), before);
        assert_eq!(h.sink.notices(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_update_item_not_in_cart() {
        let h = shoe_shop();
        let err = h.store.update_amount(1, 2).await.unwrap_err();

        assert!(matches!(err, CartError::ItemNotFound(1)));
        assert!(h.raw_snapshot().is_none());
        assert_eq!(h.sink.notices(), vec![Notice::UpdateFailed]);
    }

    #[tokio::test]
    async fn test_update_amount_too_large() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        let err = h.store.update_amount(1, i64::from(u32::MAX) + 1).await.unwrap_err();

        assert!(matches!(err, CartError::InvalidAmount(_)));
        assert_eq!(h.amount(1), Some(1));
        assert_eq!(h.sink.notices(), vec![Notice::UpdateFailed]);
    }

    #[tokio::test]
    async fn test_update_stock_service_failure() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        h.stock.offline.store(true, Ordering::SeqCst);

        let err = h.store.update_amount(1, 2).await.unwrap_err();
        assert!(matches!(err, CartError::UpdateFailed(_)));
        assert_eq!(h.amount(1), Some(1));
        assert_eq!(h.sink.notices(), vec![Notice::UpdateFailed]);
    }

    #[tokio::test]
    async fn test_remove_present_item() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        h.store.add_item(2).await.unwrap();

        h.store.remove_item(1).await.unwrap();

        let cart = h.store.cart();
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(1));
        assert!(cart.contains(2));
        assert_eq!(h.persisted(), cart);
        assert!(h.sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_item() {
        let h = shoe_shop();
        h.store.add_item(2).await.unwrap();
        let before = h.raw_snapshot();

        let err = h.store.remove_item(1).await.unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(1)));
        assert_eq!(h.store.cart().len(), 1);
        assert_eq!(h.raw_snapshot(), before);
        assert_eq!(h.sink.notices(), vec![Notice::RemoveFailed]);
    }

    #[tokio::test]
    async fn test_remove_storage_failure() {
        let memory = MemoryStore::new();
        let seeded = Cart::try_from(vec![LineItem::new(1, product(1, "Shoe", 100.0))]).unwrap();
        memory
            .set(CART_STORAGE_KEY, &serde_json::to_vec(&seeded).unwrap())
            .unwrap();
        let cache = Cache::new(ReadOnlyStore { inner: memory });
        let h = Harness::with(cache, &[(1, 5)], Vec::new(), StoreOptions::default());
        assert_eq!(h.store.cart(), seeded);

        let err = h.store.remove_item(1).await.unwrap_err();
        assert!(matches!(err, CartError::RemoveFailed(Failure::Storage(_))));
        assert_eq!(h.store.cart(), seeded);
        assert_eq!(h.sink.notices(), vec![Notice::RemoveFailed]);
    }

    #[tokio::test]
    async fn test_clear() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        h.store.add_item(2).await.unwrap();

        h.store.clear().await.unwrap();
        assert!(h.store.cart().is_empty());
        assert!(h.persisted().is_empty());
        assert!(h.raw_snapshot().is_some());
    }

    #[tokio::test]
    async fn test_open_restores_persisted_cart() {
        let h = shoe_shop();
        h.store.add_item(1).await.unwrap();
        h.store.add_item(2).await.unwrap();
        h.store.update_amount(1, 4).await.unwrap();

        let reopened = Harness::with(
            h.cache.clone(),
            &[],
            Vec::new(),
            StoreOptions::default(),
        );
        assert_eq!(reopened.store.cart(), h.store.cart());
    }

    #[tokio::test]
    async fn test_open_with_malformed_snapshot() {
        let cache = Cache::in_memory();
        cache.set_raw(CART_STORAGE_KEY, b"not json at all").unwrap();
        let h = Harness::with(cache, &[(1, 5)], vec![product(1, "Shoe", 100.0)], StoreOptions::default());

        assert!(h.store.cart().is_empty());
        h.store.add_item(1).await.unwrap();
        assert_eq!(h.persisted().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let options = StoreOptions {
            storage_key: "cart:guest".to_string(),
            ..StoreOptions::default()
        };
        let h = Harness::with(Cache::in_memory(), &[(1, 5)], vec![product(1, "Shoe", 100.0)], options);
        h.store.add_item(1).await.unwrap();

        assert!(h.raw_snapshot().is_none());
        assert_eq!(load_cart(&h.cache, "cart:guest"), h.store.cart());
    }

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let h = shoe_shop();
        let mut rx = h.store.subscribe();

        h.store.add_item(1).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        // Rejected operations publish nothing.
        let _ = h.store.add_item(3).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let h = shoe_shop();
        let (a, b) = tokio::join!(h.store.add_item(1), h.store.add_item(1));
        a.unwrap();
        b.unwrap();

        assert_eq!(h.store.cart().len(), 1);
        assert_eq!(h.amount(1), Some(2));
        assert_eq!(h.persisted(), h.store.cart());
    }

    #[tokio::test]
    async fn test_concurrent_mixed_operations() {
        let h = Arc::new(shoe_shop());
        h.store.add_item(1).await.unwrap();

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let h = h.clone();
                tokio::spawn(async move { h.store.add_item(1).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.amount(1), Some(4));
        assert_eq!(h.persisted(), h.store.cart());
    }

    #[tokio::test]
    async fn test_shoe_scenario() {
        let h = Harness::new(&[(1, 5)], vec![product(1, "Shoe", 100.0)]);

        h.store.add_item(1).await.unwrap();
        assert_eq!(h.store.cart().len(), 1);
        assert_eq!(h.amount(1), Some(1));

        h.store.add_item(1).await.unwrap();
        assert_eq!(h.amount(1), Some(2));

        assert!(h.store.update_amount(1, 10).await.is_err());
        assert_eq!(h.amount(1), Some(2));
        assert_eq!(h.sink.take(), vec![Notice::OutOfStock]);

        h.store.remove_item(1).await.unwrap();
        assert!(h.store.cart().is_empty());
        assert!(h.persisted().is_empty());
        assert!(h.sink.notices().is_empty());
    }
}
