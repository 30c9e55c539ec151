use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockWriteGuard};

use async_trait::async_trait;

use catalog_core::{PageRequest, PaginationResult, ProductId};
use catalog_products::{Product, ProductsRepository, RepositoryError, RepositoryResult};

#[derive(Debug, Clone)]
enum PendingWrite {
    Insert(Product),
    Update(Product),
}

impl PendingWrite {
    fn id(&self) -> ProductId {
        match self {
            PendingWrite::Insert(p) | PendingWrite::Update(p) => p.id,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    committed: BTreeMap<ProductId, Product>,
    pending: Vec<PendingWrite>,
}

impl State {
    fn id_taken(&self, id: ProductId) -> bool {
        self.committed.contains_key(&id)
            || self
                .pending
                .iter()
                .any(|w| matches!(w, PendingWrite::Insert(p) if p.id == id))
    }

    fn next_id(&self) -> Option<ProductId> {
        let committed_max = self.committed.keys().next_back().map(|id| id.get());
        let pending_max = self.pending.iter().map(|w| w.id().get()).max();
        let max = committed_max.max(pending_max).unwrap_or(0).max(0);
        max.checked_add(1).map(ProductId::new)
    }

    /// Apply every staged write; `true` when at least one was applied.
    ///
    /// Callers hold the write guard, so a write staged under the same guard is
    /// always applied by this call and never by a concurrent one.
    fn commit(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        let mut applied = 0usize;
        for write in pending {
            match write {
                PendingWrite::Insert(p) => {
                    if self.committed.contains_key(&p.id) {
                        tracing::warn!(product_id = %p.id, "dropping staged insert for existing id");
                        continue;
                    }
                    self.committed.insert(p.id, p);
                    applied += 1;
                }
                PendingWrite::Update(p) => match self.committed.get_mut(&p.id) {
                    Some(slot) => {
                        *slot = p;
                        applied += 1;
                    }
                    None => {
                        tracing::warn!(product_id = %p.id, "dropping staged update for missing id");
                    }
                },
            }
        }
        applied > 0
    }
}

/// In-memory product store for tests/dev.
///
/// Writes are staged and only become visible once committed.
/// `create_product`/`update_product` stage and commit under one write guard, so
/// their result reports their own write even with concurrent callers.
#[derive(Debug, Default)]
pub struct InMemoryProductsRepository {
    inner: RwLock<State>,
}

impl InMemoryProductsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with committed products (ids kept as given).
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let committed = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            inner: RwLock::new(State {
                committed,
                pending: Vec::new(),
            }),
        }
    }

    /// Two sample products used to seed dev instances.
    pub fn seeded() -> Self {
        Self::with_products([
            Product::new(1, "Product 1", 100.0),
            Product::new(2, "Product 2", 200.0),
        ])
    }

    /// Number of committed products.
    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.committed.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::backend("in-memory product store lock poisoned"))
    }

    fn read_committed<T>(&self, f: impl FnOnce(&BTreeMap<ProductId, Product>) -> T) -> RepositoryResult<T> {
        let state = self
            .inner
            .read()
            .map_err(|_| RepositoryError::backend("in-memory product store lock poisoned"))?;
        Ok(f(&state.committed))
    }
}

#[async_trait]
impl ProductsRepository for InMemoryProductsRepository {
    async fn get_products(&self, page: PageRequest) -> RepositoryResult<PaginationResult<Product>> {
        self.read_committed(|committed| {
            let ordered: Vec<Product> = committed.values().cloned().collect();
            PaginationResult::from_items(&ordered, page)
        })
    }

    async fn get_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        self.read_committed(|committed| committed.get(&id).cloned())
    }

    async fn product_exists(&self, id: ProductId) -> RepositoryResult<bool> {
        self.read_committed(|committed| committed.contains_key(&id))
    }

    async fn create_product(&self, product: Product) -> RepositoryResult<bool> {
        let mut state = self.write()?;
        let product = if product.id.is_assigned() {
            if state.id_taken(product.id) {
                tracing::debug!(product_id = %product.id, "create rejected: id already in use");
                return Ok(false);
            }
            product
        } else {
            match state.next_id() {
                Some(id) => product.with_id(id),
                None => {
                    tracing::warn!("create rejected: product id space exhausted");
                    return Ok(false);
                }
            }
        };
        state.pending.push(PendingWrite::Insert(product));
        Ok(state.commit())
    }

    async fn update_product(&self, product: Product) -> RepositoryResult<bool> {
        let mut state = self.write()?;
        if !state.committed.contains_key(&product.id) {
            return Ok(false);
        }
        state.pending.push(PendingWrite::Update(product));
        Ok(state.commit())
    }

    /// Apply staged writes; `false` when nothing was committed.
    async fn save(&self) -> RepositoryResult<bool> {
        let mut state = self.write()?;
        Ok(state.commit())
    }
}
