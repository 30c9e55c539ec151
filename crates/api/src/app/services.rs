use std::sync::Arc;

use catalog_infra::{InMemoryProductsRepository, PostgresProductsRepository};
use catalog_products::ProductsRepository;

use crate::config::StoreConfig;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppServices {
    products: Arc<dyn ProductsRepository>,
    backend: &'static str,
}

impl AppServices {
    pub fn new(products: Arc<dyn ProductsRepository>, backend: &'static str) -> Self {
        Self { products, backend }
    }

    /// Services over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductsRepository::new()), "in_memory")
    }

    pub fn products(&self) -> &dyn ProductsRepository {
        self.products.as_ref()
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

pub async fn build_services(store: &StoreConfig) -> anyhow::Result<AppServices> {
    let services = match store {
        StoreConfig::InMemory { seed_sample_data } => {
            // In-memory wiring (dev/test).
            let repo = if *seed_sample_data {
                InMemoryProductsRepository::seeded()
            } else {
                InMemoryProductsRepository::new()
            };
            tracing::info!(products = repo.len(), "using in-memory product store");
            AppServices::new(Arc::new(repo), "in_memory")
        }
        StoreConfig::Postgres { database_url } => {
            let repo = PostgresProductsRepository::connect(database_url).await?;
            tracing::info!("using postgres product store");
            AppServices::new(Arc::new(repo), "postgres")
        }
    };
    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_in_memory_services_expose_sample_products() {
        let services = build_services(&StoreConfig::InMemory {
            seed_sample_data: true,
        })
        .await
        .unwrap();

        assert_eq!(services.backend(), "in_memory");
        let page = services
            .products()
            .get_products(catalog_core::PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.result.len(), 2);
    }

    #[tokio::test]
    async fn unseeded_in_memory_services_start_empty() {
        let services = AppServices::in_memory();
        let page = services
            .products()
            .get_products(catalog_core::PageRequest::default())
            .await
            .unwrap();
        assert!(page.result.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
