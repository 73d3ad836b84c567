//! # Default Catalog
//!
//! The services a fresh install starts with. All prices include ISV.
//!
//! | Code   | Description             | Category  | Price  |
//! |--------|-------------------------|-----------|--------|
//! | LAV001 | Lavado Completo Premium | Lavado    | 250.00 |
//! | LAV002 | Lavado Básico           | Lavado    | 150.00 |
//! | ENC001 | Encerado y Brillado     | Detailing | 150.00 |
//! | INT001 | Limpieza Interior       | Interior  | 100.00 |

use carwash_core::{Money, NewService, UNLIMITED_STOCK};
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::repository::CatalogRepository;

const DEFAULT_SERVICES: &[(&str, &str, &str, i64)] = &[
    ("LAV001", "Lavado Completo Premium", "Lavado", 25000),
    ("LAV002", "Lavado Básico", "Lavado", 15000),
    ("ENC001", "Encerado y Brillado", "Detailing", 15000),
    ("INT001", "Limpieza Interior", "Interior", 10000),
];

/// The default car-wash services.
pub fn default_services() -> Vec<NewService> {
    DEFAULT_SERVICES
        .iter()
        .map(|&(code, description, category, cents)| NewService {
            code: code.to_string(),
            description: description.to_string(),
            price: Money::from_cents(cents),
            category: category.to_string(),
            taxable: true,
            stock: UNLIMITED_STOCK,
        })
        .collect()
}

/// Inserts every default service whose code is not in the catalog yet.
///
/// Returns how many were inserted; running it twice inserts nothing the
/// second time.
pub async fn seed_default_catalog(catalog: &dyn CatalogRepository) -> StoreResult<usize> {
    let mut inserted = 0;

    for service in default_services() {
        if catalog.get_by_code(&service.code).await?.is_some() {
            debug!(code = %service.code, "Default service already present");
            continue;
        }
        catalog.create(service).await?;
        inserted += 1;
    }

    info!(inserted, "Seeded default catalog");
    Ok(inserted)
}
