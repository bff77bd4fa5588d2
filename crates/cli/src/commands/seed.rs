//! Seed the database with the admin account and the spice catalog.

use rust_decimal::Decimal;
use tracing::{info, warn};

use suya_core::{Email, ProductCategory};
use suya_server::db::products::ProductInput;
use suya_server::db::{self, ProductRepository, RepositoryError, UserRepository};
use suya_server::services::auth::hash_password;

use super::{CommandError, database_url};

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    category: ProductCategory,
    stock_quantity: i32,
    image_url: &'static str,
}

/// The launch catalog. Every blend sells for 15,000 NGN.
const SEED_PRICE_NGN: i64 = 15_000;

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Multi-Purpose Spice Mix",
        slug: "multi-purpose-spice-mix",
        description: "A versatile blend of premium spices perfect for all your cooking needs. \
                      This carefully crafted mix combines aromatic herbs and spices to enhance \
                      the flavor of any dish.",
        category: ProductCategory::Multipurpose,
        stock_quantity: 100,
        image_url: "/images/multi-purpose.jpg",
    },
    SeedProduct {
        name: "Women's Special Blend",
        slug: "womens-special-blend",
        description: "A specially formulated spice blend designed with women's health and taste \
                      preferences in mind. Rich in flavor and beneficial nutrients.",
        category: ProductCategory::Women,
        stock_quantity: 75,
        image_url: "/images/for-women.jpg",
    },
    SeedProduct {
        name: "Men's Power Mix",
        slug: "mens-power-mix",
        description: "A robust and bold spice blend crafted for hearty meals. Perfect for \
                      grilling, roasting, and adding depth to your favorite dishes.",
        category: ProductCategory::Men,
        stock_quantity: 80,
        image_url: "/images/for-men.jpg",
    },
];

/// Seed the admin user and catalog. Idempotent: existing rows are left alone.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a write fails for any
/// reason other than the row already existing.
pub async fn run(admin_email: &str, admin_password: &str) -> Result<(), CommandError> {
    let admin_email =
        Email::parse(admin_email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    info!("Seeding database...");

    let password_hash = hash_password(admin_password)?;
    let admin = UserRepository::new(&pool)
        .upsert_admin(&admin_email, "Admin User", &password_hash)
        .await?;
    info!(email = %admin.email, "Admin user ready");

    let products = ProductRepository::new(&pool);
    for seed in SEED_PRODUCTS {
        let result = products
            .create(ProductInput {
                slug: seed.slug,
                name: seed.name,
                description: Some(seed.description),
                category: seed.category,
                price: Decimal::new(SEED_PRICE_NGN, 0),
                stock_quantity: seed.stock_quantity,
                image_url: Some(seed.image_url),
                is_active: true,
            })
            .await;

        match result {
            Ok(product) => info!(slug = %product.slug, "Product created"),
            Err(RepositoryError::Conflict(_)) => {
                warn!(slug = seed.slug, "Product already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seed complete!");
    Ok(())
}
