//! Shared fixtures: an in-memory SQLite workshop with migrations applied.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use domain::Money;
use order_service_lib::infra::Database;
use order_service_lib::repository::entities::{
    catalog_service, customer, part, payment, vehicle,
};
use order_service_lib::service::Services;

static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(10_000_000_000);

pub struct Workshop {
    pub db: DatabaseConnection,
    pub services: Services,
}

pub async fn workshop() -> Workshop {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let database = Database::connect(options).await.expect("in-memory database");
    let db = database.get_connection();

    Workshop {
        services: Services::from_connection(db.clone()),
        db,
    }
}

pub fn money(raw: &str) -> Money {
    raw.parse().expect("valid amount")
}

fn decimal(raw: &str) -> Decimal {
    raw.parse().expect("valid decimal")
}

impl Workshop {
    pub async fn customer(&self, name: &str) -> i32 {
        let now = Utc::now();
        customer::ActiveModel {
            name: Set(name.to_string()),
            document: Set(format!("{:011}", NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed))),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("customer")
        .id
    }

    pub async fn vehicle(&self, customer_id: i32, plate: &str) -> i32 {
        let now = Utc::now();
        vehicle::ActiveModel {
            customer_id: Set(customer_id),
            plate: Set(plate.to_string()),
            brand: Set("Fiat".to_string()),
            model_name: Set("Uno".to_string()),
            year: Set(2012),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("vehicle")
        .id
    }

    /// Customer plus one of their vehicles
    pub async fn client(&self) -> (i32, i32) {
        let customer_id = self.customer("Ana Souza").await;
        let vehicle_id = self.vehicle(customer_id, "ABC1D23").await;
        (customer_id, vehicle_id)
    }

    pub async fn service(&self, name: &str, price: &str) -> i32 {
        let now = Utc::now();
        catalog_service::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(decimal(price)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("catalog service")
        .id
    }

    pub async fn part(&self, name: &str, price: &str, total: i32, reserved: i32) -> i32 {
        let now = Utc::now();
        part::ActiveModel {
            name: Set(name.to_string()),
            price: Set(decimal(price)),
            quantity_total: Set(total),
            quantity_reserved: Set(reserved),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("part")
        .id
    }

    pub async fn delete_service(&self, id: i32) {
        let model = catalog_service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .expect("query")
            .expect("service exists");
        let mut active: catalog_service::ActiveModel = model.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&self.db).await.expect("soft delete");
    }

    pub async fn delete_part(&self, id: i32) {
        let model = part::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .expect("query")
            .expect("part exists");
        let mut active: part::ActiveModel = model.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&self.db).await.expect("soft delete");
    }

    pub async fn delete_customer(&self, id: i32) {
        let model = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .expect("query")
            .expect("customer exists");
        let mut active: customer::ActiveModel = model.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&self.db).await.expect("soft delete");
    }

    /// Current `quantity_reserved` of a part
    pub async fn reserved(&self, part_id: i32) -> i32 {
        part::Entity::find_by_id(part_id)
            .one(&self.db)
            .await
            .expect("query")
            .expect("part exists")
            .quantity_reserved
    }

    pub async fn payment_count(&self) -> u64 {
        payment::Entity::find()
            .count(&self.db)
            .await
            .expect("count payments")
    }
}
