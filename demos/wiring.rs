/// Example: wiring an application with lifecycle policies, a provider and
/// a configuration processor
///
/// Run with:
///
/// ```no_rust
/// RUST_LOG=ferrous_inject=debug cargo run --example wiring
/// ```

use async_trait::async_trait;
use ferrous_inject::{
    Component, Config, ConfigExt, ConfigModule, ConfigProcessor, DiResult, Inject, InjectionPoint,
    Injectable, Injector, Parameters, TypeConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

// ===== Storage Module =====

pub struct Database {
    pub url: String,
}

impl Component for Database {}

impl Injectable for Database {
    fn type_key() -> &'static str {
        "database"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(Database { url: "postgresql://localhost:5432/app".to_string() })
    }
}

static NEXT_CONNECTION: AtomicUsize = AtomicUsize::new(0);

pub struct Connection {
    pub id: usize,
    database: Inject,
}

impl Connection {
    pub fn describe(&self) -> String {
        let url = self
            .database
            .get::<Database>()
            .map(|db| db.url.clone())
            .unwrap_or_default();
        format!("connection #{} to {}", self.id, url)
    }
}

impl Component for Connection {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        vec![("database", &self.database)]
    }
}

impl Injectable for Connection {
    fn type_key() -> &'static str {
        "connection"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(Connection {
            id: NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed),
            database: InjectionPoint::instance::<Database>().into(),
        })
    }
}

pub struct StorageModule;

impl ConfigModule for StorageModule {
    fn register(self, config: &Config) -> DiResult<()> {
        config.add_singleton::<Database>();
        config.add_pool::<Connection>(3)?;
        Ok(())
    }
}

// ===== Services with a cycle =====

pub struct OrderService {
    audit: Inject,
}

#[async_trait]
impl Component for OrderService {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        vec![("audit", &self.audit)]
    }

    async fn post_construct(&self) -> DiResult<()> {
        println!("order service ready");
        Ok(())
    }
}

impl Injectable for OrderService {
    fn type_key() -> &'static str {
        "orders"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(OrderService { audit: InjectionPoint::provider::<AuditLog>().into() })
    }
}

pub struct AuditLog {
    orders: Inject,
}

impl Component for AuditLog {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        vec![("orders", &self.orders)]
    }
}

impl Injectable for AuditLog {
    fn type_key() -> &'static str {
        "audit"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(AuditLog { orders: InjectionPoint::instance::<OrderService>().into() })
    }
}

// ===== Configuration processor =====

pub struct Inventory;

impl Component for Inventory {}

impl Injectable for Inventory {
    fn type_key() -> &'static str {
        "inventory"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(Inventory)
    }
}

#[async_trait]
impl ConfigProcessor for Inventory {
    async fn process_config(&self, _config: &Config, unconfigured: &[Arc<TypeConfig>]) -> DiResult<()> {
        for type_config in unconfigured {
            println!("  {:<40} {}", type_config.name(), type_config.lifecycle());
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> DiResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::new();
    config.add_config_processor::<Inventory>();
    config.add_module(StorageModule)?;
    config.add_singleton::<OrderService>();
    config.add_prototype::<AuditLog>();

    println!("declarations:");
    config.finalize().await?;

    let injector = Injector::new();
    for _ in 0..4 {
        let connection = injector
            .resolve_as::<Connection>("connection", &config, &Parameters::new())
            .await?;
        println!("{}", connection.describe());
    }

    let orders = injector
        .resolve_as::<OrderService>("orders", &config, &Parameters::new())
        .await?;
    if let Some(provider) = orders.audit.provider() {
        let audit = provider.get_as::<AuditLog>(Parameters::new()).await?;
        let same = audit
            .orders
            .get::<OrderService>()
            .map(|inner| Arc::ptr_eq(&inner, &orders))
            .unwrap_or(false);
        println!("audit log sees the singleton order service: {}", same);
    }

    Ok(())
}
