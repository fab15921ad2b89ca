//! # ferrous-inject
//!
//! Field-injection dependency container: declare types in a registry, let
//! components describe their dependency slots, and have the container wire
//! them, honoring lifecycle policies and running async processing passes.
//!
//! ## Features
//!
//! - **Lifecycle policies**: Singleton, Prototype and round-robin Pool
//! - **Field injection**: components expose their own slots; the injector fills them in order
//! - **Depth protection**: unbroken instantiation cycles fail with `InjectionTooDeep`
//! - **Lazy providers**: provider slots break cycles by deferring resolution
//! - **Processing pipelines**: configuration processors before use, instance processors after wiring
//! - **Post-construct hooks**: built-in instance processor calling `Component::post_construct`
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{Component, Config, Inject, InjectionPoint, Injectable, Parameters, DiResult};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! impl Component for Database {}
//! impl Injectable for Database {
//!     fn create(_: &Parameters) -> DiResult<Self> {
//!         Ok(Database { url: "postgres://localhost".to_string() })
//!     }
//! }
//!
//! struct UserService {
//!     db: Inject,
//! }
//!
//! impl Component for UserService {
//!     fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
//!         vec![("db", &self.db)]
//!     }
//! }
//!
//! # async fn example() -> DiResult<()> {
//! let config = Config::new();
//! config.add_singleton::<Database>();
//! config.finalize().await?;
//!
//! let service = Arc::new(UserService { db: InjectionPoint::instance::<Database>().into() });
//! ferrous_inject::inject(service.clone(), &config).await?;
//!
//! let db = service.db.get::<Database>().unwrap();
//! assert_eq!(db.url, "postgres://localhost");
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifecycle Policies
//!
//! - **Singleton**: created on first resolution, wired once, shared afterwards
//! - **Prototype**: created and wired on every resolution, with the caller's parameters
//! - **Pool**: a fixed set created at declaration and wired during finalization,
//!   handed out round-robin
//!
//! ## Breaking Cycles
//!
//! If A needs B and B needs A, one side declares a provider slot
//! (`InjectionPoint::provider::<B>()`). The slot receives a [`Provider`]
//! instead of an instance, and B is only resolved when
//! [`Provider::get`] is called.

pub mod descriptors;
pub mod error;
pub mod holder;
pub mod injection;
pub mod injector;
pub mod lifetime;
pub mod parameters;
pub mod pipeline;
pub mod provider;
pub mod registration;
pub mod registry;
pub mod settings;
pub mod traits;

mod internal;

pub use descriptors::TypeDescriptor;
pub use error::{DiError, DiResult};
pub use holder::{HolderKind, InstanceHolder};
pub use injection::{Inject, InjectionKind, InjectionPoint, Wired};
pub use injector::{inject, Injector};
pub use internal::BoxFuture;
pub use lifetime::{Lifecycle, Stage};
pub use parameters::Parameters;
pub use pipeline::{ConfigProcessorExecutor, InstanceProcessorExecutor, PostConstructProcessor};
pub use provider::Provider;
pub use registration::{Factory, TypeConfig};
pub use registry::{Config, ConfigExt, ConfigModule, ProcessorEntry};
pub use settings::{InjectorSettings, MAX_DEPTH};
pub use traits::{downcast, AsAny, Component, ConfigProcessor, Injectable, Instance, InstanceProcessor};
