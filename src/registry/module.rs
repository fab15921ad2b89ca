//! Modular registration.
//!
//! Groups of declarations can be packaged as a [`ConfigModule`] and applied
//! to a registry in one call.

use crate::error::DiResult;
use crate::registry::Config;

/// A bundle of declarations that registers itself with a [`Config`].
///
/// # Example
///
/// ```rust
/// use ferrous_inject::{Component, Config, ConfigExt, ConfigModule, Injectable, Parameters, DiResult};
///
/// struct UserRepository;
/// impl Component for UserRepository {}
/// impl Injectable for UserRepository {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(UserRepository) }
/// }
///
/// struct UserModule;
///
/// impl ConfigModule for UserModule {
///     fn register(self, config: &Config) -> DiResult<()> {
///         config.add_singleton::<UserRepository>();
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let config = Config::new();
/// config.add_module(UserModule)?;
/// assert!(config.contains(UserRepository::type_key()));
/// # Ok(())
/// # }
/// ```
pub trait ConfigModule {
    /// Declare this module's types and processors on `config`.
    fn register(self, config: &Config) -> DiResult<()>;
}

/// Module registration for [`Config`].
pub trait ConfigExt {
    /// Applies `module`, returning the registry for chaining.
    ///
    /// ```rust
    /// use ferrous_inject::{Config, ConfigExt, ConfigModule, DiResult};
    ///
    /// struct StorageModule;
    /// impl ConfigModule for StorageModule {
    ///     fn register(self, _: &Config) -> DiResult<()> { Ok(()) }
    /// }
    ///
    /// struct MailModule;
    /// impl ConfigModule for MailModule {
    ///     fn register(self, _: &Config) -> DiResult<()> { Ok(()) }
    /// }
    ///
    /// # fn main() -> DiResult<()> {
    /// let config = Config::new();
    /// config.add_module(StorageModule)?.add_module(MailModule)?;
    /// # Ok(())
    /// # }
    /// ```
    fn add_module<M: ConfigModule>(&self, module: M) -> DiResult<&Self>;
}

impl ConfigExt for Config {
    fn add_module<M: ConfigModule>(&self, module: M) -> DiResult<&Self> {
        module.register(self)?;
        Ok(self)
    }
}
