use ferrous_inject::{
    Component, Config, DiError, Inject, InjectionKind, InjectionPoint, Injectable, Injector, Lifecycle,
    Parameters, DiResult,
};
use std::sync::Arc;

/// Holds a provider for `Beta`, breaking the Alpha -> Beta -> Alpha cycle.
struct Alpha {
    beta: Inject,
}

impl Component for Alpha {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        vec![("beta", &self.beta)]
    }
}

impl Injectable for Alpha {
    fn type_key() -> &'static str {
        "alpha"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(Alpha { beta: InjectionPoint::provider::<Beta>().into() })
    }
}

struct Beta {
    alpha: Inject,
}

impl Component for Beta {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        vec![("alpha", &self.alpha)]
    }
}

impl Injectable for Beta {
    fn type_key() -> &'static str {
        "beta"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(Beta { alpha: InjectionPoint::instance::<Alpha>().into() })
    }
}

async fn cycle_config(alpha: Lifecycle) -> Config {
    let config = Config::new();
    match alpha {
        Lifecycle::Singleton => config.add_singleton::<Alpha>(),
        _ => config.add_prototype::<Alpha>(),
    };
    config.add_prototype::<Beta>();
    config.finalize().await.unwrap();
    config
}

#[tokio::test]
async fn test_provider_breaks_prototype_cycle() {
    let config = cycle_config(Lifecycle::Prototype).await;
    let injector = Injector::new();

    let alpha = injector.resolve_as::<Alpha>("alpha", &config, &Parameters::new()).await.unwrap();
    assert_eq!(alpha.beta.point().kind(), InjectionKind::Provider);
    let provider = alpha.beta.provider().expect("provider injected");
    assert_eq!(provider.name(), "beta");

    let beta = provider.get_as::<Beta>(Parameters::new()).await.unwrap();
    let inner_alpha = beta.alpha.get::<Alpha>().expect("beta wired");
    assert!(!Arc::ptr_eq(&alpha, &inner_alpha));
    assert!(inner_alpha.beta.provider().is_some());
}

#[tokio::test]
async fn test_provider_breaks_singleton_cycle() {
    let config = cycle_config(Lifecycle::Singleton).await;
    let injector = Injector::new();

    let alpha = injector.resolve_as::<Alpha>("alpha", &config, &Parameters::new()).await.unwrap();
    let beta = alpha
        .beta
        .provider()
        .unwrap()
        .get_as::<Beta>(Parameters::new())
        .await
        .unwrap();

    let inner_alpha = beta.alpha.get::<Alpha>().unwrap();
    assert!(Arc::ptr_eq(&alpha, &inner_alpha));
}

#[tokio::test]
async fn test_each_get_resolves_through_policy() {
    let config = cycle_config(Lifecycle::Prototype).await;
    let alpha = Injector::new()
        .resolve_as::<Alpha>("alpha", &config, &Parameters::new())
        .await
        .unwrap();
    let provider = alpha.beta.provider().unwrap();

    let first = provider.get(Parameters::new()).await.unwrap();
    let second = provider.get(Parameters::new()).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_provider_passes_parameters() {
    struct Buffer {
        size: usize,
    }
    impl Component for Buffer {}
    impl Injectable for Buffer {
        fn type_key() -> &'static str {
            "buffer"
        }
        fn create(parameters: &Parameters) -> DiResult<Self> {
            Ok(Buffer { size: *parameters.get::<usize>(0)? })
        }
    }

    struct BufferFactory {
        buffer: Inject,
    }
    impl Component for BufferFactory {
        fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
            vec![("buffer", &self.buffer)]
        }
    }

    let config = Config::new();
    config.add_prototype::<Buffer>();
    config.finalize().await.unwrap();

    let factory = Arc::new(BufferFactory { buffer: InjectionPoint::provider::<Buffer>().into() });
    ferrous_inject::inject(factory.clone(), &config).await.unwrap();

    let provider = factory.buffer.provider().unwrap();
    let small = provider.get_as::<Buffer>(Parameters::new().with(4usize)).await.unwrap();
    let large = provider.get_as::<Buffer>(Parameters::new().with(64usize)).await.unwrap();
    assert_eq!((small.size, large.size), (4, 64));

    assert!(matches!(
        provider.get(Parameters::new()).await,
        Err(DiError::InvalidParameter { index: 0, .. })
    ));
}

#[tokio::test]
async fn test_provider_for_unknown_name_fails_at_injection() {
    struct Lonely {
        missing: Inject,
    }
    impl Component for Lonely {
        fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
            vec![("missing", &self.missing)]
        }
    }

    let config = Config::new();
    config.finalize().await.unwrap();

    let lonely = Arc::new(Lonely { missing: InjectionPoint::provider_by_name::<Beta>("ghost").into() });
    assert_eq!(
        ferrous_inject::inject(lonely.clone(), &config).await.err(),
        Some(DiError::UnknownTypeConfig("ghost".to_string()))
    );
    assert!(!lonely.missing.is_wired());
}

#[tokio::test]
async fn test_provider_outliving_registry() {
    let config = cycle_config(Lifecycle::Prototype).await;
    let alpha = Injector::new()
        .resolve_as::<Alpha>("alpha", &config, &Parameters::new())
        .await
        .unwrap();
    let provider = alpha.beta.provider().cloned().unwrap();

    drop(config);
    assert_eq!(provider.get(Parameters::new()).await.err(), Some(DiError::MissingRegistry));
}

#[tokio::test]
async fn test_provider_follows_redeclared_entry() {
    let config = cycle_config(Lifecycle::Prototype).await;
    let alpha = Injector::new()
        .resolve_as::<Alpha>("alpha", &config, &Parameters::new())
        .await
        .unwrap();
    let provider = alpha.beta.provider().unwrap();

    config.add_singleton::<Beta>();
    config.finalize().await.unwrap();
    assert!(config.contains("beta"));

    let first = provider.get_as::<Beta>(Parameters::new()).await.unwrap();
    let second = provider.get_as::<Beta>(Parameters::new()).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_provider_follows_merged_entry() {
    let config = cycle_config(Lifecycle::Prototype).await;
    let alpha = Injector::new()
        .resolve_as::<Alpha>("alpha", &config, &Parameters::new())
        .await
        .unwrap();
    let provider = alpha.beta.provider().unwrap();

    let other = Config::new();
    other.add_singleton::<Beta>();
    other.add_prototype::<Alpha>();
    other.finalize().await.unwrap();
    config.merge(&other).unwrap();

    assert_eq!(provider.get(Parameters::new()).await.err(), Some(DiError::NotFinalized));
    config.finalize().await.unwrap();

    let beta = provider.get_as::<Beta>(Parameters::new()).await.unwrap();
    let shared = Injector::new()
        .resolve_as::<Beta>("beta", &other, &Parameters::new())
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&beta, &shared));
}
