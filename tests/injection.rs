use async_trait::async_trait;
use ferrous_inject::{
    inject, Component, Config, DiError, Inject, InjectionPoint, Injectable, Injector, InjectorSettings,
    Instance, InstanceProcessor, Parameters, DiResult, MAX_DEPTH,
};
use std::sync::{Arc, Mutex};

type Journal = Arc<Mutex<Vec<&'static str>>>;

struct Inner {
    journal: Journal,
}

#[async_trait]
impl Component for Inner {
    async fn post_construct(&self) -> DiResult<()> {
        self.journal.lock().unwrap().push("inner");
        Ok(())
    }
}

struct Outer {
    journal: Journal,
    first: Inject,
    second: Inject,
}

impl Outer {
    fn new(journal: Journal) -> Self {
        Self {
            journal,
            first: InjectionPoint::instance_by_name::<Inner>("inner", Parameters::new()).into(),
            second: InjectionPoint::instance_by_name::<Inner>("inner", Parameters::new()).into(),
        }
    }
}

#[async_trait]
impl Component for Outer {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        vec![("first", &self.first), ("second", &self.second)]
    }

    async fn post_construct(&self) -> DiResult<()> {
        self.journal.lock().unwrap().push("outer");
        Ok(())
    }
}

fn end_to_end_config(journal: &Journal) -> Config {
    let config = Config::new();
    let for_inner = journal.clone();
    config.add_singleton_factory("inner", move |_| {
        Ok(Arc::new(Inner { journal: for_inner.clone() }) as Instance)
    });
    let for_outer = journal.clone();
    config.add_singleton_factory("outer", move |_| {
        Ok(Arc::new(Outer::new(for_outer.clone())) as Instance)
    });
    config
}

#[tokio::test]
async fn test_end_to_end_singleton_wiring_and_hooks() {
    let journal: Journal = Arc::default();
    let config = end_to_end_config(&journal);
    config.finalize().await.unwrap();

    let outer = Arc::new(Outer::new(journal.clone()));
    inject(outer.clone(), &config).await.unwrap();

    let first = outer.first.get::<Inner>().unwrap();
    let second = outer.second.get::<Inner>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*journal.lock().unwrap(), vec!["inner", "outer"]);
}

#[tokio::test]
async fn test_inject_returns_the_target() {
    let journal: Journal = Arc::default();
    let config = end_to_end_config(&journal);
    config.finalize().await.unwrap();

    let outer: Instance = Arc::new(Outer::new(journal));
    let returned = inject(outer.clone(), &config).await.unwrap();
    assert!(Arc::ptr_eq(&outer, &returned));
}

#[tokio::test]
async fn test_not_finalized_guard() {
    let journal: Journal = Arc::default();
    let config = end_to_end_config(&journal);

    let outer = Arc::new(Outer::new(journal.clone()));
    assert_eq!(inject(outer.clone(), &config).await.err(), Some(DiError::NotFinalized));
    assert!(!outer.first.is_wired());

    struct Bare;
    impl Component for Bare {}
    assert_eq!(inject(Arc::new(Bare), &config).await.err(), Some(DiError::NotFinalized));
    assert!(journal.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_adding_after_finalize_requires_refinalize() {
    let journal: Journal = Arc::default();
    let config = end_to_end_config(&journal);
    config.finalize().await.unwrap();

    config.add_singleton_factory("late", |_| Ok(Arc::new(Inner { journal: Arc::default() }) as Instance));
    assert!(!config.is_finalized());
    let outer = Arc::new(Outer::new(journal.clone()));
    assert_eq!(inject(outer.clone(), &config).await.err(), Some(DiError::NotFinalized));

    config.finalize().await.unwrap();
    inject(outer.clone(), &config).await.unwrap();
    assert!(outer.first.is_wired());
}

#[tokio::test]
async fn test_unknown_injection_point_fails() {
    let config = Config::new();
    config.finalize().await.unwrap();

    let outer = Arc::new(Outer::new(Arc::default()));
    assert_eq!(
        inject(outer, &config).await.err(),
        Some(DiError::UnknownTypeConfig("inner".to_string()))
    );
}

/// Prototype building a chain: a node created with `remaining = n` asks for
/// a node with `n - 1`, down to zero.
struct Node {
    next: Option<Inject>,
}

impl Node {
    fn with_remaining(remaining: usize) -> Self {
        let next = (remaining > 0).then(|| {
            InjectionPoint::instance_by_name::<Node>("node", Parameters::new().with(remaining - 1)).into()
        });
        Node { next }
    }
}

impl Component for Node {
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        self.next.iter().map(|next| ("next", next)).collect()
    }
}

impl Injectable for Node {
    fn type_key() -> &'static str {
        "node"
    }

    fn create(parameters: &Parameters) -> DiResult<Self> {
        Ok(Node::with_remaining(*parameters.get::<usize>(0)?))
    }
}

async fn node_config() -> Config {
    let config = Config::new();
    config.add_prototype::<Node>();
    config.finalize().await.unwrap();
    config
}

#[tokio::test]
async fn test_chain_at_depth_ceiling_succeeds() {
    let config = node_config().await;
    let root = Arc::new(Node::with_remaining(MAX_DEPTH));
    inject(root.clone(), &config).await.unwrap();

    let mut hops = 0;
    let mut current = root;
    while let Some(next) = current.next.as_ref() {
        current = next.get::<Node>().expect("wired");
        hops += 1;
    }
    assert_eq!(hops, MAX_DEPTH);
}

#[tokio::test]
async fn test_chain_past_depth_ceiling_fails() {
    let config = node_config().await;
    let root = Arc::new(Node::with_remaining(MAX_DEPTH + 1));
    assert_eq!(
        inject(root, &config).await.err(),
        Some(DiError::InjectionTooDeep(MAX_DEPTH + 1))
    );
}

#[tokio::test]
async fn test_self_referencing_prototype_is_too_deep() {
    struct Recursive {
        me: Inject,
    }

    impl Component for Recursive {
        fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
            vec![("me", &self.me)]
        }
    }

    impl Injectable for Recursive {
        fn create(_: &Parameters) -> DiResult<Self> {
            Ok(Recursive { me: InjectionPoint::instance::<Recursive>().into() })
        }
    }

    let config = Config::new();
    config.add_prototype::<Recursive>();
    config.finalize().await.unwrap();

    let root = Arc::new(Recursive::create(&Parameters::new()).unwrap());
    assert!(matches!(inject(root, &config).await, Err(DiError::InjectionTooDeep(_))));
}

#[tokio::test]
async fn test_custom_depth_ceiling() {
    let config = node_config().await;
    let injector = Injector::with_settings(InjectorSettings::default().with_max_depth(2));

    injector.inject(Arc::new(Node::with_remaining(2)), &config).await.unwrap();
    assert_eq!(
        injector.inject(Arc::new(Node::with_remaining(3)), &config).await.err(),
        Some(DiError::InjectionTooDeep(3))
    );
}

struct Tagger;

impl Component for Tagger {}

impl Injectable for Tagger {
    fn type_key() -> &'static str {
        "tagger"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(Tagger)
    }
}

struct Tagged {
    tags: Mutex<Vec<&'static str>>,
}

impl Component for Tagged {}

#[async_trait]
impl InstanceProcessor for Tagger {
    async fn process(&self, instance: &Instance) -> DiResult<()> {
        if let Some(tagged) = (**instance).as_any().downcast_ref::<Tagged>() {
            tagged.tags.lock().unwrap().push("tagged");
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_instance_processor_runs_once_per_fresh_instance() {
    let config = Config::new();
    config.add_instance_processor::<Tagger>();
    config.add_prototype_factory("tagged", |_| {
        Ok(Arc::new(Tagged { tags: Mutex::new(Vec::new()) }) as Instance)
    });
    config.finalize().await.unwrap();

    let injector = Injector::new();
    let a = injector.resolve_as::<Tagged>("tagged", &config, &Parameters::new()).await.unwrap();
    let b = injector.resolve_as::<Tagged>("tagged", &config, &Parameters::new()).await.unwrap();
    assert_eq!(*a.tags.lock().unwrap(), vec!["tagged"]);
    assert_eq!(*b.tags.lock().unwrap(), vec!["tagged"]);
    assert_eq!(
        config.instance_processors().iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
        vec!["ferrous_inject::PostConstructProcessor".to_string(), "tagger".to_string()]
    );
}

#[tokio::test]
async fn test_failing_hook_propagates() {
    struct Fragile;

    #[async_trait]
    impl Component for Fragile {
        async fn post_construct(&self) -> DiResult<()> {
            Err(DiError::ResolutionFailed("fragile".to_string()))
        }
    }

    let config = Config::new();
    config.finalize().await.unwrap();
    assert_eq!(
        inject(Arc::new(Fragile), &config).await.err(),
        Some(DiError::ResolutionFailed("fragile".to_string()))
    );
}

#[tokio::test]
async fn test_singleton_with_failed_wiring_is_rebuilt() {
    let journal: Journal = Arc::default();
    let config = Config::new();
    let for_outer = journal.clone();
    config.add_singleton_factory("outer", move |_| {
        Ok(Arc::new(Outer::new(for_outer.clone())) as Instance)
    });
    config.finalize().await.unwrap();

    let injector = Injector::new();
    assert_eq!(
        injector.resolve("outer", &config, &Parameters::new()).await.err(),
        Some(DiError::UnknownTypeConfig("inner".to_string()))
    );
    assert!(!config.type_config("outer").unwrap().is_instantiated());

    let for_inner = journal.clone();
    config.add_singleton_factory("inner", move |_| {
        Ok(Arc::new(Inner { journal: for_inner.clone() }) as Instance)
    });
    config.finalize().await.unwrap();

    let outer = injector.resolve_as::<Outer>("outer", &config, &Parameters::new()).await.unwrap();
    assert!(outer.first.is_wired());
    assert!(outer.second.is_wired());
    assert_eq!(*journal.lock().unwrap(), vec!["inner", "outer"]);
}
