use async_trait::async_trait;

use crate::error::DiResult;
use crate::parameters::Parameters;
use crate::traits::{Component, Injectable, Instance, InstanceProcessor};

/// Built-in instance processor calling [`Component::post_construct`]
///
/// Registered first by [`Config::new`](crate::Config::new). Components that
/// do not override the hook resolve immediately.
#[derive(Debug, Default)]
pub struct PostConstructProcessor;

impl Component for PostConstructProcessor {}

impl Injectable for PostConstructProcessor {
    fn type_key() -> &'static str {
        "ferrous_inject::PostConstructProcessor"
    }

    fn create(_: &Parameters) -> DiResult<Self> {
        Ok(PostConstructProcessor)
    }
}

#[async_trait]
impl InstanceProcessor for PostConstructProcessor {
    async fn process(&self, instance: &Instance) -> DiResult<()> {
        instance.post_construct().await
    }
}
