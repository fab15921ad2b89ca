//! Core traits for the injection container.

mod component;
mod processor;

pub use component::{downcast, AsAny, Component, Injectable, Instance};
pub use processor::{ConfigProcessor, InstanceProcessor};
