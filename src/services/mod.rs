//! Service layer
//!
//! Binds the discovery engine to a live cluster. The engine itself only sees
//! the `ServiceLister` trait; this layer supplies the client-backed lister.

pub mod dependency_service;

pub use dependency_service::DependencyService;
