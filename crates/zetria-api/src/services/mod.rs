//! Service layer.

pub mod graph_events;

pub use graph_events::GraphEventPublisher;
