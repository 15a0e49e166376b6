use async_trait::async_trait;

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventPublisher;

impl<E> EventPublisher<E> for NoopEventPublisher {
    fn publish(&self, _event: &E) {}
}

/// Directory operation kinds, used to pick a simulated delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Output port: artificial delay awaited before each operation touches the store.
#[async_trait]
pub trait LatencyPort: Send + Sync {
    async fn delay(&self, op: Operation);
}

/// No delay at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl LatencyPort for NoLatency {
    async fn delay(&self, _op: Operation) {}
}
