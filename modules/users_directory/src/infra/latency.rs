use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{LatencyPort, Operation};

/// Per-operation delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyProfile {
    pub list: Duration,
    pub get: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl LatencyProfile {
    /// Delays of a slow remote backend, handy for demos and UI work.
    pub fn demo() -> Self {
        Self {
            list: Duration::from_millis(500),
            get: Duration::from_millis(300),
            create: Duration::from_millis(800),
            update: Duration::from_millis(600),
            delete: Duration::from_millis(400),
        }
    }

    pub fn for_operation(&self, op: Operation) -> Duration {
        match op {
            Operation::List => self.list,
            Operation::Get => self.get,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Sleeps on the tokio timer for the configured duration.
#[derive(Debug, Clone)]
pub struct SimulatedLatency {
    profile: LatencyProfile,
}

impl SimulatedLatency {
    pub fn new(profile: LatencyProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl LatencyPort for SimulatedLatency {
    async fn delay(&self, op: Operation) {
        let d = self.profile.for_operation(op);
        if !d.is_zero() {
            tracing::trace!(?op, delay_ms = d.as_millis() as u64, "simulated latency");
            tokio::time::sleep(d).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_profile_values() {
        let p = LatencyProfile::demo();
        assert_eq!(p.for_operation(Operation::List), Duration::from_millis(500));
        assert_eq!(p.for_operation(Operation::Get), Duration::from_millis(300));
        assert_eq!(p.for_operation(Operation::Create), Duration::from_millis(800));
        assert_eq!(p.for_operation(Operation::Update), Duration::from_millis(600));
        assert_eq!(p.for_operation(Operation::Delete), Duration::from_millis(400));
        assert!(LatencyProfile::default().is_zero());
    }

    #[tokio::test]
    async fn sleeps_for_configured_delay() {
        let latency = SimulatedLatency::new(LatencyProfile {
            create: Duration::from_millis(40),
            ..Default::default()
        });

        let started = tokio::time::Instant::now();
        latency.delay(Operation::Create).await;
        assert!(started.elapsed() >= Duration::from_millis(40));

        let started = tokio::time::Instant::now();
        latency.delay(Operation::Get).await;
        assert!(started.elapsed() < Duration::from_millis(40));
    }
}
