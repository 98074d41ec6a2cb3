//! Periodic refresh of a driver's position.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rideline_core::location::{DriverLocation, LocationFix};
use rideline_services::location::LocationApi;
use rideline_services::ServiceError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

/// How often a tracked driver's position is re-read.
pub const LOCATION_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

#[async_trait]
pub trait LocationSource: Send + Sync + 'static {
    async fn fetch(&self, driver_id: &str) -> Result<DriverLocation, ServiceError>;
}

#[async_trait]
impl LocationSource for LocationApi {
    async fn fetch(&self, driver_id: &str) -> Result<DriverLocation, ServiceError> {
        self.get(driver_id).await
    }
}

/// Owner of a running tracker. Dropping it stops the refresh loop.
pub struct TrackerHandle {
    driver_id: String,
    rx: watch::Receiver<Option<LocationFix>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl TrackerHandle {
    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    /// The most recent successful reading, if any.
    pub fn latest(&self) -> Option<LocationFix> {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<LocationFix>> {
        self.rx.clone()
    }

    /// Stop refreshing and wait for the loop to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(driver_id = %self.driver_id, error = %e, "Location tracker task failed");
        }
    }
}

/// Read `driver_id`'s location now and then every `every`.
pub fn spawn_tracker<S: LocationSource>(
    source: Arc<S>,
    driver_id: impl Into<String>,
    every: Duration,
) -> TrackerHandle {
    let driver_id = driver_id.into();
    let (tx, rx) = watch::channel(None);
    let cancel = CancellationToken::new();

    let task = {
        let cancel = cancel.clone();
        let driver_id = driver_id.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(%driver_id, interval_secs = every.as_secs(), "Location tracker started");

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let reading = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    reading = source.fetch(&driver_id) => reading,
                };

                match reading {
                    Ok(mut location) if location.is_valid() => {
                        if location.driver_id.is_empty() {
                            location.driver_id = driver_id.clone();
                        }
                        tracing::debug!(
                            %driver_id,
                            latitude = location.latitude,
                            longitude = location.longitude,
                            "Location updated",
                        );
                        tx.send_replace(Some(LocationFix {
                            location,
                            received_at: Utc::now(),
                        }));
                    }
                    Ok(location) => {
                        tracing::warn!(
                            %driver_id,
                            latitude = location.latitude,
                            longitude = location.longitude,
                            "Ignoring out-of-range location",
                        );
                    }
                    Err(e) => {
                        tracing::warn!(%driver_id, error = %e, "Failed to refresh location");
                    }
                }
            }

            tracing::info!(%driver_id, "Location tracker stopped");
        })
    };

    TrackerHandle {
        driver_id,
        rx,
        _guard: cancel.clone().drop_guard(),
        cancel,
        task,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    struct FakeLocations {
        readings: Mutex<VecDeque<Result<DriverLocation, ServiceError>>>,
        calls: AtomicUsize,
    }

    impl FakeLocations {
        fn new(readings: Vec<Result<DriverLocation, ServiceError>>) -> Arc<Self> {
            Arc::new(Self {
                readings: Mutex::new(readings.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LocationSource for FakeLocations {
        async fn fetch(&self, _driver_id: &str) -> Result<DriverLocation, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.readings.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(ServiceError::Api {
                    status: 404,
                    message: "Location not found".into(),
                })
            })
        }
    }

    fn at(latitude: f64, longitude: f64) -> DriverLocation {
        DriverLocation {
            driver_id: String::new(),
            latitude,
            longitude,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reads_immediately_then_every_interval() {
        let source = FakeLocations::new(vec![Ok(at(12.97, 77.59)), Ok(at(12.98, 77.60))]);
        let handle = spawn_tracker(source.clone(), "driver_101", LOCATION_REFRESH_INTERVAL);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        let first = handle.latest().unwrap();
        assert_eq!(first.location.latitude, 12.97);
        assert_eq!(first.location.driver_id, "driver_101");

        tokio::time::sleep(LOCATION_REFRESH_INTERVAL).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(handle.latest().unwrap().location.latitude, 12.98);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_keep_the_last_reading() {
        let source = FakeLocations::new(vec![Ok(at(12.97, 77.59))]);
        let handle = spawn_tracker(source.clone(), "driver_101", LOCATION_REFRESH_INTERVAL);

        tokio::time::sleep(LOCATION_REFRESH_INTERVAL * 3 + Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 4);
        assert_eq!(handle.latest().unwrap().location.latitude, 12.97);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_readings_are_skipped() {
        let source = FakeLocations::new(vec![Ok(at(123.0, 77.59))]);
        let handle = spawn_tracker(source.clone(), "driver_101", LOCATION_REFRESH_INTERVAL);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        assert!(handle.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_refreshing() {
        let source = FakeLocations::new(vec![]);
        let handle = spawn_tracker(source.clone(), "driver_101", LOCATION_REFRESH_INTERVAL);

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(LOCATION_REFRESH_INTERVAL * 4).await;
        assert_eq!(source.calls(), 1);
    }
}
