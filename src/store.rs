//! Synchronized backing store shared by every facade of one pool

use crate::config::WaitPolicy;
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::pooled::{PooledObject, ReturnResource, Returner};

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::Notify;
use tracing::{debug, trace};

/// Idle resources, the lock guarding them and the signals waiters park on.
///
/// Idle resources are kept LIFO: both `add` and automatic returns push to the
/// front and acquisition pops from the front.
pub(crate) struct PoolStore<T: ?Sized> {
    /// Weak self reference handed to every resource entering the store
    this: Weak<Self>,
    idle: Mutex<VecDeque<PooledObject<T>>>,
    available: Condvar,
    available_async: Notify,
    policy: WaitPolicy,
    metrics: MetricsTracker,
}

impl<T: ?Sized + Send + 'static> PoolStore<T> {
    pub fn new(policy: WaitPolicy) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            idle: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            available_async: Notify::new(),
            policy,
            metrics: MetricsTracker::new(),
        })
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    pub fn add(&self, resource: Box<T>) {
        MetricsTracker::increment(&self.metrics.total_added);
        let idle = self.push(resource);
        trace!(idle, "resource added");
    }

    /// Take an idle resource, waiting according to the store's policy.
    pub fn acquire(&self) -> Option<PooledObject<T>> {
        let mut idle = self.idle.lock();
        let mut deadline = None;

        loop {
            if let Some(object) = idle.pop_front() {
                drop(idle);
                return Some(self.acquired(object));
            }

            let timeout = match self.policy {
                WaitPolicy::NoWait => {
                    drop(idle);
                    return self.empty();
                }
                WaitPolicy::Timeout(timeout) => timeout,
            };

            // Evaluated once per call so wakeups never extend the window.
            match *deadline.get_or_insert_with(|| Instant::now().checked_add(timeout)) {
                Some(deadline) => {
                    let result = self.available.wait_until(&mut idle, deadline);
                    if result.timed_out() && idle.is_empty() {
                        drop(idle);
                        return self.timed_out();
                    }
                }
                None => self.available.wait(&mut idle),
            }
        }
    }

    /// Async counterpart of [`PoolStore::acquire`], parking a task instead of a thread.
    pub async fn acquire_async(&self) -> Option<PooledObject<T>> {
        let timeout = match self.policy {
            WaitPolicy::NoWait => {
                return match self.take_idle() {
                    Some(object) => Some(self.acquired(object)),
                    None => self.empty(),
                };
            }
            WaitPolicy::Timeout(timeout) => timeout,
        };

        let wait = async {
            loop {
                let notified = self.available_async.notified();
                tokio::pin!(notified);
                // Register before checking so an add in between is not missed.
                notified.as_mut().enable();

                if let Some(object) = self.take_idle() {
                    return object;
                }
                notified.await;
            }
        };

        let object = match tokio::time::Instant::now().checked_add(timeout) {
            Some(deadline) => tokio::time::timeout_at(deadline, wait)
                .await
                .ok()
                .or_else(|| self.take_idle()),
            None => Some(wait.await),
        };

        match object {
            Some(object) => Some(self.acquired(object)),
            None => self.timed_out(),
        }
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Remove every idle resource, handing ownership to the caller.
    pub fn drain_idle(&self) -> Vec<Box<T>> {
        let drained: Vec<_> = self.idle.lock().drain(..).collect();
        debug!(drained = drained.len(), "idle resources drained");
        drained.into_iter().map(PooledObject::detach).collect()
    }

    pub fn metrics(&self) -> PoolMetrics {
        self.metrics.get_metrics(self.idle_count())
    }

    /// Wrap `resource` with an adapter bound to this store and make it available.
    fn push(&self, resource: Box<T>) -> usize {
        let store: Weak<dyn ReturnResource<T>> = self.this.clone();
        let object = PooledObject::new(resource, Returner::new(store));

        let idle = {
            let mut idle = self.idle.lock();
            idle.push_front(object);
            idle.len()
        };

        self.available.notify_one();
        self.available_async.notify_one();
        idle
    }

    fn take_idle(&self) -> Option<PooledObject<T>> {
        self.idle.lock().pop_front()
    }

    fn acquired(&self, object: PooledObject<T>) -> PooledObject<T> {
        MetricsTracker::increment(&self.metrics.total_acquired);
        trace!("resource acquired");
        object
    }

    fn empty(&self) -> Option<PooledObject<T>> {
        MetricsTracker::increment(&self.metrics.empty_events);
        trace!("pool empty");
        None
    }

    fn timed_out(&self) -> Option<PooledObject<T>> {
        MetricsTracker::increment(&self.metrics.timeouts);
        debug!(timeout = ?self.policy.timeout(), "timed out waiting for a resource");
        None
    }
}

impl<T: ?Sized + Send + 'static> ReturnResource<T> for PoolStore<T> {
    fn return_resource(&self, resource: Box<T>) {
        MetricsTracker::increment(&self.metrics.total_returned);
        let idle = self.push(resource);
        trace!(idle, "resource returned");
    }
}

impl<T: ?Sized> Drop for PoolStore<T> {
    fn drop(&mut self) {
        // The idle handles fail to upgrade `this` from here on and free their resources.
        let idle = self.idle.get_mut().len();
        if idle > 0 {
            debug!(idle, "pool dropped with idle resources");
        }
    }
}
