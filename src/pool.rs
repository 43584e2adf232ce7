//! User-facing pool handle

use crate::config::{Milliseconds, TimeUnit, WaitPolicy};
use crate::errors::{PoolError, PoolResult};
use crate::metrics::PoolMetrics;
use crate::pooled::PooledObject;
use crate::store::PoolStore;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Thread-safe pool of caller-supplied resources
///
/// `U` and `WAIT` fix the wait policy: with `WAIT == 0` (the default)
/// [`Pool::acquire`] never blocks, otherwise it blocks up to `WAIT` units of
/// `U` for a resource to be added or returned.
///
/// Cloning a `Pool` shares the same underlying resources. The store lives as
/// long as some clone does; resources still on loan when the last clone is
/// dropped are destroyed when their handles are.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{Pool, Seconds};
///
/// let pool: Pool<String, Seconds, 1> = Pool::new();
/// pool.add(Box::new("conn-1".to_string()));
///
/// let conn = pool.acquire().unwrap();
/// assert_eq!(conn.as_str(), "conn-1");
/// ```
pub struct Pool<T: ?Sized, U = Milliseconds, const WAIT: u64 = 0> {
    store: Arc<PoolStore<T>>,
    _unit: PhantomData<fn() -> U>,
}

impl<T: ?Sized + Send + 'static, U: TimeUnit, const WAIT: u64> Pool<T, U, WAIT> {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            store: PoolStore::new(WaitPolicy::of::<U, WAIT>()),
            _unit: PhantomData,
        }
    }

    /// Hand a resource to the pool, waking one blocked `acquire` if any
    pub fn add(&self, resource: Box<T>) {
        self.store.add(resource);
    }

    /// Add every resource yielded by `resources`
    pub fn add_all<I>(&self, resources: I)
    where
        I: IntoIterator<Item = Box<T>>,
    {
        for resource in resources {
            self.store.add(resource);
        }
    }

    /// Borrow the most recently added or returned idle resource
    ///
    /// Returns `None` when nothing is idle on a non-blocking pool, or when the
    /// wait window of a blocking pool passes without a resource appearing.
    pub fn acquire(&self) -> Option<PooledObject<T>> {
        self.store.acquire()
    }

    /// Like [`Pool::acquire`], reporting why nothing was borrowed
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{Pool, PoolError};
    ///
    /// let pool: Pool<u32> = Pool::new();
    /// assert_eq!(pool.get().unwrap_err(), PoolError::PoolEmpty);
    /// ```
    pub fn get(&self) -> PoolResult<PooledObject<T>> {
        self.acquire().ok_or_else(|| self.unavailable())
    }

    /// Borrow a resource from async code, waiting per the pool's policy
    pub async fn acquire_async(&self) -> Option<PooledObject<T>> {
        self.store.acquire_async().await
    }

    /// Async counterpart of [`Pool::get`]
    pub async fn get_async(&self) -> PoolResult<PooledObject<T>> {
        match self.acquire_async().await {
            Some(object) => Ok(object),
            None => Err(self.unavailable()),
        }
    }

    /// The wait policy selected by this pool's type
    pub fn wait_policy(&self) -> WaitPolicy {
        self.store.policy()
    }

    /// Number of resources idle right now
    pub fn idle_count(&self) -> usize {
        self.store.idle_count()
    }

    /// Remove all idle resources and give them back to the caller
    ///
    /// Resources on loan are unaffected and still return here when dropped.
    pub fn drain_idle(&self) -> Vec<Box<T>> {
        self.store.drain_idle()
    }

    /// Snapshot of this pool's counters
    pub fn metrics(&self) -> PoolMetrics {
        self.store.metrics()
    }

    /// Whether `a` and `b` share one set of resources
    pub fn same_pool(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.store, &b.store)
    }

    fn unavailable(&self) -> PoolError {
        match self.wait_policy() {
            WaitPolicy::NoWait => PoolError::PoolEmpty,
            WaitPolicy::Timeout(timeout) => PoolError::Timeout(timeout),
        }
    }
}

impl<T: Send + 'static, U: TimeUnit, const WAIT: u64> Pool<T, U, WAIT> {
    /// Create a pool holding the given, already constructed, resources
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::Pool;
    ///
    /// let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3]);
    /// assert_eq!(pool.idle_count(), 3);
    /// assert_eq!(*pool.acquire().unwrap(), 3);
    /// ```
    pub fn from_resources<I>(resources: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let pool = Self::new();
        pool.add_all(resources.into_iter().map(Box::new));
        pool
    }
}

impl<T: ?Sized + Send + 'static, U: TimeUnit, const WAIT: u64> Default for Pool<T, U, WAIT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, U, const WAIT: u64> Clone for Pool<T, U, WAIT> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _unit: PhantomData,
        }
    }
}

impl<T: ?Sized + Send + 'static, U: TimeUnit, const WAIT: u64> fmt::Debug for Pool<T, U, WAIT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("wait_policy", &self.wait_policy())
            .field("idle", &self.idle_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Hours, Seconds};
    use std::time::{Duration, Instant};

    #[test]
    fn test_pool_basic() {
        let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3]);

        {
            let obj = pool.acquire().unwrap();
            assert!([1, 2, 3].contains(&*obj));
            assert_eq!(pool.idle_count(), 2);
        }

        assert_eq!(pool.idle_count(), 3);
    }

    #[test]
    fn test_round_trip_identity() {
        let pool: Pool<[u8; 5]> = Pool::new();
        let resource = Box::new([0u8; 5]);
        let address: *const [u8; 5] = &*resource;
        pool.add(resource);

        let borrowed = pool.acquire().unwrap();
        assert!(std::ptr::eq(&*borrowed, address));
    }

    #[test]
    fn test_clones_share_store() {
        let pool: Pool<i32> = Pool::new();
        let other = pool.clone();
        assert!(Pool::same_pool(&pool, &other));
        assert!(!Pool::same_pool(&pool, &Pool::new()));

        pool.add(Box::new(11));
        assert_eq!(*other.acquire().unwrap(), 11);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_get_errors_follow_policy() {
        let no_wait: Pool<i32> = Pool::new();
        assert_eq!(no_wait.get().unwrap_err(), PoolError::PoolEmpty);

        let blocking: Pool<i32, Milliseconds, 10> = Pool::new();
        assert_eq!(
            blocking.get().unwrap_err(),
            PoolError::Timeout(Duration::from_millis(10))
        );
    }

    #[test]
    fn test_wait_policy_from_type() {
        let pool: Pool<i32, Hours, 1> = Pool::default();
        assert_eq!(pool.wait_policy(), WaitPolicy::Timeout(Duration::from_secs(3600)));

        let pool: Pool<i32, Hours> = Pool::default();
        assert_eq!(pool.wait_policy(), WaitPolicy::NoWait);
    }

    #[test]
    fn test_unsized_resources() {
        let pool: Pool<dyn Fn(u32) -> u32 + Send> = Pool::new();
        pool.add(Box::new(|x: u32| x * 2));

        let double = pool.acquire().unwrap();
        assert_eq!((*double)(21), 42);
    }

    #[test]
    fn test_debug_output() {
        let pool: Pool<i32> = Pool::from_resources(vec![1]);
        assert_eq!(format!("{:?}", pool), "Pool { wait_policy: NoWait, idle: 1 }");
    }

    #[tokio::test]
    async fn test_async_get() {
        let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3]);

        {
            let obj = pool.get_async().await.unwrap();
            assert!([1, 2, 3].contains(&*obj));
        }

        let empty: Pool<i32> = Pool::new();
        assert_eq!(empty.get_async().await.unwrap_err(), PoolError::PoolEmpty);
    }

    #[tokio::test]
    async fn test_async_waits_for_return() {
        let pool: Pool<i32, Seconds, 10> = Pool::from_resources(vec![7]);
        let held = pool.acquire().unwrap();

        let returner = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(held);
        });

        let start = Instant::now();
        assert_eq!(*pool.acquire_async().await.unwrap(), 7);
        assert!(start.elapsed() < Duration::from_secs(10));
        returner.await.unwrap();
    }
}
