//! Borrowed handles and the adapter that sends them home

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use tracing::debug;

/// Implemented by the store a [`Returner`] repatriates resources to.
pub(crate) trait ReturnResource<T: ?Sized>: Send + Sync {
    /// Put a resource whose loan has ended back into circulation
    fn return_resource(&self, resource: Box<T>);
}

/// Return adapter attached to every handle.
///
/// Holds only a weak reference to its store, so resources on loan never keep
/// a pool alive.
pub(crate) struct Returner<T: ?Sized> {
    store: Weak<dyn ReturnResource<T>>,
}

impl<T: ?Sized> Returner<T> {
    pub fn new(store: Weak<dyn ReturnResource<T>>) -> Self {
        Self { store }
    }

    /// Hand `resource` back to its store, or destroy it if the store is gone.
    pub fn release(&self, resource: Box<T>) {
        match self.store.upgrade() {
            Some(store) => store.return_resource(resource),
            None => {
                debug!("pool is gone, destroying resource");
                drop(resource);
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.store.strong_count() > 0
    }
}

/// A resource borrowed from a pool, returned to it when dropped
///
/// If the pool has been dropped in the meantime the resource is destroyed
/// instead. Either way it happens exactly once, including during unwinding.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::Pool;
///
/// let pool: Pool<Vec<u8>> = Pool::new();
/// pool.add(Box::new(Vec::with_capacity(1024)));
///
/// {
///     let mut buf = pool.acquire().unwrap();
///     buf.extend_from_slice(b"hello");
///     assert_eq!(buf.len(), 5);
/// }
///
/// // Back in the pool, contents untouched.
/// assert_eq!(pool.acquire().unwrap().len(), 5);
/// ```
pub struct PooledObject<T: ?Sized> {
    /// `Some` until drop or detach
    resource: Option<Box<T>>,
    returner: Returner<T>,
}

impl<T: ?Sized> PooledObject<T> {
    pub(crate) fn new(resource: Box<T>, returner: Returner<T>) -> Self {
        Self {
            resource: Some(resource),
            returner,
        }
    }

    /// Take the resource out of pool management permanently.
    ///
    /// The pool neither gets it back nor destroys it; the caller owns it.
    pub fn detach(mut this: Self) -> Box<T> {
        this.resource.take().expect("resource present until drop")
    }

    /// Whether the pool this resource came from still exists
    pub fn is_pool_alive(this: &Self) -> bool {
        this.returner.is_alive()
    }
}

impl<T: ?Sized> Deref for PooledObject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.resource.as_deref().expect("resource present until drop")
    }
}

impl<T: ?Sized> DerefMut for PooledObject<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resource.as_deref_mut().expect("resource present until drop")
    }
}

impl<T: ?Sized> AsRef<T> for PooledObject<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T: ?Sized> AsMut<T> for PooledObject<T> {
    fn as_mut(&mut self) -> &mut T {
        self
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for PooledObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledObject")
            .field("resource", &self.resource)
            .field("pool_alive", &self.returner.is_alive())
            .finish()
    }
}

impl<T: ?Sized> Drop for PooledObject<T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.returner.release(resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Collector {
        returned: Mutex<Vec<Box<u32>>>,
    }

    impl ReturnResource<u32> for Collector {
        fn return_resource(&self, resource: Box<u32>) {
            self.returned.lock().push(resource);
        }
    }

    fn returner_for(collector: &Arc<Collector>) -> Returner<u32> {
        let weak = Arc::downgrade(collector);
        let store: Weak<dyn ReturnResource<u32>> = weak;
        Returner::new(store)
    }

    #[test]
    fn test_drop_returns_to_live_store() {
        let collector = Arc::new(Collector::default());
        let object = PooledObject::new(Box::new(7), returner_for(&collector));
        assert!(PooledObject::is_pool_alive(&object));
        assert_eq!(*object, 7);

        drop(object);
        assert_eq!(collector.returned.lock().len(), 1);
        assert_eq!(*collector.returned.lock()[0], 7);
    }

    #[test]
    fn test_drop_after_store_gone() {
        let collector = Arc::new(Collector::default());
        let object = PooledObject::new(Box::new(7), returner_for(&collector));
        drop(collector);

        assert!(!PooledObject::is_pool_alive(&object));
        // Nothing to return to; the box is freed here.
        drop(object);
    }

    #[test]
    fn test_detach_skips_return() {
        let collector = Arc::new(Collector::default());
        let mut object = PooledObject::new(Box::new(1), returner_for(&collector));
        *object += 41;

        let resource = PooledObject::detach(object);
        assert_eq!(*resource, 42);
        assert!(collector.returned.lock().is_empty());
    }

    #[test]
    fn test_unsized_resource() {
        struct Sink;
        impl ReturnResource<str> for Sink {
            fn return_resource(&self, _resource: Box<str>) {}
        }

        let sink = Arc::new(Sink);
        let weak = Arc::downgrade(&sink);
        let store: Weak<dyn ReturnResource<str>> = weak;
        let object = PooledObject::new(Box::<str>::from("pooled"), Returner::new(store));
        assert_eq!(&*object, "pooled");
        assert_eq!(object.as_ref().len(), 6);
    }
}
