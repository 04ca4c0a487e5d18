use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

/// Single-threaded shared state cell with synchronous change notification.
///
/// Mutators run to completion through [`Observable::update`]; every live
/// subscriber is then notified, in registration order, before `update`
/// returns. Any read after a mutator call sees the new value.
///
/// The observable keeps only `Weak` references to callbacks; the strong
/// reference lives in the [`Subscription`] guard, so dropping the guard
/// unsubscribes before the next notification cycle. Dead entries are pruned
/// lazily during notification.
///
/// Callbacks may read the observable but must not call `update` again: the
/// model is a single run-to-completion transition per mutation (re-entrant
/// mutation panics on the inner `RefCell`).
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

struct Inner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Read access to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Clone out the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.borrow().value.clone()
    }

    /// Number of completed mutations. Increments exactly once per `update`.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Run a mutator to completion, then notify subscribers synchronously.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let result = f(&mut inner.value);
            inner.version += 1;
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (result, callbacks)
        };
        // Mutable borrow released: callbacks observe the settled value.
        let inner = self.inner.borrow();
        for callback in &callbacks {
            callback(&inner.value);
        }
        result
    }

    /// Register a change callback. The returned guard keeps it alive.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription<T> {
        let callback: Rc<Callback<T>> = Rc::new(f);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Observable {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

/// RAII guard for a registered callback; dropping it unsubscribes.
pub struct Subscription<T> {
    _callback: Rc<Callback<T>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_see_the_value_after_update() {
        let cell = Observable::new(1u32);
        cell.update(|n| *n = 5);
        assert_eq!(cell.get(), 5);
        assert_eq!(cell.with(|n| *n * 2), 10);
    }

    #[test]
    fn one_notification_per_mutation_in_registration_order() {
        let cell = Observable::new(0u32);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = Rc::clone(&log);
            cell.subscribe(move |n| log.borrow_mut().push(("first", *n)))
        };
        let second = {
            let log = Rc::clone(&log);
            cell.subscribe(move |n| log.borrow_mut().push(("second", *n)))
        };

        cell.update(|n| *n = 7);
        assert_eq!(&*log.borrow(), &[("first", 7), ("second", 7)]);

        drop(first);
        drop(second);
    }

    #[test]
    fn dropped_subscription_is_not_notified() {
        let cell = Observable::new(0u32);
        let count = Rc::new(RefCell::new(0));

        let sub = {
            let count = Rc::clone(&count);
            cell.subscribe(move |_| *count.borrow_mut() += 1)
        };
        cell.update(|n| *n = 1);
        assert_eq!(*count.borrow(), 1);

        drop(sub);
        cell.update(|n| *n = 2);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn version_counts_mutations_not_changes() {
        let cell = Observable::new(3u32);
        assert_eq!(cell.version(), 0);
        cell.update(|_| {});
        cell.update(|n| *n = 3);
        assert_eq!(cell.version(), 2);
    }

    #[test]
    fn callbacks_can_read_the_observable() {
        let cell = Observable::new(1u32);
        let seen = Rc::new(RefCell::new(0));
        let sub = {
            let reader = cell.clone();
            let seen = Rc::clone(&seen);
            cell.subscribe(move |_| *seen.borrow_mut() = reader.with(|n| *n))
        };
        cell.update(|n| *n = 9);
        assert_eq!(*seen.borrow(), 9);
        drop(sub);
    }
}
