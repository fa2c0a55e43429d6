//! Latest-value publication.
//!
//! A [`Published`] value always holds exactly one current value. Subscribers
//! see it immediately on subscription and are woken on every later publish.
//! Publishing replaces the whole value, so a reader never observes a
//! half-applied update. Dropping a [`Subscription`] unsubscribes.

use tokio::sync::watch;

#[derive(Debug)]
pub struct Published<T> {
  tx: watch::Sender<T>,
}

impl<T: Clone> Published<T> {
  pub fn new(initial: T) -> Self {
    let (tx, _rx) = watch::channel(initial);
    Self { tx }
  }

  /// Replace the current value and wake every subscriber.
  pub fn publish(&self, value: T) { self.tx.send_replace(value); }

  pub fn current(&self) -> T { self.tx.borrow().clone() }

  pub fn subscribe(&self) -> Subscription<T> {
    Subscription { rx: self.tx.subscribe() }
  }

  pub fn has_subscribers(&self) -> bool { self.tx.receiver_count() > 0 }
}

/// A handle on a [`Published`] value.
#[derive(Debug, Clone)]
pub struct Subscription<T> {
  rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
  /// The most recently published value.
  pub fn latest(&self) -> T { self.rx.borrow().clone() }

  /// Wait for the next publish and return the new value, or `None` once the
  /// publisher is gone.
  ///
  /// Publishes that land while nobody is waiting collapse into one wakeup
  /// carrying the newest value.
  pub async fn changed(&mut self) -> Option<T> {
    self.rx.changed().await.ok()?;
    Some(self.rx.borrow_and_update().clone())
  }
}
