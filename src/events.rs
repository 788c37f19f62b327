//! Process-wide "unauthorized" broadcast.
//!
//! The client emits the signal after tearing down a session it could not recover. Listeners
//! (typically the UI shell forcing navigation to the login screen) register a callback; emission
//! is fire-and-forget and carries no payload.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle identifying a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct SignalInner {
	listeners: RwLock<Vec<(ListenerId, Listener)>>,
	next_id: AtomicU64,
	emitted: AtomicU64,
}

/// Cloneable broadcast channel for unauthorized events.
///
/// Clones share the same listener set, so one signal can be handed to every component that
/// cares about forced logouts.
#[derive(Clone, Default)]
pub struct UnauthorizedSignal(Arc<SignalInner>);
impl UnauthorizedSignal {
	/// Registers `listener`, returning an id usable with [`UnauthorizedSignal::unsubscribe`].
	pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
		let id = ListenerId(self.0.next_id.fetch_add(1, Ordering::Relaxed));

		self.0.listeners.write().push((id, Arc::new(listener)));

		id
	}

	/// Removes a listener; returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: ListenerId) -> bool {
		let mut listeners = self.0.listeners.write();
		let before = listeners.len();

		listeners.retain(|(registered, _)| *registered != id);

		listeners.len() != before
	}

	/// Notifies every registered listener.
	pub fn emit(&self) {
		self.0.emitted.fetch_add(1, Ordering::Relaxed);

		// Snapshot first so listeners may (un)subscribe without deadlocking.
		let listeners =
			self.0.listeners.read().iter().map(|(_, listener)| listener.clone()).collect::<Vec<_>>();

		for listener in listeners {
			listener();
		}
	}

	/// Number of times the signal has fired.
	pub fn emitted(&self) -> u64 {
		self.0.emitted.load(Ordering::Relaxed)
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.0.listeners.read().len()
	}
}
impl Debug for UnauthorizedSignal {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UnauthorizedSignal")
			.field("listeners", &self.listener_count())
			.field("emitted", &self.emitted())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::AtomicUsize;
	// self
	use super::*;

	#[test]
	fn emit_reaches_every_listener_once() {
		let signal = UnauthorizedSignal::default();
		let hits = Arc::new(AtomicUsize::new(0));

		for _ in 0..2 {
			let hits = hits.clone();

			signal.subscribe(move || {
				hits.fetch_add(1, Ordering::SeqCst);
			});
		}

		signal.emit();

		assert_eq!(hits.load(Ordering::SeqCst), 2);
		assert_eq!(signal.emitted(), 1);
	}

	#[test]
	fn unsubscribed_listeners_are_skipped() {
		let signal = UnauthorizedSignal::default();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = hits.clone();
		let id = signal.subscribe(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		assert!(signal.unsubscribe(id));
		assert!(!signal.unsubscribe(id));

		signal.clone().emit();

		assert_eq!(hits.load(Ordering::SeqCst), 0);
		assert_eq!(signal.emitted(), 1, "Clones must share emission state.");
	}
}
