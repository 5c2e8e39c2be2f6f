//! Publish/subscribe bus multiplexing surface events to independent features.
//!
//! Channels are fixed; every channel exists from construction. Publishing runs a snapshot of the
//! channel's listeners in registration order, so a listener that unsubscribes (itself or another)
//! during a publish still sees the current publish complete, and the change applies to the next.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::input_event::KeyInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    KeyDown,
    KeyUp,
    ArrowUp,
    ArrowDown,
    Enter,
    Focus,
    Blur,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::KeyDown,
        Channel::KeyUp,
        Channel::ArrowUp,
        Channel::ArrowDown,
        Channel::Enter,
        Channel::Focus,
        Channel::Blur,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::KeyDown => "keyDown",
            Channel::KeyUp => "keyUp",
            Channel::ArrowUp => "arrowUp",
            Channel::ArrowDown => "arrowDown",
            Channel::Enter => "enter",
            Channel::Focus => "focus",
            Channel::Blur => "blur",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Event payload shared by every listener of one publish.
#[derive(Debug, Default)]
pub struct SurfaceEvent {
    key: Option<KeyInput>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl SurfaceEvent {
    pub fn key(input: KeyInput) -> Self {
        Self {
            key: Some(input),
            ..Self::default()
        }
    }

    /// Event without a key (focus, blur).
    pub fn bare() -> Self {
        Self::default()
    }

    /// Same key and default-prevented flag, for publishing on the next channel of one
    /// keystroke. Propagation starts fresh.
    pub fn continued(&self) -> Self {
        Self {
            key: self.key.clone(),
            default_prevented: Cell::new(self.default_prevented()),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn key_input(&self) -> Option<&KeyInput> {
        self.key.as_ref()
    }

    /// Suppress the surface's built-in action for this key.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Skip the remaining listeners of the current publish.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

type Listener<Cx> = Rc<RefCell<dyn FnMut(&SurfaceEvent, &mut Cx)>>;

struct Registry<Cx> {
    next_id: u64,
    channels: Vec<Vec<(u64, Listener<Cx>)>>,
}

trait RemoveListener {
    fn remove(&mut self, channel: Channel, id: u64);
}

impl<Cx> RemoveListener for Registry<Cx> {
    fn remove(&mut self, channel: Channel, id: u64) {
        self.channels[channel.index()].retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Handle returned by [`EventRouter::subscribe`].
///
/// Dropping the handle keeps the listener registered; call [`Subscription::unsubscribe`].
pub struct Subscription {
    registry: Weak<RefCell<dyn RemoveListener>>,
    channel: Channel,
    id: u64,
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Remove the listener. Repeated calls, or calls after the router is gone, do nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.channel, self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .finish()
    }
}

/// Listeners receive the event and mutable access to the shared context `Cx`.
pub struct EventRouter<Cx> {
    registry: Rc<RefCell<Registry<Cx>>>,
}

impl<Cx: 'static> EventRouter<Cx> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                channels: Channel::ALL.iter().map(|_| Vec::new()).collect(),
            })),
        }
    }

    pub fn subscribe<F>(&self, channel: Channel, listener: F) -> Subscription
    where
        F: FnMut(&SurfaceEvent, &mut Cx) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener<Cx> = Rc::new(RefCell::new(listener));
        registry.channels[channel.index()].push((id, listener));
        drop(registry);

        let weak: Weak<RefCell<Registry<Cx>>> = Rc::downgrade(&self.registry);
        let weak: Weak<RefCell<dyn RemoveListener>> = weak;
        Subscription {
            registry: weak,
            channel,
            id,
        }
    }

    /// Run the channel's current listeners in registration order.
    pub fn publish(&self, channel: Channel, event: &SurfaceEvent, cx: &mut Cx) {
        let snapshot: Vec<Listener<Cx>> = self.registry.borrow().channels[channel.index()]
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            if event.propagation_stopped() {
                break;
            }
            match listener.try_borrow_mut() {
                Ok(mut listener) => (&mut *listener)(event, cx),
                Err(_) => log::warn!(
                    "skipping re-entrant listener on channel {}",
                    channel.name()
                ),
            }
        }
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.registry.borrow().channels[channel.index()].len()
    }
}

impl<Cx: 'static> Default for EventRouter<Cx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cx> Clone for EventRouter<Cx> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<Cx> fmt::Debug for EventRouter<Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        let counts: Vec<(&str, usize)> = Channel::ALL
            .iter()
            .map(|channel| (channel.name(), registry.channels[channel.index()].len()))
            .collect();
        f.debug_struct("EventRouter")
            .field("listeners", &counts)
            .finish()
    }
}
