/// Change notification shared by the registries
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listener = Rc<dyn Fn()>;

/// Push (listeners) and pull (revision counter) views of "something changed".
#[derive(Default)]
pub struct Notifier {
    revision: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Bump the revision and call every listener
    pub fn notify(&self) {
        self.revision.set(self.revision.get() + 1);

        // Listeners may subscribe or query the registry while running.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("revision", &self.revision.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
