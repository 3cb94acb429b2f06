pub mod dom;
pub mod forms;
pub mod layout;
pub mod memory;
pub mod notification;
pub mod timers;

pub use dom::{Banner, Document, Scheduler, Selector, UiToolkit};
pub use forms::{has_unsaved_changes, validate_form};
pub use layout::{Bindings, LayoutController};
pub use memory::{MemoryDocument, NodeId};
pub use notification::{Notification, Notifier};
pub use timers::TimerQueue;

/// Closes an alert or banner whose dismissal timer fired. Elements removed in
/// the meantime are skipped.
pub fn dismiss<H: UiToolkit>(host: &mut H, element: &H::Element) -> bool {
    if !host.is_connected(element) {
        log::debug!("dismissal fired for a detached element");
        return false;
    }
    host.close_alert(element);
    true
}
