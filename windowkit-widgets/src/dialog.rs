use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque id of a focusable element, assigned by the host.
pub type FocusId = u64;

/// Focus id of the dialog's own close button.
pub const CLOSE_BUTTON: FocusId = FocusId::MAX;

pub type OnCloseCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogKey {
    Escape,
    Tab,
    ShiftTab,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    Ignored,
    Focused(FocusId),
    /// The dialog closed; the host should move focus back to `restore_focus`.
    Closed { restore_focus: Option<FocusId> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogOptions {
    pub show_close_button: bool,
    pub close_on_escape: bool,
    pub close_on_backdrop: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            show_close_button: false,
            close_on_escape: true,
            close_on_backdrop: true,
        }
    }
}

impl DialogOptions {
    pub fn with_close_button(mut self, show: bool) -> Self {
        self.show_close_button = show;
        self
    }

    pub fn with_close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn with_close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }
}

/// A modal dialog with a focus trap.
///
/// While open, focus cycles through the dialog's focusable elements only: `Tab` past the last
/// wraps to the first and `ShiftTab` before the first wraps to the last. On open the dialog
/// container itself holds focus (`current() == None`). Closing hands back the focus that was
/// active before opening.
pub struct Dialog {
    options: DialogOptions,
    members: Vec<FocusId>,
    is_open: bool,
    current: Option<FocusId>,
    return_focus: Option<FocusId>,
    on_close: Option<OnCloseCallback>,
}

impl Dialog {
    /// `members` are the focusable elements of the dialog content, in tab order.
    pub fn new(options: DialogOptions, members: Vec<FocusId>) -> Self {
        Self {
            options,
            members,
            is_open: false,
            current: None,
            return_focus: None,
            on_close: None,
        }
    }

    pub fn with_on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current(&self) -> Option<FocusId> {
        self.current
    }

    pub fn set_members(&mut self, members: Vec<FocusId>) {
        self.members = members;
        if self.current.is_some_and(|id| !self.contains(id)) {
            self.current = None;
        }
    }

    /// The trapped tab order: the close button (when shown) followed by the content.
    pub fn focus_ring(&self) -> Vec<FocusId> {
        let mut ring = Vec::with_capacity(self.members.len() + 1);
        if self.options.show_close_button {
            ring.push(CLOSE_BUTTON);
        }
        ring.extend_from_slice(&self.members);
        ring
    }

    fn contains(&self, id: FocusId) -> bool {
        (id == CLOSE_BUTTON && self.options.show_close_button) || self.members.contains(&id)
    }

    /// Opens the dialog, remembering `prior_focus` for [`close`](Self::close).
    ///
    /// Returns `false` if it was already open.
    pub fn open(&mut self, prior_focus: Option<FocusId>) -> bool {
        if self.is_open {
            return false;
        }
        self.is_open = true;
        self.current = None;
        self.return_focus = prior_focus;
        wdebug!(members = self.members.len(), "Dialog::open");
        true
    }

    /// Closes the dialog and returns the focus to restore. `None` when it was not open or
    /// nothing was focused before.
    pub fn close(&mut self) -> Option<FocusId> {
        if !self.is_open {
            return None;
        }
        self.is_open = false;
        self.current = None;
        if let Some(on_close) = &self.on_close {
            on_close();
        }
        wdebug!("Dialog::close");
        self.return_focus.take()
    }

    fn close_outcome(&mut self) -> DialogOutcome {
        let restore_focus = self.close();
        DialogOutcome::Closed { restore_focus }
    }

    /// Moves focus to `id` if it belongs to the dialog. Focus outside the trap is refused.
    pub fn focus(&mut self, id: FocusId) -> bool {
        if !self.is_open || !self.contains(id) {
            return false;
        }
        self.current = Some(id);
        true
    }

    pub fn handle_key(&mut self, key: DialogKey) -> DialogOutcome {
        if !self.is_open {
            return DialogOutcome::Ignored;
        }
        match key {
            DialogKey::Escape if self.options.close_on_escape => self.close_outcome(),
            DialogKey::Escape => DialogOutcome::Ignored,
            DialogKey::Tab => self.step(true),
            DialogKey::ShiftTab => self.step(false),
        }
    }

    fn step(&mut self, forward: bool) -> DialogOutcome {
        let ring = self.focus_ring();
        let Some(&first) = ring.first() else {
            return DialogOutcome::Ignored;
        };
        let last = ring[ring.len() - 1];
        let position = self
            .current
            .and_then(|id| ring.iter().position(|&m| m == id));

        let next = match (position, forward) {
            (None, true) => first,
            (None, false) => last,
            (Some(i), true) => ring[(i + 1) % ring.len()],
            (Some(i), false) => ring[(i + ring.len() - 1) % ring.len()],
        };
        self.current = Some(next);
        DialogOutcome::Focused(next)
    }

    /// A click on the overlay outside the dialog body.
    pub fn backdrop_click(&mut self) -> DialogOutcome {
        if self.is_open && self.options.close_on_backdrop {
            self.close_outcome()
        } else {
            DialogOutcome::Ignored
        }
    }

    pub fn close_button_click(&mut self) -> DialogOutcome {
        if self.is_open && self.options.show_close_button {
            self.close_outcome()
        } else {
            DialogOutcome::Ignored
        }
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("options", &self.options)
            .field("members", &self.members)
            .field("is_open", &self.is_open)
            .field("current", &self.current)
            .field("return_focus", &self.return_focus)
            .finish_non_exhaustive()
    }
}
