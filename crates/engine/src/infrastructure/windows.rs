//! Window service keeping track of open windows.

use std::sync::{Mutex, MutexGuard, PoisonError};

use emberfall_domain::WindowId;

use crate::infrastructure::ports::WindowPort;

#[derive(Default)]
pub struct WindowRegistry {
    open: Mutex<Vec<WindowId>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_list(&self) -> MutexGuard<'_, Vec<WindowId>> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open windows, oldest first.
    pub fn open_windows(&self) -> Vec<WindowId> {
        self.open_list().clone()
    }

    pub fn is_open(&self, window: WindowId) -> bool {
        self.open_list().contains(&window)
    }

    pub fn close(&self, window: WindowId) {
        self.open_list().retain(|w| *w != window);
    }
}

impl WindowPort for WindowRegistry {
    fn open(&self, window: WindowId) {
        let mut open = self.open_list();
        if !open.contains(&window) {
            open.push(window);
            tracing::debug!(window = ?window, "Opened window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_twice_keeps_one_entry() {
        let windows = WindowRegistry::new();
        windows.open(WindowId::Shop);
        windows.open(WindowId::Settings);
        windows.open(WindowId::Shop);
        assert_eq!(
            windows.open_windows(),
            vec![WindowId::Shop, WindowId::Settings]
        );

        windows.close(WindowId::Shop);
        assert!(!windows.is_open(WindowId::Shop));
        assert!(windows.is_open(WindowId::Settings));
    }
}
