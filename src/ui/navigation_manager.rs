/// Position within a gallery of `total` items. `None` means nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationManager {
    total: usize,
    current_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationAvailability {
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

impl NavigationManager {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current_index: None,
        }
    }

    /// Selects `index`; out-of-range values leave the selection unchanged.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.total {
            self.current_index = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.current_index = None;
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index {
            Some(i) if i > 0 => {
                self.current_index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    pub fn next(&mut self) -> bool {
        match self.current_index {
            Some(i) if i + 1 < self.total => {
                self.current_index = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_index.is_some_and(|i| i > 0)
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index.is_some_and(|i| i + 1 < self.total)
    }

    pub fn availability(&self) -> NavigationAvailability {
        NavigationAvailability {
            can_go_previous: self.can_go_previous(),
            can_go_next: self.can_go_next(),
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }
}
