// EVENT COMPONENT -------------------------------------------------------------

/// Outcome of a button poll. A timeout is its own variant rather than a
/// reserved button index, so it can never collide with a real line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Line indices (1-based, 0 is the pulse line) that read true this poll.
    Pressed(Vec<usize>),
    /// The armed timeout window elapsed with no real press.
    Timeout,
}

/// The most recent button outcome, readable without triggering a sample.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LastPressed {
    #[default]
    None,
    Buttons(Vec<usize>),
    Timeout,
}

impl ButtonEvent {
    /// Whether a `Pressed` event satisfies a wait restricted to `targets`.
    /// Timeouts always satisfy the wait.
    pub fn matches(&self, targets: Option<&[usize]>) -> bool {
        match self {
            ButtonEvent::Timeout => true,
            ButtonEvent::Pressed(indices) => match targets {
                None => true,
                Some(wanted) => indices.iter().any(|i| wanted.contains(i)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_matches_intersecting_targets() {
        let ev = ButtonEvent::Pressed(vec![2, 3]);
        assert!(ev.matches(None));
        assert!(ev.matches(Some(&[3])));
        assert!(!ev.matches(Some(&[1, 4])));
    }

    #[test]
    fn timeout_matches_any_targets() {
        assert!(ButtonEvent::Timeout.matches(Some(&[1])));
        assert!(ButtonEvent::Timeout.matches(None));
    }
}
