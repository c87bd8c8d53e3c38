/// What a Tab press inside the modal should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction<F> {
    Suppress,
    Wrap(F),
    /// Let the platform move focus as usual.
    Default,
}

/// Keeps Tab cycling inside `focusables` (already filtered to enabled
/// elements, in tab order).
pub fn trap_tab<F: Clone + PartialEq>(
    focusables: &[F],
    focused: Option<&F>,
    backward: bool,
) -> TabAction<F> {
    let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
        return TabAction::Suppress;
    };

    match focused {
        Some(current) if backward && current == first => TabAction::Wrap(last.clone()),
        Some(current) if !backward && current == last => TabAction::Wrap(first.clone()),
        _ => TabAction::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_suppresses_tab() {
        assert_eq!(trap_tab::<u32>(&[], None, false), TabAction::Suppress);
        assert_eq!(trap_tab::<u32>(&[], Some(&1), true), TabAction::Suppress);
    }

    #[test]
    fn forward_from_last_wraps_to_first() {
        assert_eq!(trap_tab(&[1, 2], Some(&2), false), TabAction::Wrap(1));
    }

    #[test]
    fn backward_from_first_wraps_to_last() {
        assert_eq!(trap_tab(&[1, 2, 3], Some(&1), true), TabAction::Wrap(3));
    }

    #[test]
    fn interior_positions_use_default_traversal() {
        assert_eq!(trap_tab(&[1, 2, 3], Some(&2), false), TabAction::Default);
        assert_eq!(trap_tab(&[1, 2, 3], Some(&2), true), TabAction::Default);
        assert_eq!(trap_tab(&[1, 2, 3], Some(&1), false), TabAction::Default);
    }

    #[test]
    fn focus_outside_the_set_uses_default_traversal() {
        assert_eq!(trap_tab(&[1, 2], Some(&9), false), TabAction::Default);
        assert_eq!(trap_tab(&[1, 2], None, true), TabAction::Default);
    }
}
