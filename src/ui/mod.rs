/// UI state that lives outside the view tree
///
/// - The fade sequence around picture imports (transition.rs)
/// - Modal notifications after a save request (notification.rs)

pub mod notification;
pub mod transition;
