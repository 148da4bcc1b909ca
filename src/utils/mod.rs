pub mod logger;

/// Splits a message list into what to show and how many were left out
pub fn bounded<T>(items: &[T], limit: usize) -> (&[T], usize) {
    let shown = &items[..items.len().min(limit)];
    (shown, items.len() - shown.len())
}
