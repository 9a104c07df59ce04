#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Next highlighted value for an arrow key.
///
/// Without a (visible) highlight both directions enter the list at its first
/// item. Otherwise the cursor moves by one and clamps at either end.
pub fn next(direction: Direction, visible: &[&str], current: Option<&str>) -> Option<String> {
    let first = visible.first()?;
    let pos = current.and_then(|c| visible.iter().position(|v| *v == c));
    let Some(pos) = pos else {
        return Some(first.to_string());
    };
    let idx = match direction {
        Direction::Up => pos.saturating_sub(1),
        Direction::Down => (pos + 1).min(visible.len() - 1),
    };
    Some(visible[idx].to_string())
}
