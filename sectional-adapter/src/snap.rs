/// Center-snap targeting for horizontal strips.
///
/// `candidates` are the start offsets of the cells near where the scroll
/// would naturally come to rest; `proposed` is the offset the host's
/// deceleration proposes; `velocity` is the sign of the fling.
///
/// With positive velocity only candidates to the right of the proposal
/// are considered (nearest first), falling back to the right-most when the
/// user flung past the last cell; negative velocity mirrors that to the
/// left; zero velocity takes the nearest candidate in either direction.
pub fn best_candidate(candidates: &[f32], proposed: f32, velocity: f32) -> Option<f32> {
    if velocity > 0.0 {
        nearest(candidates.iter().copied().filter(|&c| c > proposed), proposed)
            .or_else(|| candidates.last().copied())
    } else if velocity < 0.0 {
        nearest(candidates.iter().copied().filter(|&c| c < proposed), proposed)
            .or_else(|| candidates.first().copied())
    } else {
        nearest(candidates.iter().copied(), proposed)
    }
}

/// The final snap offset: the best candidate, shifted so the item of
/// `item_width` sits centered in a viewport of `viewport_width`.
pub fn snap_target(
    candidates: &[f32],
    proposed: f32,
    velocity: f32,
    viewport_width: f32,
    item_width: f32,
) -> f32 {
    let Some(best) = best_candidate(candidates, proposed, velocity) else {
        return proposed;
    };
    let padding = ((viewport_width - item_width) / 2.0).max(0.0);
    best - padding
}

fn nearest(candidates: impl Iterator<Item = f32>, proposed: f32) -> Option<f32> {
    candidates.fold(None, |best, candidate| match best {
        Some(best) if (best - proposed).abs() <= (candidate - proposed).abs() => Some(best),
        _ => Some(candidate),
    })
}
