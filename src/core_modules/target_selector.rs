// THEORY:
// The `target_selector` reduces a frame's candidate list to at most one
// winner. The rule: the winner is the candidate whose bounding box reaches
// furthest toward the bottom edge of the frame (maximum `y + height` — for
// a forward-facing camera, the nearest object). The rule is tie-aware: if
// two candidates share the maximum bottom edge, the frame is ambiguous and
// there is NO winner. Ties are never broken arbitrarily; an ambiguous frame
// simply yields nothing and the next frame decides fresh.
//
// Like the detector, this is a stateless pure function over a single
// frame's data — independently testable with no camera or GPIO anywhere in
// sight.

use crate::core_modules::candidate::Candidate;

/// Picks the unique bottom-most candidate, or `None` when the input is
/// empty or the bottom-most position is shared.
pub fn select(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut winner: Option<&Candidate> = None;
    let mut tied = false;

    for candidate in candidates {
        match winner {
            None => {
                winner = Some(candidate);
            }
            Some(current) => {
                let bottom = candidate.bounding_box.bottom();
                let best = current.bounding_box.bottom();
                if bottom > best {
                    winner = Some(candidate);
                    tied = false;
                } else if bottom == best {
                    tied = true;
                }
            }
        }
    }

    if tied { None } else { winner }
}
