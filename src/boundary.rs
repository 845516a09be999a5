//! Escape-and-recentre rule for a sprite moving inside a buffer

use tracing::debug;

use crate::geometry::{Extent, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryState {
    #[default]
    InBounds,
    Escaped,
}

/// Result of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryOutcome {
    /// Position to draw this frame
    pub position: Position,
    /// The sprite left the buffer this frame; fire the cue once
    pub escaped: bool,
}

/// Decides when a sprite has left its buffer.
///
/// A sprite has escaped as soon as any part of its bounding box is outside
/// the buffer. It is then put back in the centre. The policy reports
/// `Escaped` until the next evaluation, which sees the re-centred sprite
/// and returns to `InBounds`.
#[derive(Debug, Clone, Default)]
pub struct BoundaryPolicy {
    state: BoundaryState,
    escapes: u64,
}

impl BoundaryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BoundaryState {
        self.state
    }

    /// Number of escapes seen so far
    pub fn escapes(&self) -> u64 {
        self.escapes
    }

    /// Run once per frame, after input has moved the sprite and before it is
    /// drawn.
    pub fn evaluate(&mut self, pos: Position, buffer: Extent, sprite: Extent) -> BoundaryOutcome {
        if buffer.fits(pos, sprite) {
            self.state = BoundaryState::InBounds;
            return BoundaryOutcome {
                position: pos,
                escaped: false,
            };
        }

        self.state = BoundaryState::Escaped;
        self.escapes += 1;
        let reset = buffer.centered(sprite);
        debug!(
            from_x = pos.x,
            from_y = pos.y,
            to_x = reset.x,
            to_y = reset.y,
            "sprite escaped; recentring"
        );

        BoundaryOutcome {
            position: reset,
            escaped: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Extent = Extent::new(1024, 768);
    const SHIP: Extent = Extent::new(64, 64);

    #[test]
    fn test_left_escape_recentres() {
        let mut policy = BoundaryPolicy::new();
        let out = policy.evaluate(Position::new(-1, 300), SCREEN, SHIP);
        assert!(out.escaped);
        assert_eq!(out.position, Position::new(480, 352));
        assert_eq!(policy.escapes(), 1);
        assert_eq!(policy.state(), BoundaryState::Escaped);
    }

    #[test]
    fn test_escaped_state_lasts_until_next_evaluation() {
        let mut policy = BoundaryPolicy::new();
        assert_eq!(policy.state(), BoundaryState::InBounds);

        let out = policy.evaluate(Position::new(2000, 0), SCREEN, SHIP);
        assert_eq!(policy.state(), BoundaryState::Escaped);

        let again = policy.evaluate(out.position, SCREEN, SHIP);
        assert!(!again.escaped);
        assert_eq!(policy.state(), BoundaryState::InBounds);
        assert_eq!(policy.escapes(), 1);
    }

    #[test]
    fn test_inclusive_edges_stay_in_bounds() {
        let mut policy = BoundaryPolicy::new();
        for pos in [Position::new(0, 0), Position::new(1024 - 64, 768 - 64)] {
            let out = policy.evaluate(pos, SCREEN, SHIP);
            assert!(!out.escaped, "{:?} should be in bounds", pos);
            assert_eq!(out.position, pos);
        }
        assert_eq!(policy.escapes(), 0);
    }

    #[test]
    fn test_one_past_each_edge_escapes() {
        let mut policy = BoundaryPolicy::new();
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(1024 - 64 + 1, 0),
            Position::new(0, 768 - 64 + 1),
        ] {
            assert!(policy.evaluate(pos, SCREEN, SHIP).escaped, "{:?}", pos);
        }
        assert_eq!(policy.escapes(), 4);
    }

    #[test]
    fn test_reset_position_is_always_in_bounds() {
        let mut policy = BoundaryPolicy::new();
        for (bw, bh, sw, sh) in [(1024, 768, 64, 64), (11, 7, 3, 2), (5, 5, 5, 5), (9, 9, 1, 8)] {
            let buffer = Extent::new(bw, bh);
            let sprite = Extent::new(sw, sh);
            let out = policy.evaluate(Position::new(-100, -100), buffer, sprite);
            assert!(out.escaped);
            assert!(buffer.fits(out.position, sprite));
            assert!(!policy.evaluate(out.position, buffer, sprite).escaped);
        }
    }

    #[test]
    fn test_escape_matches_compositor_clipping() {
        // Escaped exactly when at least one sprite pixel would be clipped
        let buffer = Extent::new(8, 6);
        let sprite = Extent::new(3, 2);
        let mut policy = BoundaryPolicy::new();
        for x in -4..10 {
            for y in -4..8 {
                let pos = Position::new(x, y);
                let any_clipped = (0..sprite.height as i64).any(|i| {
                    (0..sprite.width as i64)
                        .any(|n| !buffer.contains(x as i64 + n, y as i64 + i))
                });
                assert_eq!(policy.evaluate(pos, buffer, sprite).escaped, any_clipped);
            }
        }
    }
}
