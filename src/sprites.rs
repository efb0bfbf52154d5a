use std::collections::HashMap;

use serde::Deserialize;

use crate::movement::{Facing, Posture};

// ── SpriteFrame ──────────────────────────────────────────────────────────────

/// Axis-aligned pixel rectangle into the shared sprite sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ── SpriteTable ──────────────────────────────────────────────────────────────

/// Lookup of animation frames keyed by `(Facing, Posture)`, built once from
/// the sprite-record JSON and read-only afterwards.
///
/// Frames for a key keep their JSON order; that order *is* the walk cycle.
pub struct SpriteTable {
    frames: HashMap<(Facing, Posture), Vec<SpriteFrame>>,
}

impl SpriteTable {
    /// Deserialise a table from the sprite-record JSON schema:
    ///
    /// ```json
    /// { "sprites": [
    ///     { "direction": "down", "posture": "idle",
    ///       "x": 0, "y": 0, "width": 24, "height": 26 }
    /// ] }
    /// ```
    ///
    /// Direction and posture tags outside the closed enumerations are a
    /// parse error, not a silently-ignored record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSheet = serde_json::from_str(json)?;

        let mut frames: HashMap<(Facing, Posture), Vec<SpriteFrame>> = HashMap::new();
        for r in raw.sprites {
            frames
                .entry((r.direction, r.posture))
                .or_default()
                .push(SpriteFrame { x: r.x, y: r.y, width: r.width, height: r.height });
        }

        Ok(Self { frames })
    }

    /// Number of frames available for a `(facing, posture)` pair; zero when
    /// the pair has no records at all.
    pub fn frame_count(&self, facing: Facing, posture: Posture) -> usize {
        self.frames.get(&(facing, posture)).map_or(0, Vec::len)
    }

    /// Frame for the pair at `index`, cycling with period `frame_count`.
    /// `None` when the pair has no frames — callers skip the draw for that
    /// tick rather than failing.
    pub fn frame(&self, facing: Facing, posture: Posture, index: u32) -> Option<&SpriteFrame> {
        let cycle = self.frames.get(&(facing, posture))?;
        if cycle.is_empty() {
            return None;
        }
        Some(&cycle[index as usize % cycle.len()])
    }
}

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawSprite {
    direction: Facing,
    posture: Posture,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawSheet {
    sprites: Vec<RawSprite>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SpriteTable {
        SpriteTable::from_json(
            r#"{ "sprites": [
                { "direction": "right", "posture": "idle",
                  "x": 0, "y": 78, "width": 24, "height": 26 },
                { "direction": "right", "posture": "walking",
                  "x": 24, "y": 78, "width": 24, "height": 26 },
                { "direction": "right", "posture": "walking",
                  "x": 48, "y": 78, "width": 24, "height": 26 },
                { "direction": "right", "posture": "walking",
                  "x": 72, "y": 78, "width": 24, "height": 26 }
            ] }"#,
        )
        .unwrap()
    }

    #[test]
    fn frames_cycle_with_period_equal_to_count() {
        let t = table();
        assert_eq!(t.frame_count(Facing::Right, Posture::Walking), 3);
        for n in 0..12u32 {
            assert_eq!(
                t.frame(Facing::Right, Posture::Walking, n),
                t.frame(Facing::Right, Posture::Walking, n % 3),
            );
        }
    }

    #[test]
    fn frames_keep_json_order() {
        let t = table();
        let xs: Vec<u32> = (0..3)
            .map(|n| t.frame(Facing::Right, Posture::Walking, n).unwrap().x)
            .collect();
        assert_eq!(xs, vec![24, 48, 72]);
    }

    #[test]
    fn missing_pair_returns_none() {
        let t = table();
        assert_eq!(t.frame(Facing::Up, Posture::Walking, 0), None);
        assert_eq!(t.frame_count(Facing::Up, Posture::Walking), 0);
    }

    #[test]
    fn idle_cycle_of_one_always_yields_the_same_frame() {
        let t = table();
        for n in 0..5u32 {
            assert_eq!(t.frame(Facing::Right, Posture::Idle, n).unwrap().x, 0);
        }
    }

    #[test]
    fn unknown_direction_tag_is_a_parse_error() {
        let json = r#"{ "sprites": [
            { "direction": "up-left", "posture": "idle",
              "x": 0, "y": 0, "width": 24, "height": 26 }
        ] }"#;
        assert!(SpriteTable::from_json(json).is_err());
    }

    #[test]
    fn unknown_posture_tag_is_a_parse_error() {
        let json = r#"{ "sprites": [
            { "direction": "up", "posture": "sprinting",
              "x": 0, "y": 0, "width": 24, "height": 26 }
        ] }"#;
        assert!(SpriteTable::from_json(json).is_err());
    }

    #[test]
    fn embedded_demo_table_has_full_coverage() {
        let t = SpriteTable::from_json(crate::DEFAULT_SPRITES).unwrap();
        for facing in [Facing::Up, Facing::Down, Facing::Left, Facing::Right] {
            assert_eq!(t.frame_count(facing, Posture::Idle), 1);
            assert_eq!(t.frame_count(facing, Posture::Walking), 3);
        }
    }
}
