use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use serde::Deserialize;

use crate::input::InputState;
use crate::map::TileGrid;

// ── Facing / Posture ─────────────────────────────────────────────────────────

/// Last resolved movement direction; selects the sprite row.
///
/// Diagonal movement never produces a diagonal facing: the vertical component
/// of the pair wins, so this enum is deliberately four-valued and collision
/// rollback cannot branch on directions that are never assigned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

/// Coarse animation state, independent of facing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Idle,
    Walking,
}

// ── KeyState ─────────────────────────────────────────────────────────────────

/// Level-triggered snapshot of the four directional keys, taken once at the
/// start of a tick. Key events arriving mid-tick coalesce into the next
/// snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Snapshot the arrow keys from the engine's raw input state.
    pub fn sample(input: &InputState) -> Self {
        use winit::keyboard::KeyCode;
        Self {
            up: input.is_key_held(KeyCode::ArrowUp),
            down: input.is_key_held(KeyCode::ArrowDown),
            left: input.is_key_held(KeyCode::ArrowLeft),
            right: input.is_key_held(KeyCode::ArrowRight),
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

// ── Actor / Motion ───────────────────────────────────────────────────────────

/// The single player-controlled actor. Owned by the session; there is
/// exactly one per run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Actor {
    /// Continuous world-pixel position of the sprite's top-left corner.
    pub pos: Vec2,
    pub facing: Facing,
    pub posture: Posture,
    /// Free-running animation counter; wrapped by the sprite table's cycle
    /// length at lookup time.
    pub frame: u32,
}

impl Actor {
    /// Spawn idle, facing down (the sprite sheet's front-facing row).
    pub fn at(pos: Vec2) -> Self {
        Self { pos, facing: Facing::Down, posture: Posture::Idle, frame: 0 }
    }
}

/// Static movement parameters shared by both demo variants.
#[derive(Copy, Clone, Debug)]
pub struct Motion {
    pub tile_w: u32,
    pub tile_h: u32,
    /// World pixels per tick. Ticks are display refreshes, so effective
    /// speed scales with refresh rate (see `engine`).
    pub speed: f32,
}

impl Motion {
    /// Per-axis speed for diagonal movement, normalised so the diagonal
    /// magnitude equals `speed`.
    pub fn diagonal_speed(&self) -> f32 {
        self.speed * FRAC_1_SQRT_2
    }
}

/// Outcome of collision resolution for one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Clear,
    Blocked,
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Apply one tick of key-driven movement to the actor and return the
/// displacement that was applied (zero when no key is held).
///
/// The four diagonal pairs are checked before the four cardinals; a diagonal
/// moves both axes at the normalised diagonal speed and faces the vertical
/// component of the pair. Exactly one branch fires per tick.
///
/// Any displacement puts the actor in `Walking` posture and advances the
/// animation counter by one; no key held means `Idle`, zero displacement,
/// and a frozen counter.
pub fn advance(actor: &mut Actor, keys: KeyState, motion: &Motion) -> Vec2 {
    let d = motion.diagonal_speed();
    let s = motion.speed;

    let (delta, facing) = if keys.up && keys.right {
        (Vec2::new(d, -d), Facing::Up)
    } else if keys.up && keys.left {
        (Vec2::new(-d, -d), Facing::Up)
    } else if keys.down && keys.right {
        (Vec2::new(d, d), Facing::Down)
    } else if keys.down && keys.left {
        (Vec2::new(-d, d), Facing::Down)
    } else if keys.up {
        (Vec2::new(0.0, -s), Facing::Up)
    } else if keys.down {
        (Vec2::new(0.0, s), Facing::Down)
    } else if keys.left {
        (Vec2::new(-s, 0.0), Facing::Left)
    } else if keys.right {
        (Vec2::new(s, 0.0), Facing::Right)
    } else {
        actor.posture = Posture::Idle;
        return Vec2::ZERO;
    };

    actor.pos += delta;
    actor.facing = facing;
    actor.posture = Posture::Walking;
    actor.frame = actor.frame.wrapping_add(1);
    delta
}

/// Resolve the displacement applied this tick against the grid.
///
/// The actor's current cell is found by integer division of its position by
/// the tile footprint. A blocked (or out-of-bounds, which fails closed) cell
/// undoes the move by subtracting `moved` exactly — both axes, whatever mix
/// of cardinal and diagonal produced it — and forces posture back to idle.
/// Facing and the animation counter are left as `advance` set them.
pub fn resolve(actor: &mut Actor, moved: Vec2, grid: &TileGrid, motion: &Motion) -> Resolution {
    let (gx, gy) = TileGrid::cell_at(actor.pos, motion.tile_w, motion.tile_h);
    if grid.is_blocked(gx, gy) {
        actor.pos -= moved;
        actor.posture = Posture::Idle;
        Resolution::Blocked
    } else {
        Resolution::Clear
    }
}

/// One whole continuous-movement tick: apply the keyed displacement, then
/// roll it back if it landed in blocked terrain.
pub fn step(actor: &mut Actor, keys: KeyState, grid: &TileGrid, motion: &Motion) -> Resolution {
    let moved = advance(actor, keys, motion);
    resolve(actor, moved, grid, motion)
}

/// One discrete grid-step: move the actor a whole cell in the (single)
/// pressed direction, checking the candidate cell *before* moving so no
/// rollback is ever needed. Diagonals are not part of this variant; vertical
/// keys win when several are pressed in the same tick.
pub fn step_cell(actor: &mut Actor, keys: KeyState, grid: &TileGrid, motion: &Motion) -> Resolution {
    let (dx, dy, facing) = if keys.up {
        (0, -1, Facing::Up)
    } else if keys.down {
        (0, 1, Facing::Down)
    } else if keys.left {
        (-1, 0, Facing::Left)
    } else if keys.right {
        (1, 0, Facing::Right)
    } else {
        actor.posture = Posture::Idle;
        return Resolution::Clear;
    };

    actor.facing = facing;
    let (gx, gy) = TileGrid::cell_at(actor.pos, motion.tile_w, motion.tile_h);
    let (nx, ny) = (gx + dx, gy + dy);

    if grid.is_blocked(nx, ny) {
        actor.posture = Posture::Idle;
        return Resolution::Blocked;
    }

    actor.pos = Vec2::new(
        (nx * motion.tile_w as i32) as f32,
        (ny * motion.tile_h as i32) as f32,
    );
    actor.posture = Posture::Walking;
    actor.frame = actor.frame.wrapping_add(1);
    Resolution::Clear
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn motion() -> Motion {
        Motion { tile_w: 120, tile_h: 130, speed: 20.0 }
    }

    fn open_grid() -> TileGrid {
        TileGrid::new(vec![vec![0; 20]; 6]).unwrap()
    }

    fn keys(up: bool, down: bool, left: bool, right: bool) -> KeyState {
        KeyState { up, down, left, right }
    }

    #[test]
    fn single_key_moves_full_speed_on_one_axis() {
        let cases = [
            (keys(true, false, false, false), Vec2::new(0.0, -20.0), Facing::Up),
            (keys(false, true, false, false), Vec2::new(0.0, 20.0), Facing::Down),
            (keys(false, false, true, false), Vec2::new(-20.0, 0.0), Facing::Left),
            (keys(false, false, false, true), Vec2::new(20.0, 0.0), Facing::Right),
        ];
        for (ks, expected, facing) in cases {
            let mut actor = Actor::at(Vec2::new(240.0, 260.0));
            let moved = advance(&mut actor, ks, &motion());
            assert_eq!(moved, expected);
            assert_eq!(actor.facing, facing);
            assert_eq!(actor.posture, Posture::Walking);
        }
    }

    #[test]
    fn diagonal_pairs_move_both_axes_and_face_vertically() {
        let d = motion().diagonal_speed();
        let cases = [
            (keys(true, false, false, true), Vec2::new(d, -d), Facing::Up),
            (keys(true, false, true, false), Vec2::new(-d, -d), Facing::Up),
            (keys(false, true, false, true), Vec2::new(d, d), Facing::Down),
            (keys(false, true, true, false), Vec2::new(-d, d), Facing::Down),
        ];
        for (ks, expected, facing) in cases {
            let mut actor = Actor::at(Vec2::new(240.0, 260.0));
            let moved = advance(&mut actor, ks, &motion());
            assert_eq!(moved, expected);
            assert_eq!(actor.facing, facing);
        }
    }

    #[test]
    fn diagonal_magnitude_equals_speed() {
        let mut actor = Actor::at(Vec2::new(240.0, 260.0));
        let moved = advance(&mut actor, keys(true, false, false, true), &motion());
        assert!((moved.length() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn no_key_is_idle_and_frozen() {
        let mut actor = Actor::at(Vec2::new(240.0, 260.0));
        actor.frame = 7;
        let moved = advance(&mut actor, KeyState::default(), &motion());
        assert_eq!(moved, Vec2::ZERO);
        assert_eq!(actor.posture, Posture::Idle);
        assert_eq!(actor.frame, 7);
        assert_eq!(actor.pos, Vec2::new(240.0, 260.0));
    }

    #[test]
    fn frame_counter_advances_once_per_moving_tick() {
        let mut actor = Actor::at(Vec2::new(240.0, 260.0));
        for expected in 1..=5 {
            advance(&mut actor, keys(false, false, false, true), &motion());
            assert_eq!(actor.frame, expected);
        }
    }

    #[test]
    fn blocked_resolve_is_apply_then_rollback_identity() {
        // Column 2 is a wall; walk right into it from cell (1, 1).
        let mut layout = vec![vec![0u8; 4]; 3];
        for row in &mut layout {
            row[2] = 1;
        }
        let grid = TileGrid::new(layout).unwrap();

        let start = Vec2::new(225.0, 130.0); // cell (1, 1), 15 px from the wall
        let mut actor = Actor::at(start);
        let res = step(&mut actor, keys(false, false, false, true), &grid, &motion());

        assert_eq!(res, Resolution::Blocked);
        assert_eq!(actor.pos, start);
        assert_eq!(actor.posture, Posture::Idle);
        assert_eq!(actor.facing, Facing::Right); // facing survives the rollback
    }

    #[test]
    fn blocked_diagonal_rolls_back_both_axes() {
        // Everything outside row 0 is blocked; a down-right diagonal from the
        // last open cell must come back exactly.
        let grid = TileGrid::new(vec![vec![0, 0, 0], vec![1, 1, 1]]).unwrap();
        let start = Vec2::new(130.0, 125.0);
        let mut actor = Actor::at(start);
        let res = step(&mut actor, keys(false, true, false, true), &grid, &motion());

        assert_eq!(res, Resolution::Blocked);
        assert!((actor.pos - start).length() < 1e-4);
        assert_eq!(actor.posture, Posture::Idle);
    }

    #[test]
    fn walking_off_the_grid_counts_as_blocked() {
        let grid = TileGrid::new(vec![vec![0, 0]]).unwrap();
        let start = Vec2::new(10.0, 10.0);
        let mut actor = Actor::at(start);
        // Up from row 0 leaves the grid entirely.
        let res = step(&mut actor, keys(true, false, false, false), &grid, &motion());
        assert_eq!(res, Resolution::Blocked);
        assert_eq!(actor.pos, start);
    }

    #[test]
    fn scenario_walk_right_through_open_row() {
        let mut actor = Actor::at(Vec2::new(120.0, 130.0)); // tile (1, 1)
        let res = step(&mut actor, keys(false, false, false, true), &open_grid(), &motion());
        assert_eq!(res, Resolution::Clear);
        assert_eq!(actor.pos, Vec2::new(140.0, 130.0));
        assert_eq!(actor.posture, Posture::Walking);
        assert_eq!(actor.facing, Facing::Right);
    }

    // ── Discrete grid-step variant ───────────────────────────────────────

    #[test]
    fn step_cell_moves_one_whole_cell() {
        let grid = open_grid();
        let mut actor = Actor::at(Vec2::new(120.0, 130.0));
        let res = step_cell(&mut actor, keys(false, false, false, true), &grid, &motion());
        assert_eq!(res, Resolution::Clear);
        assert_eq!(actor.pos, Vec2::new(240.0, 130.0));
        assert_eq!(actor.frame, 1);
    }

    #[test]
    fn step_cell_checks_destination_before_moving() {
        let grid = TileGrid::new(vec![vec![0, 1]]).unwrap();
        let mut actor = Actor::at(Vec2::new(0.0, 0.0));
        let res = step_cell(&mut actor, keys(false, false, false, true), &grid, &motion());
        assert_eq!(res, Resolution::Blocked);
        assert_eq!(actor.pos, Vec2::ZERO);
        assert_eq!(actor.posture, Posture::Idle);
        assert_eq!(actor.frame, 0); // no move, no frame advance
    }

    #[test]
    fn step_cell_refuses_to_leave_the_grid() {
        let grid = TileGrid::new(vec![vec![0]]).unwrap();
        let mut actor = Actor::at(Vec2::ZERO);
        for ks in [
            keys(true, false, false, false),
            keys(false, true, false, false),
            keys(false, false, true, false),
            keys(false, false, false, true),
        ] {
            assert_eq!(step_cell(&mut actor, ks, &grid, &motion()), Resolution::Blocked);
            assert_eq!(actor.pos, Vec2::ZERO);
        }
    }

    #[test]
    fn step_cell_vertical_wins_over_horizontal() {
        let grid = open_grid();
        let mut actor = Actor::at(Vec2::new(120.0, 130.0));
        step_cell(&mut actor, keys(true, false, false, true), &grid, &motion());
        assert_eq!(actor.facing, Facing::Up);
        assert_eq!(actor.pos, Vec2::new(120.0, 0.0));
    }
}
