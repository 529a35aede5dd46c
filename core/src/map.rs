//! Static tile grid and terrain predicates (spec §3, §4.3).
//!
//! Generation follows the proportions of `original_source/map.h`'s
//! `MapGenerator::init`, rescaled to the 150x150 grid spec.md §2 pins: a
//! diagonal river band, three lane corridors carved through a wall field,
//! four jungle rings with a penetrating cross, and two base camps.

use crate::constants::MAP_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Empty,
    Wall,
    River,
    Base,
    /// Lane tower cell; `tier` 0 = outer .. 2 = innermost, `team` 1 or 2.
    Tower { team: u8, tier: u8 },
    TowerSkirt,
}

#[derive(Debug, Clone)]
pub struct TileGrid {
    size: i32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    pub fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size && y < self.size
    }

    pub fn kind(&self, x: i32, y: i32) -> TileKind {
        self.tiles[self.idx(x, y)]
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Walkability derives from tile kind alone; tower-cell liveness is
    /// layered on top by the room (tile kind never changes after
    /// generation, per spec §3's invariant).
    pub fn terrain_walkable(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        !matches!(self.kind(x, y), TileKind::Wall)
    }

    fn set(&mut self, x: i32, y: i32, kind: TileKind) {
        if self.in_bounds(x, y) {
            let i = self.idx(x, y);
            self.tiles[i] = kind;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, kind: TileKind) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, kind);
            }
        }
    }

    fn carve_path(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, width: i32) {
        let steps = (x2 - x1).abs().max((y2 - y1).abs());
        if steps == 0 {
            return;
        }
        let dx = (x2 - x1) as f32 / steps as f32;
        let dy = (y2 - y1) as f32 / steps as f32;
        let (mut x, mut y) = (x1 as f32, y1 as f32);
        let offset = width / 2;
        for _ in 0..=steps {
            let (cx, cy) = (x as i32, y as i32);
            for iy in 0..width {
                for ix in 0..width {
                    self.set(cx + ix - offset, cy + iy - offset, TileKind::Empty);
                }
            }
            x += dx;
            y += dy;
        }
    }

    fn ring(&mut self, x: i32, y: i32, size: i32, ring_width: i32) {
        self.fill_rect(x, y, size, size, TileKind::Empty);
        let inner = size - 2 * ring_width;
        if inner > 0 {
            self.fill_rect(x + ring_width, y + ring_width, inner, inner, TileKind::Wall);
        }
    }

    fn place_tower(&mut self, x: i32, y: i32, team: u8, tier: u8) {
        self.set(x, y, TileKind::Tower { team, tier });
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            if self.kind(x + dx, y + dy) != (TileKind::Tower { team, tier }) {
                self.set(x + dx, y + dy, TileKind::TowerSkirt);
            }
        }
    }

    pub fn base_position(team: u8) -> (i32, i32) {
        let margin = 22;
        if team == 1 {
            (margin, MAP_SIZE - margin)
        } else {
            (MAP_SIZE - margin, margin)
        }
    }

    /// Three fixed lane waypoint polylines, indexed [lane][point]. Lane 0 =
    /// top, 1 = mid, 2 = bot. Team 1's base is the first waypoint; team 2
    /// walks the same polyline in reverse (spec §4.5).
    pub fn lane_waypoints(lane: usize) -> Vec<(i32, i32)> {
        let margin = 22;
        let (b1x, b1y) = Self::base_position(1);
        let (b2x, b2y) = Self::base_position(2);
        match lane {
            0 => vec![(b1x, b1y), (margin, margin), (b2x, b2y)],
            2 => vec![(b1x, b1y), (MAP_SIZE - margin, MAP_SIZE - margin), (b2x, b2y)],
            _ => vec![(b1x, b1y), (b2x, b2y)],
        }
    }
}

pub fn generate() -> TileGrid {
    let size = MAP_SIZE;
    let mut grid = TileGrid {
        size,
        tiles: vec![TileKind::Wall; (size * size) as usize],
    };

    let river_limit = 13 * size / 150;
    for y in 0..size {
        for x in 0..size {
            if (y - x).abs() < river_limit.max(1) {
                grid.set(x, y, TileKind::River);
            }
        }
    }

    let margin = 22 * size / 150;
    let top_bot_w = (12 * size / 150).max(2);

    grid.carve_path(margin, size - margin, margin, margin, top_bot_w);
    grid.carve_path(margin, margin, size - margin, margin, top_bot_w);
    grid.carve_path(size - margin, margin, size - margin, size - margin, top_bot_w);
    grid.carve_path(margin, size - margin, size - margin, size - margin, top_bot_w);

    let jungle_size = (26 * size / 150).max(6);
    let jungle_width = (4 * size / 150).max(1);
    for (jx, jy) in [
        (56 * size / 150, 96 * size / 150),
        (68 * size / 150, 28 * size / 150),
        (28 * size / 150, 62 * size / 150),
        (96 * size / 150, 62 * size / 150),
    ] {
        grid.ring(jx, jy, jungle_size, jungle_width);
    }

    let base_size = (20 * size / 150).max(4);
    let (b1x, b1y) = TileGrid::base_position(1);
    let (b2x, b2y) = TileGrid::base_position(2);
    grid.fill_rect(b1x - base_size / 2, b1y - base_size / 2, base_size, base_size, TileKind::Empty);
    grid.set(b1x, b1y, TileKind::Base);
    grid.fill_rect(b2x - base_size / 2, b2y - base_size / 2, base_size, base_size, TileKind::Empty);
    grid.set(b2x, b2y, TileKind::Base);

    let center = size / 2;
    let spacing = top_bot_w * 2;
    let (p_low, p_mid, p_high) = (center - spacing, center, center + spacing);

    grid.place_tower(margin, p_high, 1, 2);
    grid.place_tower(margin, p_mid, 1, 1);
    grid.place_tower(margin, p_low, 1, 0);
    grid.place_tower(p_low, size - margin, 1, 2);
    grid.place_tower(p_mid, size - margin, 1, 1);
    grid.place_tower(p_high, size - margin, 1, 0);

    grid.place_tower(p_high, margin, 2, 2);
    grid.place_tower(p_mid, margin, 2, 1);
    grid.place_tower(p_low, margin, 2, 0);
    grid.place_tower(size - margin, p_low, 2, 2);
    grid.place_tower(size - margin, p_mid, 2, 1);
    grid.place_tower(size - margin, p_high, 2, 0);

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_grid_has_walkable_lanes() {
        let grid = generate();
        assert!(grid.terrain_walkable(75, 75));
    }

    #[test]
    fn bases_are_on_opposite_corners() {
        let (x1, y1) = TileGrid::base_position(1);
        let (x2, y2) = TileGrid::base_position(2);
        assert_ne!((x1, y1), (x2, y2));
    }
}
