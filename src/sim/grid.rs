//! Solid-cell tile grid
//!
//! A rectangular grid of square tiles centered on the world origin. Tile
//! (0, 0) is the bottom-left cell. Projectiles treat every solid tile and the
//! outer edge of the grid as walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::raycast::{MapQuery, RayHit, dominant_axis_normal};
use crate::consts::MOVE_EPSILON;

/// Which grid line the DDA crossed to enter the current tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Vertical,
    Horizontal,
}

/// Grid of solid/empty tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    solid: Vec<bool>,
}

impl TileGrid {
    /// Empty grid of `width` x `height` tiles
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            solid: vec![false; width * height],
        }
    }

    /// Build from text rows, `#` marks a solid tile
    ///
    /// The first row is the top of the map. Short rows are padded with empty
    /// tiles.
    pub fn from_rows(rows: &[&str], tile_size: f32) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, height, tile_size);

        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row;
            for (x, c) in line.chars().enumerate() {
                if c == '#' {
                    grid.set_solid(x, y, true);
                }
            }
        }
        grid
    }

    /// Make the outermost ring of tiles solid
    pub fn with_border(mut self) -> Self {
        for x in 0..self.width {
            self.set_solid(x, 0, true);
            self.set_solid(x, self.height.saturating_sub(1), true);
        }
        for y in 0..self.height {
            self.set_solid(0, y, true);
            self.set_solid(self.width.saturating_sub(1), y, true);
        }
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World-space extent of the grid
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    pub fn set_solid(&mut self, x: usize, y: usize, solid: bool) {
        if x < self.width && y < self.height {
            self.solid[y * self.width + x] = solid;
        }
    }

    pub fn tile_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Solid test by tile coordinate (out of range is not solid)
    pub fn is_solid_tile(&self, x: i32, y: i32) -> bool {
        self.tile_in_bounds(x, y) && self.solid[y as usize * self.width + x as usize]
    }

    /// Tile containing a world position (may be out of range)
    pub fn world_to_tile(&self, position: Vec2) -> (i32, i32) {
        let rel = (position + self.world_size() * 0.5) / self.tile_size;
        (rel.x.floor() as i32, rel.y.floor() as i32)
    }

    /// World-space center of a tile
    pub fn tile_to_world(&self, x: i32, y: i32) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) * self.tile_size - self.world_size() * 0.5
    }

    pub fn is_solid(&self, position: Vec2) -> bool {
        let (x, y) = self.world_to_tile(position);
        self.is_solid_tile(x, y)
    }

    /// Distance along `dir` to the first grid line, and between grid lines
    fn axis_steps(origin: f32, dir: f32, tile: i32, step: i32, tile_size: f32) -> (f32, f32) {
        if dir.abs() < MOVE_EPSILON {
            return (f32::INFINITY, f32::INFINITY);
        }
        let next_line = if step > 0 { tile + 1 } else { tile };
        let next = next_line as f32 * tile_size;
        ((next - origin) / dir, tile_size / dir.abs())
    }
}

impl MapQuery for TileGrid {
    /// DDA walk through the tiles the segment touches
    fn raycast(&self, start: Vec2, end: Vec2) -> Option<RayHit> {
        let delta = end - start;
        let total_dist = delta.length();
        if total_dist < MOVE_EPSILON {
            return None;
        }
        let dir = delta / total_dist;

        let hit_at = |t: f32, normal: Vec2| {
            let distance = t.clamp(0.0, total_dist);
            RayHit {
                point: start + dir * distance,
                normal,
                distance,
            }
        };

        // Starting inside a wall: report an immediate hit against the heading
        if self.is_solid(start) {
            return Some(hit_at(0.0, dominant_axis_normal(dir)));
        }

        let origin = start + self.world_size() * 0.5;
        let (mut tile_x, mut tile_y) = self.world_to_tile(start);
        let step_x = if dir.x >= 0.0 { 1 } else { -1 };
        let step_y = if dir.y >= 0.0 { 1 } else { -1 };
        let (mut t_max_x, t_delta_x) =
            Self::axis_steps(origin.x, dir.x, tile_x, step_x, self.tile_size);
        let (mut t_max_y, t_delta_y) =
            Self::axis_steps(origin.y, dir.y, tile_y, step_y, self.tile_size);

        let mut t_entry = 0.0;
        let mut crossing = None;
        let max_iters = (total_dist / self.tile_size) as usize + self.width + self.height + 10;

        for _ in 0..max_iters {
            if t_entry > total_dist {
                return None;
            }

            if !self.tile_in_bounds(tile_x, tile_y) {
                // Leaving the grid counts as a wall facing back into the map
                let normal = if tile_x < 0 {
                    Vec2::X
                } else if tile_x as usize >= self.width {
                    Vec2::NEG_X
                } else if tile_y < 0 {
                    Vec2::Y
                } else {
                    Vec2::NEG_Y
                };
                return Some(hit_at(t_entry, normal));
            }

            if self.is_solid_tile(tile_x, tile_y) {
                let normal = match crossing {
                    Some(Crossing::Vertical) => Vec2::new(-step_x as f32, 0.0),
                    Some(Crossing::Horizontal) => Vec2::new(0.0, -step_y as f32),
                    None => dominant_axis_normal(dir),
                };
                return Some(hit_at(t_entry, normal));
            }

            if t_max_x < t_max_y {
                t_entry = t_max_x;
                t_max_x += t_delta_x;
                tile_x += step_x;
                crossing = Some(Crossing::Vertical);
            } else {
                t_entry = t_max_y;
                t_max_y += t_delta_y;
                tile_y += step_y;
                crossing = Some(Crossing::Horizontal);
            }
        }

        None
    }

    fn in_bounds(&self, position: Vec2) -> bool {
        let half = self.world_size() * 0.5;
        position.x >= -half.x && position.x < half.x && position.y >= -half.y && position.y < half.y
    }
}
