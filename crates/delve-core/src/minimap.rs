//! Minimap projection
//!
//! A read-only view of the discovered part of a floor, scaled into a small
//! viewport. Nothing here mutates the floor.

use std::collections::BTreeSet;

use serde::Serialize;
use strum::Display;

use crate::dungeon::{Direction, Floor, RoomId};

/// Target area for the projection, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Empty border kept on every side
    pub padding: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 120.0,
            padding: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapStyle {
    Current,
    Visited,
    /// Discovered but never entered
    Fog,
}

/// A room cell on the minimap; `x`/`y` is its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapRoom {
    pub id: RoomId,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: MapStyle,
}

/// A line between two discovered rooms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapLink {
    pub a: RoomId,
    pub b: RoomId,
    pub from: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MiniMap {
    pub rooms: Vec<MapRoom>,
    pub links: Vec<MapLink>,
    /// Pixels per grid cell
    pub scale: f32,
}

impl MiniMap {
    /// Project the discovered rooms of `floor` into `viewport`
    pub fn project(floor: &Floor, current: RoomId, viewport: Viewport) -> Self {
        let shown: Vec<_> = floor
            .rooms
            .values()
            .filter(|r| r.discovered || r.id == current)
            .collect();
        let Some(bounds) = GridBounds::of(shown.iter().map(|r| (r.grid_x, r.grid_y))) else {
            return Self::default();
        };

        let inner_w = (viewport.width - 2.0 * viewport.padding).max(1.0);
        let inner_h = (viewport.height - 2.0 * viewport.padding).max(1.0);
        let scale = (inner_w / bounds.cols() as f32).min(inner_h / bounds.rows() as f32);
        // Centre the scaled box inside the viewport
        let offset_x = viewport.padding + (inner_w - scale * bounds.cols() as f32) / 2.0;
        let offset_y = viewport.padding + (inner_h - scale * bounds.rows() as f32) / 2.0;
        let centre = |gx: i32, gy: i32| {
            (
                offset_x + (gx - bounds.min_x) as f32 * scale + scale / 2.0,
                offset_y + (gy - bounds.min_y) as f32 * scale + scale / 2.0,
            )
        };

        let rooms = shown
            .iter()
            .map(|room| {
                let (x, y) = centre(room.grid_x, room.grid_y);
                let style = if room.id == current {
                    MapStyle::Current
                } else if room.visited {
                    MapStyle::Visited
                } else {
                    MapStyle::Fog
                };
                MapRoom {
                    id: room.id,
                    x,
                    y,
                    size: scale * 0.7,
                    style,
                }
            })
            .collect();

        let mut seen = BTreeSet::new();
        let mut links = Vec::new();
        for room in floor.rooms.values().filter(|r| r.discovered) {
            for &other in room.connections.values() {
                let Some(neighbor) = floor.room(other).filter(|n| n.discovered) else {
                    continue;
                };
                let key = (room.id.min(other), room.id.max(other));
                if !seen.insert(key) {
                    continue;
                }
                links.push(MapLink {
                    a: key.0,
                    b: key.1,
                    from: centre(room.grid_x, room.grid_y),
                    to: centre(neighbor.grid_x, neighbor.grid_y),
                });
            }
        }

        Self {
            rooms,
            links,
            scale,
        }
    }

    /// Text rendering for terminals
    ///
    /// Rooms sit on every other column and row: `@` for the current room,
    /// the room type glyph if visited, `?` for fog. Links between shown rooms
    /// are drawn as `-` and `|` in the gaps.
    pub fn to_ascii(floor: &Floor, current: RoomId) -> String {
        let shown: Vec<_> = floor
            .rooms
            .values()
            .filter(|r| r.discovered || r.id == current)
            .collect();
        let Some(bounds) = GridBounds::of(shown.iter().map(|r| (r.grid_x, r.grid_y))) else {
            return String::new();
        };

        let width = bounds.cols() as usize * 2 - 1;
        let height = bounds.rows() as usize * 2 - 1;
        let mut grid = vec![vec![' '; width]; height];

        for room in &shown {
            let col = (room.grid_x - bounds.min_x) as usize * 2;
            let row = (room.grid_y - bounds.min_y) as usize * 2;
            grid[row][col] = if room.id == current {
                '@'
            } else if room.visited {
                room.room_type.glyph()
            } else {
                '?'
            };
            // East and south only, so each link is drawn once
            if room.neighbor(Direction::East).is_some_and(|id| is_shown(floor, id, current))
                && col + 1 < width
            {
                grid[row][col + 1] = '-';
            }
            if room.neighbor(Direction::South).is_some_and(|id| is_shown(floor, id, current))
                && row + 1 < height
            {
                grid[row + 1][col] = '|';
            }
        }

        grid.into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_shown(floor: &Floor, id: RoomId, current: RoomId) -> bool {
    id == current || floor.room(id).is_some_and(|r| r.discovered)
}

#[derive(Debug, Clone, Copy)]
struct GridBounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl GridBounds {
    fn of(cells: impl IntoIterator<Item = (i32, i32)>) -> Option<Self> {
        cells.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Self {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    fn cols(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    fn rows(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}
