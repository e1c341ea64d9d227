//! Engine-wide constants

/// Minimum number of rooms a floor can have (start and exit)
pub const MIN_FLOOR_ROOMS: usize = 2;

/// Generation attempts per room-count target before the target shrinks
pub const MAX_GENERATION_ATTEMPTS: u32 = 8;

/// Rejection-sampling tries when placing one content entry
pub const MAX_PLACEMENT_TRIES: u32 = 32;

/// Default room size in pixels
pub const ROOM_WIDTH: f32 = 640.0;
pub const ROOM_HEIGHT: f32 = 480.0;

/// Default inward offset from a door when entering a room
pub const DOOR_MARGIN: f32 = 48.0;

/// Default fade duration for each half of a transition (ms)
pub const FADE_MS: u32 = 250;

/// Default sequence-lock memorize window (ms)
pub const MEMORIZE_MS: u32 = 3000;

/// Default sequence-lock pattern length
pub const SEQUENCE_LENGTH: usize = 4;

/// Default secret search radius (pixels)
pub const SEARCH_RADIUS: f32 = 56.0;

/// Default player step per directional command (pixels)
pub const MOVE_STEP: f32 = 16.0;
