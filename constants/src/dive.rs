/// Camera stops this far short of the clicked fragment.
pub const DIVE_STOP_DISTANCE: f32 = 0.6;
pub const DIVE_CAMERA_DURATION: f32 = 1.6;

pub const DIVE_SCALE_OFFSET: f32 = 0.2;
pub const DIVE_SCALE_DURATION: f32 = 1.4;
pub const DIVE_SCALE_FACTOR: f32 = 8.0;

pub const DIVE_FADE_OFFSET: f32 = 1.2;
pub const DIVE_FADE_DURATION: f32 = 0.4;
