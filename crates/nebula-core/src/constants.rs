// Shared visual/audio tuning constants used by both web and native frontends.

// Per-frame spin (radians per frame, not per second)
pub const SPHERE_SPIN_PER_FRAME: f32 = 0.005;
pub const NOISE_MESH_SPIN_PER_FRAME: f32 = 0.005; // applied to both x and y
pub const FIELD_DRIFT_PER_FRAME: f32 = 0.0005;

// Energy mapping: 1 + energy / divisor; bytes 0..255 give roughly 1.0..1.5
pub const ENERGY_SCALE_DIVISOR: f32 = 500.0;

// Camera orbit
pub const CAMERA_ORBIT_RADIUS: f32 = 30.0;
pub const CAMERA_ORBIT_RATE: f32 = 0.0001; // radians per second of elapsed time
pub const CAMERA_FOVY_DEGREES: f32 = 45.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Transport
pub const TOGGLE_COOLDOWN_SEC: f64 = 0.2;
pub const ANALYSER_FFT_SIZE: usize = 256; // 128 frequency bands

// Scene layout
pub const PARTICLE_SPHERE_RADIUS: f32 = 8.0;
pub const PARTICLE_SPHERE_SEGMENTS: u32 = 20;
pub const NOISE_MESH_RADIUS: f32 = 5.0;
pub const NOISE_MESH_DETAIL: u32 = 48;
pub const INNER_SPHERE_RADIUS: f32 = 2.5;
pub const INNER_SPHERE_SEGMENTS: u32 = 32;
pub const FIELD_PARTICLE_COUNT: usize = 1200;
pub const FIELD_EXTENT: f32 = 40.0; // side of the cube the field is scattered in
pub const FIELD_SEED: u64 = 0x5EED_F1E1D;

// Point materials
pub const POINT_SIZE: f32 = 0.2;
pub const SPHERE_POINT_OPACITY: f32 = 0.2;
pub const FIELD_POINT_OPACITY: f32 = 1.0;
