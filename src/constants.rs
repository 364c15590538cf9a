//! Timing, threshold and interaction tuning constants.

// Breakpoints (CSS pixels)
pub const BREAKPOINT_TABLET: f32 = 768.0;
pub const BREAKPOINT_DESKTOP: f32 = 1024.0;
pub const BREAKPOINT_WIDE: f32 = 1200.0;

// Smooth scroll
pub const SCROLL_DURATION_SEC: f32 = 1.0; // wheel-driven glide
pub const ANCHOR_SCROLL_DURATION_SEC: f32 = 1.2;
pub const WHEEL_MULTIPLIER: f32 = 1.0;

// Cursor follower
pub const CURSOR_LERP: f32 = 0.15; // trailing outline catch-up per frame
pub const MAGNETIC_DEFAULT_STRENGTH: f32 = 15.0; // percent of pointer displacement

// Header
pub const HEADER_SCROLLED_PX: f32 = 80.0;
pub const HEADER_HIDE_PX: f32 = 150.0;

// Resize handling
pub const RESIZE_DEBOUNCE_SEC: f64 = 0.2;
pub const RESIZE_MIN_DELTA_PX: f32 = 50.0;

// Counter-up
pub const COUNTER_DURATION_SEC: f32 = 1.5;

// Depth stack scroll windows (fractions of a plane's scrub progress)
pub const DEPTH_EMERGE_END: f32 = 0.35;
pub const DEPTH_DISSOLVE_START: f32 = 0.5;
pub const DEPTH_HOVER_BOOST: f32 = 0.01;

// Preloader
pub const PRELOADER_REMOVE_DELAY_SEC: f64 = 0.1;
pub const HERO_DELAY_SEC: f32 = 0.1;

// Contact form (simulated submission)
pub const FORM_SUBMIT_DELAY_SEC: f64 = 1.2;
pub const FORM_SUCCESS_HOLD_SEC: f64 = 2.5;
pub const FORM_PRESSED_SCALE: f32 = 0.98;

// Mobile menu
pub const MENU_LINK_SHIFT_PX: f32 = -20.0;

// Timeline items slide in from the left
pub const TIMELINE_ITEM_SHIFT_PX: f32 = -30.0;
