pub mod warp;
