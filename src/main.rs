//! # Voxel Space Application Entry Point
//!
//! Calls into the library's `run()` function to load the terrain and open the window.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [settings.json]
//! ```

fn main() {
    voxel_space::run();
}
