//! Text rendering module
//!
//! Draws the facility as a character grid from a [`Snapshot`](crate::sim::Snapshot);
//! the same board feeds the browser `<pre>` and the terminal.

pub mod text;

pub use text::{board_lines, hud_lines, render};
