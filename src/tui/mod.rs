//! TUI debugger for the Hack emulator.
//!
//! Provides an interactive terminal-based debugger with:
//! - Register and keyboard-register display
//! - RAM view
//! - Downsampled framebuffer preview
//! - Step/run/breakpoint controls and a keyboard input mode
//! - Disassembly view

mod app;
mod ui;

pub use app::{DebuggerApp, run_debugger};
