//! Debugger application state and logic.

use crate::program::disassemble_word;
use crate::{Computer, ReadMemory, Word};
use crossterm::event::KeyCode;
use std::collections::HashSet;

/// Instructions executed per UI tick while running.
const STEPS_PER_TICK: u64 = 2_000;

/// UI ticks a keystroke stays held in input mode. Terminals report key
/// presses but not releases.
const KEY_HOLD_TICKS: u32 = 3;

/// Debugger application state.
pub struct DebuggerApp {
    /// The machine being debugged.
    pub computer: Computer,
    /// Original program for reference.
    pub program: Vec<Word>,
    /// Breakpoints (by ROM address).
    pub breakpoints: HashSet<u16>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Keystrokes go to the machine's keyboard instead of the debugger.
    pub input_mode: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// RAM view scroll offset.
    pub mem_scroll: usize,
    key_hold: u32,
}

impl DebuggerApp {
    /// Create a new debugger with a loaded program.
    pub fn new(program: Vec<Word>) -> Self {
        let mut computer = Computer::new();
        let status = match computer.load_program(&program) {
            Ok(()) => "Ready. Press 's' to step, 'r' to run, 'q' to quit.".to_string(),
            Err(e) => format!("Error: {}", e),
        };

        Self {
            computer,
            program,
            breakpoints: HashSet::new(),
            running: false,
            input_mode: false,
            should_quit: false,
            status,
            mem_scroll: 0,
            key_hold: 0,
        }
    }

    pub fn pc(&self) -> u16 {
        self.computer.registers().pc
    }

    /// Step one instruction.
    pub fn step(&mut self) {
        let pc = self.pc();
        match self.computer.step() {
            Ok(instr) => {
                self.status = format!("PC={:05}: {}", pc, instr);
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until breakpoint, halt loop, or error.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if self.key_hold > 0 {
            self.key_hold -= 1;
            if self.key_hold == 0 {
                self.computer.key_up();
            }
        }

        if !self.running {
            return;
        }

        for _ in 0..STEPS_PER_TICK {
            let pc = self.pc();
            if self.breakpoints.contains(&pc) {
                self.running = false;
                self.status = format!("Breakpoint at PC={}", pc);
                return;
            }
            if self.computer.is_halted() {
                self.running = false;
                self.status = format!("Halted after {} cycles", self.computer.cpu().cycles);
                return;
            }

            self.step();
            if !self.running {
                return;
            }
        }
    }

    /// Toggle breakpoint at current PC.
    pub fn toggle_breakpoint(&mut self) {
        let pc = self.pc();
        if self.breakpoints.remove(&pc) {
            self.status = format!("Removed breakpoint at PC={}", pc);
        } else {
            self.breakpoints.insert(pc);
            self.status = format!("Set breakpoint at PC={}", pc);
        }
    }

    /// Restart at address 0. A, D and memory keep their values.
    pub fn reset(&mut self) {
        self.running = false;
        self.computer.reset();
        self.status = "Reset: PC=0, registers and memory kept.".into();
    }

    /// Fresh machine with the same program and breakpoints.
    pub fn reboot(&mut self) {
        *self = Self {
            breakpoints: std::mem::take(&mut self.breakpoints),
            ..Self::new(std::mem::take(&mut self.program))
        };
        self.status = "Rebooted. Ready.".into();
    }

    /// Toggle whether keystrokes are forwarded to the machine.
    pub fn toggle_input_mode(&mut self) {
        self.input_mode = !self.input_mode;
        self.computer.key_up();
        self.status = if self.input_mode {
            "Input mode: keys go to the machine. Esc to leave.".into()
        } else {
            "Debugger mode.".into()
        };
    }

    /// Forward a terminal key press to the keyboard register.
    pub fn forward_key(&mut self, code: KeyCode) {
        if let Some(name) = key_name(code) {
            if self.computer.key_down(&name) {
                self.key_hold = KEY_HOLD_TICKS;
            }
        }
    }

    /// Get disassembly around current PC.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(u16, String, bool)> {
        let pc = self.pc();
        let start = pc.saturating_sub(lines as u16 / 2);
        let rom = self.computer.cpu().rom();

        (0..lines as u16)
            .filter_map(|i| {
                let addr = start.checked_add(i)?;
                let word = rom.read(addr.into()).ok()?;
                Some((addr, disassemble_word(word), addr == pc))
            })
            .collect()
    }
}

/// Terminal key to the name used by the key-code table.
fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Enter => "Enter",
        KeyCode::Backspace => "Backspace",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Up => "ArrowUp",
        KeyCode::Right => "ArrowRight",
        KeyCode::Down => "ArrowDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Insert => "Insert",
        KeyCode::Delete => "Delete",
        KeyCode::F(n) => return Some(format!("F{}", n)),
        _ => return None,
    };
    Some(name.to_string())
}

/// Run the debugger with a program.
pub fn run_debugger(program: Vec<Word>) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(program);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(30))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.input_mode {
                        match key.code {
                            KeyCode::Esc => app.toggle_input_mode(),
                            code => app.forward_key(code),
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Char('s') => {
                                app.running = false;
                                app.step();
                            }
                            KeyCode::Char('r') => app.run(),
                            KeyCode::Char('p') => {
                                app.running = false;
                                app.status = "Paused.".into();
                            }
                            KeyCode::Char('b') => app.toggle_breakpoint(),
                            KeyCode::Char('x') => app.reset(),
                            KeyCode::Char('X') => app.reboot(),
                            KeyCode::Char('i') => app.toggle_input_mode(),
                            KeyCode::Up => app.mem_scroll = app.mem_scroll.saturating_sub(1),
                            KeyCode::Down => {
                                if app.mem_scroll < crate::cpu::RAM_SIZE - 1 {
                                    app.mem_scroll += 1;
                                }
                            }
                            KeyCode::PageUp => app.mem_scroll = app.mem_scroll.saturating_sub(16),
                            KeyCode::PageDown => {
                                app.mem_scroll =
                                    (app.mem_scroll + 16).min(crate::cpu::RAM_SIZE - 1);
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
