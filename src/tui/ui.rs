//! UI rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::io::{Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
use super::app::DebuggerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .split(frame.area());

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(rows[0]);

    // Left side: code and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(top[0]);

    draw_disassembly(frame, left_chunks[0], app);
    draw_registers(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: memory and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(5),
        ])
        .split(top[1]);

    draw_memory(frame, right_chunks[0], app);
    draw_help(frame, right_chunks[1]);

    draw_screen(frame, rows[1], app.computer.screen());
}

/// Draw disassembly view.
fn draw_disassembly(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let disasm = app.get_disassembly((area.height as usize).saturating_sub(2));

    let items: Vec<ListItem> = disasm
        .iter()
        .map(|(addr, instr, is_current)| {
            let prefix = if *is_current { "▶ " } else { "  " };
            let bp = if app.breakpoints.contains(addr) { "●" } else { " " };
            let text = format!("{}{:05}: {}", prefix, addr, instr);

            let style = if *is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if app.breakpoints.contains(addr) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            ListItem::new(format!("{} {}", bp, text)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Disassembly ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw register state.
fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let regs = app.computer.registers();
    let keyboard = app.computer.keyboard().current();

    let content = vec![
        Line::from(vec![
            Span::raw("A: "),
            Span::styled(format!("{:>6}", regs.a), Style::default().fg(Color::White)),
            Span::raw(format!(" ({:016b})", regs.a as u16)),
        ]),
        Line::from(vec![
            Span::raw("D: "),
            Span::styled(format!("{:>6}", regs.d), Style::default().fg(Color::White)),
            Span::raw(format!(" ({:016b})", regs.d as u16)),
        ]),
        Line::from(vec![
            Span::raw("PC: "),
            Span::styled(format!("{}", regs.pc), Style::default().fg(Color::Yellow)),
            Span::raw("   Cycles: "),
            Span::styled(
                format!("{}", app.computer.cpu().cycles),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("   KBD: "),
            Span::styled(format!("{}", keyboard),
                if keyboard != 0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::DarkGray)
                }),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw RAM view.
fn draw_memory(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let ram = app.computer.cpu().ram().ram();
    let visible_rows = (area.height as usize).saturating_sub(2);
    let start = app.mem_scroll;
    let end = (start + visible_rows).min(ram.len());
    let a = app.computer.registers().a;

    let items: Vec<ListItem> = (start..end)
        .map(|addr| {
            let value = ram[addr];
            let is_a = addr as i32 == a as i32;

            let text = format!("{:05}: {:>6}", addr, value);

            let style = if is_a {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if value != 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" RAM ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw a downsampled view of the framebuffer with half-block characters.
fn draw_screen(frame: &mut Frame, area: Rect, screen: &Screen) {
    let cols = (area.width as usize).saturating_sub(2).max(1);
    let rows = (area.height as usize).saturating_sub(2).max(1);
    // Each character cell covers sx×(2·sy) pixels.
    let sx = SCREEN_WIDTH.div_ceil(cols);
    let sy = SCREEN_HEIGHT.div_ceil(rows * 2);

    let lit = |cx: usize, cy: usize| {
        (cy * sy..((cy + 1) * sy).min(SCREEN_HEIGHT))
            .any(|y| (cx * sx..((cx + 1) * sx).min(SCREEN_WIDTH)).any(|x| screen.pixel(x, y)))
    };

    let width = SCREEN_WIDTH.div_ceil(sx);
    let height = SCREEN_HEIGHT.div_ceil(sy * 2);
    let lines: Vec<Line> = (0..height)
        .map(|row| {
            let text: String = (0..width)
                .map(|col| match (lit(col, row * 2), lit(col, row * 2 + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect();
            Line::from(text)
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::Green))
        .block(Block::default()
            .title(format!(" Screen (1:{}×{}) ", sx, sy * 2))
            .borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(if app.input_mode { Color::Green } else { Color::White }))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Breakpoint"),
        Line::from("x: Reset  X: Reboot  i: Input mode"),
        Line::from("↑↓: Scroll RAM  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}
