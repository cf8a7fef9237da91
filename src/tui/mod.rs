//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};
use std::io::{stdout, Stdout};

use crate::format::format_last_trained;
use crate::muscles::{Muscle, MAIN_GROUPS};
use crate::session::{superset_options, Pick, SupersetSelection};
use crate::tracker::Tracker;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// What the keyboard is currently driving
enum Mode {
    Dashboard,
    Picking {
        main: Muscle,
        selection: SupersetSelection,
    },
}

/// App state for TUI
pub struct App {
    tracker: Tracker,
    mode: Mode,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            mode: Mode::Dashboard,
            status: None,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        let result = self.event_loop(&mut terminal);

        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new("supersets - Workout Rotation")
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // Recommendation
        let rec = self.tracker.recommendation();
        let supersets: Vec<_> = rec.supersets.iter().map(|(m, _)| m.name()).collect();
        let recommended = Paragraph::new(vec![
            Line::from(rec.main.label()).style(Style::default().fg(Color::Green).bold()),
            Line::from(format!("Last trained: {}", rec.main_days)),
            Line::from(format!("Suggested supersets: {}", supersets.join(", "))),
        ])
        .block(Block::default().borders(Borders::ALL).title("Recommended Workout"));
        frame.render_widget(recommended, chunks[1]);

        // History table
        let rows: Vec<Row> = self
            .tracker
            .report()
            .into_iter()
            .map(|status| {
                let style = if status.muscle == rec.main {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(status.muscle.label()),
                    Cell::from(format_last_trained(status.last_trained, status.days)),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(20)])
            .header(Row::new(vec!["Muscle", "Last trained"]).style(Style::default().bold()))
            .block(Block::default().borders(Borders::ALL).title("Workout History"));
        frame.render_widget(table, chunks[2]);

        // Footer
        let hint = match &self.mode {
            Mode::Dashboard => {
                let mains: Vec<_> = MAIN_GROUPS
                    .iter()
                    .enumerate()
                    .map(|(i, m)| format!("{}: {}", i + 1, m.name()))
                    .collect();
                format!("{} | q: quit", mains.join(" | "))
            }
            Mode::Picking { .. } => "digits: toggle | n: none | enter: save | esc: cancel".to_string(),
        };
        let footer_text = match &self.status {
            Some(status) => format!("{}  ·  {}", status, hint),
            None => hint,
        };
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);

        if let Mode::Picking { main, selection } = &self.mode {
            render_picker(frame, area, *main, selection);
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match &mut self.mode {
                Mode::Dashboard => match key.code {
                    KeyCode::Char('q') => self.should_quit = true,
                    KeyCode::Char(c @ '1'..='4') => {
                        let main = MAIN_GROUPS[c as usize - '1' as usize];
                        self.mode = Mode::Picking {
                            main,
                            selection: SupersetSelection::Empty,
                        };
                        self.status = None;
                    }
                    _ => {}
                },
                Mode::Picking { main, selection } => match key.code {
                    KeyCode::Esc => self.mode = Mode::Dashboard,
                    KeyCode::Char('n') => selection.pick(Pick::None),
                    KeyCode::Char(c @ '1'..='9') => {
                        let options = picker_muscles(*main);
                        if let Some(muscle) = options.get(c as usize - '1' as usize) {
                            selection.pick(Pick::Muscle(*muscle));
                        }
                    }
                    KeyCode::Enter => {
                        let (main, selection) = (*main, selection.clone());
                        self.tracker.log_workout(main, &selection)?;
                        self.status = Some(format!("Saved {} workout", main.name()));
                        self.mode = Mode::Dashboard;
                    }
                    _ => {}
                },
            }
        }
        Ok(())
    }
}

/// Picker muscles flattened in display order; key `1` is the first entry
fn picker_muscles(main: Muscle) -> Vec<Muscle> {
    superset_options(main)
        .into_iter()
        .flat_map(|(_, muscles)| muscles)
        .collect()
}

fn render_picker(frame: &mut Frame, area: Rect, main: Muscle, selection: &SupersetSelection) {
    let none_selected = matches!(selection, SupersetSelection::NoneSelected);
    let mark = |on: bool| if on { "[x]" } else { "[ ]" };

    let mut lines = vec![Line::from(format!("n  {} None", mark(none_selected))), Line::from("")];
    let mut key = 1;
    for (category, muscles) in superset_options(main) {
        lines.push(Line::from(category).style(Style::default().bold()));
        for muscle in muscles {
            let style = if none_selected {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::from(format!("{}  {} {}", key, mark(selection.is_selected(muscle)), muscle.label())).style(style));
            key += 1;
        }
    }

    let popup = centered(area, 44, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    let picker = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Select Supersets for {}", main.name())),
    );
    frame.render_widget(picker, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
