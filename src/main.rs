use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table};

use squad_matrix::binding::{BindingConfig, PresentationState, RequestTicket, Selection};
use squad_matrix::config::MatrixConfig;
use squad_matrix::matrix_export;
use squad_matrix::provider::spawn_matrix_provider;
use squad_matrix::scale::Intensity;
use squad_matrix::state::{apply_delta, AppState, Delta, ProviderCommand};
use squad_matrix::table::{MatrixTable, NameStyle};

const CELL_WIDTH: u16 = 5;
const NAME_WIDTH: u16 = 12;

struct App {
    state: AppState,
    config: MatrixConfig,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_option(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_option(),
            KeyCode::Enter => {
                let ticket = self.state.activate_option();
                self.dispatch(ticket);
            }
            KeyCode::Backspace | KeyCode::Char('c') => {
                self.state.clear_selection();
                self.state.push_log("[INFO] Selection cleared");
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('h') | KeyCode::Left => self.state.move_cursor(0, -1),
            KeyCode::Char('l') | KeyCode::Right => self.state.move_cursor(0, 1),
            KeyCode::Char('K') => self.state.move_cursor(-1, 0),
            KeyCode::Char('J') => self.state.move_cursor(1, 0),
            KeyCode::Char('s') => {
                let mut cfg = self.state.binding.config();
                cfg.scale = cfg.scale.toggled();
                self.apply_binding_config(cfg);
            }
            KeyCode::Char('n') => {
                let mut cfg = self.state.binding.config();
                cfg.names = match cfg.names {
                    NameStyle::FirstName => NameStyle::FirstNameInitial,
                    NameStyle::FirstNameInitial => NameStyle::FirstName,
                };
                self.apply_binding_config(cfg);
            }
            KeyCode::Char('e') => self.export_current(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn apply_binding_config(&mut self, cfg: BindingConfig) {
        self.state.binding.set_config(cfg);
        self.reload();
    }

    /// Re-requests whatever scope is currently shown.
    fn reload(&mut self) {
        let scope = match self.state.binding.state() {
            PresentationState::Idle => return,
            PresentationState::Loading { ticket } => ticket.scope.clone(),
            PresentationState::Populated { scope, .. }
            | PresentationState::Empty { scope }
            | PresentationState::Error { scope, .. } => scope.clone(),
        };
        let label = self.config.scope_label(&scope);
        let ticket = self
            .state
            .binding
            .select(Selection::scope(scope, label));
        self.dispatch(ticket);
    }

    fn dispatch(&mut self, ticket: Option<RequestTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        let id = ticket.id;
        if self.cmd_tx.send(ProviderCommand::FetchMatrix(ticket)).is_err() {
            self.state.push_log("[WARN] Matrix provider unavailable");
        } else {
            self.state.push_log(format!("[INFO] Matrix request #{id} sent"));
        }
    }

    fn export_current(&mut self) {
        let Some(table) = self.state.binding.table() else {
            self.state.push_log("[INFO] Nothing to export");
            return;
        };
        let title = self
            .state
            .binding
            .title()
            .unwrap_or("Player Matrix")
            .to_string();
        let path = matrix_export::default_export_path(&self.config.export_dir, &title);
        match matrix_export::export_matrix_xlsx(&path, &title, table) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} players to {}",
                report.players,
                report.path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let config = MatrixConfig::load();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _provider = spawn_matrix_provider(config.matrix_source(), tx, cmd_rx);

    let mut app = App {
        state: AppState::new(&config),
        config,
        should_quit: false,
        cmd_tx,
    };
    app.state.push_log(format!(
        "[INFO] Source {:?}, scale {}",
        app.config.source,
        app.config.scale.label()
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(chunks[1]);
    render_scope_list(frame, body[0], &app.state);
    render_matrix_pane(frame, body[1], &app.state);

    let tooltip = app
        .state
        .focused_cell()
        .map(|c| c.tooltip.clone())
        .unwrap_or_default();
    let status = Paragraph::new(tooltip).block(Block::default().title("Cell").borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(
        "j/k Scope | Enter Load | c Clear | h/l/J/K Cell | s Scale | n Names | r Reload | e Export | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let cfg = app.state.binding.config();
    let title = app.state.binding.title().unwrap_or("Player Matrix");
    format!(
        "{title} | {} | Scale: {} | Names: {}",
        app.state.binding.state().label(),
        cfg.scale.label(),
        match cfg.names {
            NameStyle::FirstName => "FIRST",
            NameStyle::FirstNameInitial => "INITIAL",
        }
    )
}

fn render_scope_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = state
        .options
        .iter()
        .enumerate()
        .map(|(idx, opt)| {
            let prefix = if idx == state.option_selected { "> " } else { "  " };
            let style = if idx == state.option_selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(format!("{prefix}{}", opt.label)).style(style)
        })
        .collect();
    let list = List::new(items).block(Block::default().title("Scope").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_matrix_pane(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Matrix").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visibility = state.binding.visibility();
    if visibility.loading {
        let loading = Paragraph::new("Loading matrix...").style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, inner);
    } else if visibility.table {
        if let Some(table) = state.binding.table() {
            render_matrix_table(frame, inner, table, state.cursor);
        }
    } else if let Some(message) = state.binding.message() {
        let msg = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, inner);
    } else {
        let idle = Paragraph::new("Select a team to show its player matrix")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(idle, inner);
    }
}

fn render_matrix_table(frame: &mut Frame, area: Rect, table: &MatrixTable, cursor: (usize, usize)) {
    let visible_cols = (area.width.saturating_sub(NAME_WIDTH) / (CELL_WIDTH + 1)).max(1) as usize;
    let visible_rows = area.height.saturating_sub(1).max(1) as usize;
    let (col_start, col_end) = visible_range(cursor.1, table.size(), visible_cols);
    let (row_start, row_end) = visible_range(cursor.0, table.size(), visible_rows);

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(
        table.header[col_start..col_end]
            .iter()
            .map(|name| Cell::from(truncate(name, CELL_WIDTH as usize))),
    );
    let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = table.rows[row_start..row_end]
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(truncate(&row.header, NAME_WIDTH as usize))
                .style(Style::default().add_modifier(Modifier::BOLD))];
            cells.extend(row.cells[col_start..col_end].iter().map(|cell| {
                let mut style = intensity_style(&cell.intensity);
                if (cell.row, cell.col) == cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(format!("{:>width$}", cell.content, width = CELL_WIDTH as usize))
                    .style(style)
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(NAME_WIDTH)];
    widths.extend(std::iter::repeat(Constraint::Length(CELL_WIDTH)).take(col_end - col_start));
    let widget = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(widget, area);
}

fn intensity_style(intensity: &Intensity) -> Style {
    let rgb = intensity.rgb();
    let fg = if rgb.is_dark() {
        Color::White
    } else {
        Color::Black
    };
    Style::default().bg(Color::Rgb(rgb.r, rgb.g, rgb.b)).fg(fg)
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Player Matrix - Help",
        "",
        "Scope:",
        "  j/k or ↑/↓   Move in scope list",
        "  Enter        Load highlighted scope",
        "  c / Bksp     Clear selection",
        "  r            Reload current scope",
        "",
        "Matrix:",
        "  h/l or ←/→   Move cell cursor",
        "  J/K          Move cell cursor down/up",
        "  s            Toggle continuous/banded scale",
        "  n            Toggle name style",
        "  e            Export to xlsx",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
