//! Terminal playground for editrix-core.
//!
//! Drives a headless editing engine with real terminal input and paints the rendered surface
//! with ratatui.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p editrix-playground -- [--config options.json]
//! ```
//!
//! The config file holds [`EditorOptions`] as JSON, for example:
//!
//! ```json
//! { "initial_block": "h1", "overrides": { "key_bindings": { "bold": "Ctrl+Shift+b" } } }
//! ```
//!
//! # Logging
//!
//! Logging is off unless `RUST_LOG` is set. Output goes to `EDITRIX_LOG_FILE`
//! (default `editrix-playground.log`) so it does not corrupt the terminal UI.
//!
//! ```bash
//! RUST_LOG=editrix_core=trace cargo run -p editrix-playground
//! ```
//!
//! # Shortcuts
//!
//! - Arrow keys: move the caret
//! - Mouse click: place the caret
//! - Enter / Backspace: split / merge blocks
//! - Ctrl+B: start a bold run (or the configured override)
//! - Ctrl+1 / Ctrl+2 / Ctrl+3: heading level; Ctrl+0: paragraph
//! - Ctrl+Q: quit

use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEvent as TermKeyEvent, KeyEventKind, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use editrix_core::{
    BlockTag, EditorCommand, EditorOptions, EventOutcome, HeadlessEngine, InputEvent, KeyCombo,
    KeyEvent, LINE_HEIGHT, Subscription, SurfaceLine, headless_engine,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{self, stdout},
    path::PathBuf,
    process,
    time::Duration,
};

const DEFAULT_LOG_FILE: &str = "editrix-playground.log";

/// Heading shortcuts registered as host commands.
const HEADING_COMMANDS: [(&str, &str, BlockTag); 4] = [
    ("0", "paragraph", BlockTag::Paragraph),
    ("1", "heading-1", BlockTag::Heading1),
    ("2", "heading-2", BlockTag::Heading2),
    ("3", "heading-3", BlockTag::Heading3),
];

struct App {
    engine: HeadlessEngine,
    /// Held until shutdown; handed back to the engine on quit.
    subscription: Option<Subscription>,
    should_quit: bool,
    status_message: String,
    /// First surface row shown in the editor area.
    scroll_top: usize,
    /// Editor area of the last frame, borders included.
    editor_area: Rect,
}

impl App {
    fn new(options: &EditorOptions) -> io::Result<Self> {
        let mut engine = headless_engine(options).map_err(io::Error::other)?;

        for (key, name, tag) in HEADING_COMMANDS {
            let command = EditorCommand::Custom(name.to_string());
            engine.register_command(command.clone(), move |editor, _| {
                editor.set_block_tag(tag);
            });
            engine
                .key_bindings_mut()
                .bind(KeyCombo::new(key).ctrl(), command);
        }

        let subscription = engine.attach().map_err(io::Error::other)?;
        log::info!(
            "playground started with {} key bindings",
            engine.key_bindings().len()
        );

        Ok(Self {
            engine,
            subscription: Some(subscription),
            should_quit: false,
            status_message: String::new(),
            scroll_top: 0,
            editor_area: Rect::default(),
        })
    }

    fn quit(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.engine.detach(subscription);
        }
        self.should_quit = true;
    }

    fn handle_key_event(&mut self, key: TermKeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        {
            self.quit();
            return;
        }

        let Some(event) = translate_key(&key) else {
            return;
        };
        let outcome = self.engine.handle_event(&InputEvent::Key(event.clone()));
        self.status_message = match outcome {
            EventOutcome::Consumed => String::new(),
            EventOutcome::Ignored => format!("unbound: {}", KeyCombo::from_event(&event)),
        };
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let inner = inner_area(self.editor_area);
        if mouse.column < inner.x
            || mouse.row < inner.y
            || mouse.column >= inner.x + inner.width
            || mouse.row >= inner.y + inner.height
        {
            return;
        }

        let x = f32::from(mouse.column - inner.x);
        let row = usize::from(mouse.row - inner.y) + self.scroll_top;
        let y = (row as f32 + 0.5) * LINE_HEIGHT;
        if !self
            .engine
            .handle_event(&InputEvent::Pointer { x, y })
            .is_consumed()
        {
            self.status_message = "no text under pointer".to_string();
        }
    }

    fn handle_paste(&mut self, text: String) {
        self.engine.editor_mut().insert_text(&text);
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.editor_area = chunks[0];
        let lines = self.engine.editor().renderer().lines();
        self.scroll_to_caret(&lines, inner_area(chunks[0]).height as usize);

        self.render_editor(frame, chunks[0], &lines);
        self.render_status_line(frame, chunks[1], &lines);
        self.render_shortcuts(frame, chunks[2]);
    }

    fn scroll_to_caret(&mut self, lines: &[SurfaceLine], height: usize) {
        let Some(caret_row) = lines.iter().position(|line| line.caret.is_some()) else {
            return;
        };
        if height == 0 {
            return;
        }
        if caret_row < self.scroll_top {
            self.scroll_top = caret_row;
        } else if caret_row >= self.scroll_top + height {
            self.scroll_top = caret_row + 1 - height;
        }
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, lines: &[SurfaceLine]) {
        let inner = inner_area(area);
        let display_lines: Vec<Line> = lines
            .iter()
            .skip(self.scroll_top)
            .take(inner.height as usize)
            .map(|line| {
                let base = style_for_tag(&line.tag);
                let spans: Vec<Span> = line
                    .spans
                    .iter()
                    .map(|span| {
                        let style = if span.bold {
                            base.add_modifier(Modifier::BOLD)
                        } else {
                            base
                        };
                        Span::styled(span.text.clone(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let paragraph = Paragraph::new(display_lines)
            .block(Block::default().borders(Borders::ALL).title(" editrix "));
        frame.render_widget(paragraph, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let Some((row, column)) = lines
            .iter()
            .enumerate()
            .find_map(|(row, line)| line.caret.map(|column| (row, column)))
        else {
            return;
        };
        if row < self.scroll_top || row >= self.scroll_top + inner.height as usize {
            return;
        }

        let max_x = inner.x + inner.width - 1;
        let cursor_x = (inner.x as usize + column).min(max_x as usize) as u16;
        let cursor_y = inner.y + (row - self.scroll_top) as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect, lines: &[SurfaceLine]) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let cursor = self.engine.cursor();
            let row = lines
                .iter()
                .position(|line| line.block_id.is_some() && line.block_id == cursor.block);
            let tag = self
                .engine
                .editor()
                .current_block()
                .map(|block| block.tag().as_str())
                .unwrap_or("-");
            format!(
                "block {}/{} | {} | offset {}",
                row.map_or(0, |row| row + 1),
                self.engine.document().len(),
                tag,
                cursor.offset
            )
        };

        let status_line = Paragraph::new(text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let bold = self
            .engine
            .key_bindings()
            .combos_for(&EditorCommand::Bold)
            .first()
            .map(|combo| combo.to_string())
            .unwrap_or_else(|| "-".to_string());
        let shortcuts = format!(
            "{}:bold  Ctrl+1/2/3:heading  Ctrl+0:paragraph  Enter/Backspace:split/merge  Ctrl+Q:quit",
            bold
        );
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn inner_area(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn style_for_tag(tag: &str) -> Style {
    match tag.parse::<BlockTag>().unwrap_or_default() {
        BlockTag::Heading1 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
        BlockTag::Heading2 => Style::default().fg(Color::Cyan),
        BlockTag::Heading3 => Style::default().fg(Color::Yellow),
        BlockTag::Paragraph => Style::default(),
    }
}

/// Map a terminal key press onto the engine's key vocabulary.
fn translate_key(key: &TermKeyEvent) -> Option<KeyEvent> {
    let name = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return None,
    };

    let mut event = KeyEvent::new(name);
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        event = event.with_ctrl();
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        event = event.with_alt();
    }
    if key.modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        event = event.with_meta();
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        event = event.with_shift();
    }
    Some(event)
}

fn init_logging() -> io::Result<()> {
    if env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let path = env::var_os("EDITRIX_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let file = fs::File::create(&path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_options(args: &[String]) -> Result<EditorOptions, String> {
    match args {
        [] => Ok(EditorOptions::default()),
        [flag, path] if flag == "--config" => {
            let text = fs::read_to_string(path).map_err(|err| format!("{}: {}", path, err))?;
            EditorOptions::from_json(&text).map_err(|err| format!("{}: {}", path, err))
        }
        _ => Err("unexpected arguments".to_string()),
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = match load_options(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!("usage: {} [--config <path>]", env!("CARGO_PKG_NAME"));
            process::exit(1);
        }
    };

    init_logging()?;
    let mut app = App::new(&options)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                Event::Paste(text) => app.handle_paste(text),
                _ => {}
            }
        }
    }

    log::info!("playground exiting");
    Ok(())
}
