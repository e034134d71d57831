use std::mem;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::{CardStore, StoreError};
use crate::models::{Card, CardId, NO_SELECTION};
use crate::view::{parse_selection, CardView};

use super::helpers::{card_detail_lines, centered_rect, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Share of the width given to the card list.
const LIST_PERCENT: u16 = 35;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// What the content area shows.
enum Screen {
    Cards(CardView),
    /// The last request hit a store fault. Nothing from it is shown.
    Failed,
}

/// Input modes layered on top of the screen.
enum Mode {
    Normal,
    GoTo(String),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: CardStore,
    image_dir: PathBuf,
    screen: Screen,
    /// Row under the cursor in the card list.
    highlighted: usize,
    /// Last submitted id, reused when the default view is re-rendered.
    held: CardId,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and render the default view.
    pub fn new(store: CardStore, image_dir: PathBuf) -> Self {
        let mut app = Self {
            store,
            image_dir,
            screen: Screen::Failed,
            highlighted: 0,
            held: NO_SELECTION,
            mode: Mode::Normal,
            status: None,
        };
        app.show_default();
        app
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::GoTo(input) => self.handle_go_to(code, input),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.move_highlight(-1),
            KeyCode::Down => self.move_highlight(1),
            KeyCode::PageUp => self.move_highlight(-PAGE_STEP),
            KeyCode::PageDown => self.move_highlight(PAGE_STEP),
            KeyCode::Home => self.highlighted = 0,
            KeyCode::End => self.highlighted = self.item_count().saturating_sub(1),
            KeyCode::Enter => match self.highlighted_id() {
                Some(id) => self.submit(id),
                None => self.set_status("No card to show.", StatusKind::Error),
            },
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.clear_status();
                return Mode::GoTo(String::new());
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.show_default();
                if matches!(self.screen, Screen::Cards(_)) {
                    self.set_status("Reloaded.", StatusKind::Info);
                }
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_image(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_go_to(&mut self, code: KeyCode, mut input: String) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                match parse_selection(&input) {
                    Ok(id) => self.submit(id),
                    Err(err) => {
                        log::warn!("rejected card id input: {err}");
                        self.set_status(err.to_string(), StatusKind::Error);
                    }
                }
                return Mode::Normal;
            }
            _ => {}
        }
        Mode::GoTo(input)
    }

    /// Default view: full listing plus whatever selection is held.
    fn show_default(&mut self) {
        let result = CardView::initial(&self.store, self.held);
        self.apply(result);
    }

    /// View for a submitted id.
    fn submit(&mut self, id: CardId) {
        self.held = id;
        let result = CardView::submit(&self.store, id);
        self.apply(result);

        let found = match &self.screen {
            Screen::Cards(view) => view.selected.is_some(),
            Screen::Failed => return,
        };
        if id == NO_SELECTION {
            self.set_status("No card selected.", StatusKind::Info);
        } else if !found {
            self.set_status(format!("No card with id {id}."), StatusKind::Info);
        } else {
            self.clear_status();
        }
    }

    fn apply(&mut self, result: Result<CardView, StoreError>) {
        match result {
            Ok(view) => {
                if let Some(idx) = view.position_of(view.selected_id) {
                    self.highlighted = idx;
                } else if self.highlighted >= view.items.len() {
                    self.highlighted = view.items.len().saturating_sub(1);
                }
                self.screen = Screen::Cards(view);
            }
            Err(err) => {
                log::error!("{:#}", anyhow::Error::new(err));
                self.screen = Screen::Failed;
                self.highlighted = 0;
                self.set_status("Could not read the card store.", StatusKind::Error);
            }
        }
    }

    fn open_image(&mut self) {
        let Some(card) = self.selected_card() else {
            self.set_status("No card selected.", StatusKind::Error);
            return;
        };
        let file_name = card.image_file_name.trim().to_string();
        let name = card.name.clone();
        if file_name.is_empty() {
            self.set_status("This card does not have an image.", StatusKind::Error);
            return;
        }

        let path = self.image_dir.join(&file_name);
        let result = if path.exists() {
            open_path(&path).with_context(|| format!("failed to open {}", path.display()))
        } else {
            Err(anyhow!("image not found: {}", path.display()))
        };

        match result {
            Ok(()) => self.set_status(format!("Opened image for {name}."), StatusKind::Info),
            Err(err) => {
                log::warn!("{err:#}");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Cards(view) => self.draw_cards(frame, content_area, view),
            Screen::Failed => self.draw_failure(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::GoTo(input) = &self.mode {
            self.draw_go_to(frame, area, input);
        }
    }

    fn draw_cards(&self, frame: &mut Frame, area: Rect, view: &CardView) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(LIST_PERCENT),
                Constraint::Percentage(100 - LIST_PERCENT),
            ])
            .split(area);

        let list_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Cards ({})", view.items.len()));

        if view.items.is_empty() {
            let message = Paragraph::new("No cards in the store.")
                .alignment(Alignment::Center)
                .block(list_block);
            frame.render_widget(message, chunks[0]);
        } else {
            let shown_id = view.selected.as_ref().map(|card| card.id);
            let items: Vec<ListItem> = view
                .items
                .iter()
                .map(|item| {
                    let marker = if Some(item.id) == shown_id { "> " } else { "  " };
                    ListItem::new(format!("{marker}{item}"))
                })
                .collect();
            let list = List::new(items)
                .block(list_block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
            let mut state = ListState::default().with_selected(Some(self.highlighted));
            frame.render_stateful_widget(list, chunks[0], &mut state);
        }

        let detail_block = Block::default().borders(Borders::ALL).title("Card");
        let detail = match &view.selected {
            Some(card) => Paragraph::new(card_detail_lines(card))
                .block(detail_block)
                .wrap(Wrap { trim: false }),
            None => Paragraph::new("No card selected.")
                .alignment(Alignment::Center)
                .block(detail_block),
        };
        frame.render_widget(detail, chunks[1]);
    }

    fn draw_failure(&self, frame: &mut Frame, area: Rect) {
        let message = Paragraph::new(vec![
            Line::from(Span::styled(
                "The card store could not be read.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from("Press [r] to try again or [q] to quit."),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_go_to(&self, frame: &mut Frame, area: Rect, input: &str) {
        let centered = centered_rect(40, 20, area);
        let popup = Rect {
            x: centered.x,
            y: area.y,
            width: centered.width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, popup);

        let block = Block::default().borders(Borders::ALL).title("Go to card id");
        let paragraph = Paragraph::new(Span::raw(format!("Id: {input}"))).block(block.clone());
        frame.render_widget(paragraph, popup);

        let inner = block.inner(popup);
        let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = inner
            .x
            .saturating_add("Id: ".len() as u16)
            .saturating_add(typed);
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.mode, &self.screen) {
            (Mode::GoTo(_), _) => &[("[Enter]", " Show   "), ("[Esc]", " Cancel")],
            (Mode::Normal, Screen::Failed) => &[("[r]", " Retry   "), ("[q]", " Quit")],
            (Mode::Normal, Screen::Cards(_)) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Show   "),
                ("[g]", " Go to id   "),
                ("[o]", " Open image   "),
                ("[r]", " Reload   "),
                ("[q]", " Quit"),
            ],
        };

        Line::from(
            keys.iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn item_count(&self) -> usize {
        match &self.screen {
            Screen::Cards(view) => view.items.len(),
            Screen::Failed => 0,
        }
    }

    fn highlighted_id(&self) -> Option<CardId> {
        match &self.screen {
            Screen::Cards(view) => view.items.get(self.highlighted).map(|item| item.id),
            Screen::Failed => None,
        }
    }

    fn selected_card(&self) -> Option<&Card> {
        match &self.screen {
            Screen::Cards(view) => view.selected.as_ref(),
            Screen::Failed => None,
        }
    }

    fn move_highlight(&mut self, offset: isize) {
        let len = self.item_count();
        if len == 0 {
            return;
        }
        let new = (self.highlighted as isize + offset).clamp(0, len as isize - 1);
        self.highlighted = new as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use rusqlite::{params, Connection};
    use tempfile::TempDir;

    fn app_with(rows: &[(CardId, &str, &str)]) -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.db");
        ensure_schema(&path).unwrap();
        let conn = Connection::open(&path).unwrap();
        for (id, name, image) in rows {
            conn.execute(
                "INSERT INTO TLACardList VALUES (?1, ?2, 'Alpha', 'Instant', 1.0, 'R', 'Deal 3 damage', ?3)",
                params![id, name, image],
            )
            .unwrap();
        }
        let app = App::new(CardStore::new(path), dir.path().join("images"));
        (dir, app)
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|s| s.text.as_str())
    }

    fn shown(app: &App) -> Option<CardId> {
        app.selected_card().map(|card| card.id)
    }

    #[test]
    fn starts_with_listing_and_no_card() {
        let (_dir, app) = app_with(&[(1, "Lightning Bolt", "bolt.png")]);
        assert_eq!(app.item_count(), 1);
        assert_eq!(shown(&app), None);

        let screen = render(&app);
        assert!(screen.contains("Lightning Bolt"));
        assert!(screen.contains("No card selected."));
    }

    #[test]
    fn enter_shows_highlighted_card() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", ""), (2, "Shock", "")]);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(shown(&app), Some(2));
        assert!(render(&app).contains("Deal 3 damage"));
    }

    #[test]
    fn highlight_stays_in_bounds() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", ""), (2, "Shock", "")]);
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.highlighted, 1);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.highlighted, 0);
        app.handle_key(KeyCode::End);
        assert_eq!(app.highlighted, 1);
    }

    #[test]
    fn go_to_unknown_id_shows_nothing() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "")]);
        app.handle_key(KeyCode::Char('g'));
        app.handle_key(KeyCode::Char('2'));
        app.handle_key(KeyCode::Enter);
        assert_eq!(shown(&app), None);
        assert_eq!(status_text(&app), Some("No card with id 2."));
    }

    #[test]
    fn go_to_known_id_moves_highlight() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", ""), (2, "Shock", "")]);
        for code in [KeyCode::Char('g'), KeyCode::Char('2'), KeyCode::Enter] {
            app.handle_key(code);
        }
        assert_eq!(shown(&app), Some(2));
        assert_eq!(app.highlighted, 1);
    }

    #[test]
    fn go_to_rejects_non_numeric_input() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "")]);
        app.handle_key(KeyCode::Char('g'));
        for c in "1 OR 1=1".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(shown(&app), None);
        assert_eq!(status_text(&app), Some("'1 OR 1=1' is not a card id"));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn go_to_escape_cancels() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "")]);
        app.handle_key(KeyCode::Char('g'));
        app.handle_key(KeyCode::Char('1'));
        assert!(!app.handle_key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(shown(&app), None);
    }

    #[test]
    fn long_go_to_input_renders() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "")]);
        app.mode = Mode::GoTo("9".repeat(70_000));
        assert!(render(&app).contains("Go to card id"));
    }

    #[test]
    fn zero_id_row_is_not_shown_at_start() {
        let (_dir, mut app) = app_with(&[(0, "Zero", ""), (1, "Lightning Bolt", "")]);
        assert_eq!(app.item_count(), 2);
        assert_eq!(shown(&app), None);

        app.handle_key(KeyCode::Enter);
        assert_eq!(shown(&app), None);
        assert_eq!(status_text(&app), Some("No card selected."));
    }

    #[test]
    fn reload_keeps_held_selection() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "")]);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(shown(&app), Some(1));
    }

    #[test]
    fn empty_store_renders_empty_list() {
        let (_dir, mut app) = app_with(&[]);
        let screen = render(&app);
        assert!(screen.contains("No cards in the store."));
        app.handle_key(KeyCode::Enter);
        assert_eq!(status_text(&app), Some("No card to show."));
    }

    #[test]
    fn missing_store_shows_failure_instead_of_data() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            CardStore::new(dir.path().join("missing.db")),
            dir.path().to_path_buf(),
        );
        assert!(matches!(app.screen, Screen::Failed));
        assert_eq!(status_text(&app), Some("Could not read the card store."));
        assert!(render(&app).contains("could not be read"));
    }

    #[test]
    fn open_image_reports_missing_file() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "bolt.png")]);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('o'));
        let status = status_text(&app).unwrap();
        assert!(status.starts_with("image not found"));
    }

    #[test]
    fn open_image_without_selection() {
        let (_dir, mut app) = app_with(&[(1, "Lightning Bolt", "bolt.png")]);
        app.handle_key(KeyCode::Char('o'));
        assert_eq!(status_text(&app), Some("No card selected."));
    }

    #[test]
    fn q_quits() {
        let (_dir, mut app) = app_with(&[]);
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
