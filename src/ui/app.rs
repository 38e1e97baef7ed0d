use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::error;

use crate::catalog::{Catalog, SearchField, Stats};
use crate::menu::{dispatch, Action, MenuEntry, Outcome};
use crate::store::Store;

use super::forms::{BookField, BookForm, ConfirmQuit, QuitChoice, RemoveForm};
use super::helpers::{book_line, centered_rect, key_hint, surface_error};
use super::screens::{ListingScreen, SearchScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the sidebar holding the menu.
const MENU_WIDTH: u16 = 26;
/// Rows moved by PageUp/PageDown in listings.
const PAGE_STEP: isize = 5;
/// Shown when the saved library could not be parsed at startup.
const LOAD_FAILURE_MESSAGE: &str = "Error loading library data. Starting with an empty library.";

/// Content pane for the active menu entry. Display entries hold a snapshot
/// taken when they were opened.
enum Screen {
    AddBook(BookForm),
    RemoveBook(RemoveForm),
    Search(SearchScreen),
    Library(ListingScreen),
    Statistics(Stats),
    Save,
}

/// Which half of the window receives key presses.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    Menu,
    Content,
}

/// Modal overlays on top of the regular layout.
enum Mode {
    Normal,
    ConfirmQuit(ConfirmQuit),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
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

/// Central application state: the session catalog, its store, and the UI
/// state layered over them.
pub struct App {
    catalog: Catalog,
    store: Store,
    menu_index: usize,
    screen: Screen,
    focus: Focus,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(catalog: Catalog, store: Store) -> Self {
        Self {
            catalog,
            store,
            menu_index: 0,
            screen: Screen::AddBook(BookForm::default()),
            focus: Focus::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Tell the user the saved library was unreadable and the session started
    /// empty.
    pub fn notify_load_failure(&mut self) {
        self.set_status(LOAD_FAILURE_MESSAGE, StatusKind::Error);
    }

    /// Route a key press. Returns `true` once the user has chosen to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => match self.focus {
                Focus::Menu => self.handle_menu_key(code, &mut exit),
                Focus::Content => {
                    self.handle_content_key(code);
                    Mode::Normal
                }
            },
            Mode::ConfirmQuit(confirm) => self.handle_confirm_quit(code, confirm, &mut exit),
        };

        Ok(exit)
    }

    /// Save from anywhere, outside of dialogs.
    pub(crate) fn handle_ctrl_s(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.run(Action::Save);
        }
    }

    fn current_entry(&self) -> MenuEntry {
        MenuEntry::ALL[self.menu_index]
    }

    fn handle_menu_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return self.request_quit(exit),
            KeyCode::Up => self.move_menu(-1),
            KeyCode::Down => self.move_menu(1),
            KeyCode::Home => self.select_entry(0),
            KeyCode::End => self.select_entry(MenuEntry::ALL.len() - 1),
            KeyCode::Char(ch @ '1'..='6') => {
                let index = ch as usize - '1' as usize;
                self.select_entry(index);
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Tab => {
                if self.current_entry() != MenuEntry::DisplayStats {
                    self.focus = Focus::Content;
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn request_quit(&mut self, exit: &mut bool) -> Mode {
        if self.catalog.has_unsaved_changes() {
            Mode::ConfirmQuit(ConfirmQuit::new())
        } else {
            *exit = true;
            Mode::Normal
        }
    }

    fn move_menu(&mut self, offset: isize) {
        let len = MenuEntry::ALL.len() as isize;
        let index = (self.menu_index as isize + offset).rem_euclid(len);
        self.select_entry(index as usize);
    }

    /// Switch the content pane to another menu entry. Display entries run
    /// their operation right away, like any other menu choice.
    fn select_entry(&mut self, index: usize) {
        if index == self.menu_index {
            return;
        }
        self.menu_index = index;
        self.clear_status();
        self.screen = match self.current_entry() {
            MenuEntry::AddBook => Screen::AddBook(BookForm::default()),
            MenuEntry::RemoveBook => Screen::RemoveBook(RemoveForm::default()),
            MenuEntry::SearchBooks => Screen::Search(SearchScreen::default()),
            MenuEntry::DisplayAll => match self.run(Action::DisplayAll) {
                Some(Outcome::Listing(books)) => Screen::Library(ListingScreen::new(books)),
                _ => Screen::Library(ListingScreen::new(Vec::new())),
            },
            MenuEntry::DisplayStats => match self.run(Action::DisplayStats) {
                Some(Outcome::Statistics(stats)) => Screen::Statistics(stats),
                _ => Screen::Statistics(self.catalog.stats()),
            },
            MenuEntry::SaveLibrary => Screen::Save,
        };
    }

    fn handle_content_key(&mut self, code: KeyCode) {
        if code == KeyCode::Esc {
            self.focus = Focus::Menu;
            return;
        }

        let screen = mem::replace(&mut self.screen, Screen::Save);
        self.screen = match screen {
            Screen::AddBook(form) => Screen::AddBook(self.handle_add_book(code, form)),
            Screen::RemoveBook(form) => Screen::RemoveBook(self.handle_remove_book(code, form)),
            Screen::Search(state) => Screen::Search(self.handle_search(code, state)),
            Screen::Library(mut listing) => {
                navigate(&mut listing, code);
                Screen::Library(listing)
            }
            Screen::Statistics(stats) => Screen::Statistics(stats),
            Screen::Save => {
                if code == KeyCode::Enter {
                    self.run(Action::Save);
                }
                Screen::Save
            }
        };
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> BookForm {
        match code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left | KeyCode::Right if form.active == BookField::Read => {
                form.toggle_read();
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(book) => {
                    if self.run(Action::AddBook(book)).is_some() {
                        return BookForm::default();
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        form
    }

    fn handle_remove_book(&mut self, code: KeyCode, mut form: RemoveForm) -> RemoveForm {
        match code {
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let action = Action::RemoveBook {
                    title: form.title.clone(),
                };
                if let Some(Outcome::Removed(_)) = self.run(action) {
                    return RemoveForm::default();
                }
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        form
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchScreen) -> SearchScreen {
        match code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                state.form.toggle_field();
            }
            KeyCode::Backspace => state.form.backspace(),
            KeyCode::Enter => {
                let action = Action::Search {
                    field: state.form.field,
                    query: state.form.query.clone(),
                };
                state.results = match self.run(action) {
                    Some(Outcome::Matches(books)) => Some(ListingScreen::new(books)),
                    _ => Some(ListingScreen::new(Vec::new())),
                };
            }
            KeyCode::Char(ch) => {
                state.form.push_char(ch);
            }
            _ => {
                if let Some(results) = state.results.as_mut() {
                    navigate(results, code);
                }
            }
        }
        state
    }

    fn handle_confirm_quit(
        &mut self,
        code: KeyCode,
        mut confirm: ConfirmQuit,
        exit: &mut bool,
    ) -> Mode {
        match code {
            KeyCode::Esc => Mode::Normal,
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
                confirm.previous();
                Mode::ConfirmQuit(confirm)
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                confirm.next();
                Mode::ConfirmQuit(confirm)
            }
            KeyCode::Enter => match confirm.selection {
                QuitChoice::Save => {
                    if self.run(Action::Save).is_some() {
                        *exit = true;
                        Mode::Normal
                    } else {
                        Mode::ConfirmQuit(confirm)
                    }
                }
                QuitChoice::Discard => {
                    *exit = true;
                    Mode::Normal
                }
                QuitChoice::Cancel => Mode::Normal,
            },
            _ => Mode::ConfirmQuit(confirm),
        }
    }

    /// Dispatch an action against the session catalog and report the outcome
    /// in the footer. A failed save is shown rather than propagated.
    fn run(&mut self, action: Action) -> Option<Outcome> {
        match dispatch(&mut self.catalog, &self.store, action) {
            Ok(outcome) => {
                let kind = if outcome.is_failure() {
                    StatusKind::Error
                } else {
                    StatusKind::Info
                };
                self.set_status(outcome.message(), kind);
                Some(outcome)
            }
            Err(err) => {
                error!(error = %err, "operation failed");
                let message = surface_error(&anyhow::Error::new(err));
                self.set_status(message, StatusKind::Error);
                None
            }
        }
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

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        // Terminals too short for both get the content only.
        let (content_area, footer_area) = if area.height > FOOTER_HEIGHT {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(content_area);

        self.draw_menu(frame, columns[0]);
        self.draw_content(frame, columns[1]);

        if let Some(footer_area) = footer_area {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::ConfirmQuit(confirm) = &self.mode {
            self.draw_confirm_quit(frame, area, confirm);
        }
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MenuEntry::ALL
            .iter()
            .enumerate()
            .map(|(idx, entry)| ListItem::new(format!("{} {}", idx + 1, entry.label())))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Select an option")
                    .border_style(self.border_style(Focus::Menu)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.menu_index));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_content(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.current_entry().heading())
            .border_style(self.border_style(Focus::Content));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        match &self.screen {
            Screen::AddBook(form) => self.draw_book_form(frame, inner, form),
            Screen::RemoveBook(form) => self.draw_remove_form(frame, inner, form),
            Screen::Search(state) => self.draw_search(frame, inner, state),
            Screen::Library(listing) => {
                self.render_listing(frame, inner, listing, "No books in the library!")
            }
            Screen::Statistics(stats) => self.draw_statistics(frame, inner, stats),
            Screen::Save => self.draw_save(frame, inner),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let focused = self.focus == Focus::Content;
        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field, focused))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add • Tab to switch • Space toggles Read • Esc to menu",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        if focused && form.active != BookField::Read {
            let row = BookField::ALL
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            let prefix = 8u16;
            frame.set_cursor_position((
                area.x + prefix + form.value_len(form.active) as u16,
                area.y + row,
            ));
        }
    }

    fn draw_remove_form(&self, frame: &mut Frame, area: Rect, form: &RemoveForm) {
        let prompt = "Enter the title of the book to remove: ";
        let lines = vec![
            Line::from(vec![
                Span::raw(prompt),
                Span::styled(form.title.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to remove the first book with this exact title (case ignored)",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);

        if self.focus == Focus::Content {
            frame.set_cursor_position((
                area.x + prompt.len() as u16 + form.title.chars().count() as u16,
                area.y,
            ));
        }
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, state: &SearchScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let mut mode_spans = vec![Span::raw("Search by: ")];
        for field in [SearchField::Title, SearchField::Author] {
            let (marker, style) = if field == state.form.field {
                (
                    "(*)",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("( )", Style::default().fg(Color::DarkGray))
            };
            mode_spans.push(Span::styled(format!("{marker} {}", field.label()), style));
            mode_spans.push(Span::raw("  "));
        }

        let prompt = state.form.prompt();
        let header = vec![
            Line::from(mode_spans),
            Line::from(vec![
                Span::raw(prompt.clone()),
                Span::styled(state.form.query.clone(), Style::default().fg(Color::Yellow)),
            ]),
        ];
        frame.render_widget(Paragraph::new(header), chunks[0]);

        if self.focus == Focus::Content {
            frame.set_cursor_position((
                chunks[0].x + prompt.len() as u16 + state.form.query.chars().count() as u16,
                chunks[0].y + 1,
            ));
        }

        match &state.results {
            Some(results) => {
                self.render_listing(frame, chunks[1], results, "No matching books found!")
            }
            None => frame.render_widget(
                Paragraph::new(Span::styled(
                    "Press Enter to search.",
                    Style::default().fg(Color::Gray),
                )),
                chunks[1],
            ),
        }
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect, stats: &Stats) {
        let lines: Vec<Line> = stats
            .to_string()
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_save(&self, frame: &mut Frame, area: Rect) {
        let state_line = if self.catalog.has_unsaved_changes() {
            Line::from(Span::styled(
                "There are unsaved changes.",
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from(Span::styled(
                "Everything is saved.",
                Style::default().fg(Color::Gray),
            ))
        };
        let lines = vec![
            Line::from(format!("Library file: {}", self.store.path().display())),
            state_line,
            Line::from(""),
            Line::from("Press Enter to save the library to file."),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn render_listing(&self, frame: &mut Frame, area: Rect, listing: &ListingScreen, empty: &str) {
        if listing.is_empty() {
            let message = Paragraph::new(empty.to_string()).alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = listing
            .books
            .iter()
            .enumerate()
            .map(|(idx, book)| ListItem::new(book_line(idx + 1, book)))
            .collect();
        let mut list = List::new(items);
        if self.focus == Focus::Content {
            list = list.highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        }

        let mut state = ListState::default().with_selected(Some(listing.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default().borders(Borders::TOP);
        if self.catalog.has_unsaved_changes() {
            block = block.title(Span::styled(
                " unsaved changes ",
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: Vec<[Span<'static>; 2]> = match (&self.mode, self.focus, &self.screen) {
            (Mode::ConfirmQuit(_), _, _) => vec![
                key_hint("←→", "Choose"),
                key_hint("Enter", "Confirm"),
                key_hint("Esc", "Cancel"),
            ],
            (_, Focus::Menu, _) => vec![
                key_hint("↑↓", "Select"),
                key_hint("1-6", "Jump"),
                key_hint("Enter", "Open"),
                key_hint("Ctrl+S", "Save"),
                key_hint("q", "Quit"),
            ],
            (_, Focus::Content, Screen::AddBook(_)) => vec![
                key_hint("Tab", "Next Field"),
                key_hint("Enter", "Add Book"),
                key_hint("Ctrl+S", "Save"),
                key_hint("Esc", "Menu"),
            ],
            (_, Focus::Content, Screen::RemoveBook(_)) => vec![
                key_hint("Enter", "Remove Book"),
                key_hint("Ctrl+S", "Save"),
                key_hint("Esc", "Menu"),
            ],
            (_, Focus::Content, Screen::Search(_)) => vec![
                key_hint("Tab", "Title/Author"),
                key_hint("Enter", "Search"),
                key_hint("↑↓", "Scroll"),
                key_hint("Esc", "Menu"),
            ],
            (_, Focus::Content, Screen::Library(_)) => vec![
                key_hint("↑↓", "Scroll"),
                key_hint("PgUp/PgDn", "Page"),
                key_hint("Esc", "Menu"),
            ],
            (_, Focus::Content, Screen::Save) => vec![
                key_hint("Enter", "Save Library"),
                key_hint("Esc", "Menu"),
            ],
            (_, Focus::Content, Screen::Statistics(_)) => vec![key_hint("Esc", "Menu")],
        };
        Line::from(hints.into_iter().flatten().collect::<Vec<_>>())
    }

    fn draw_confirm_quit(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmQuit) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Exit Application").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut option_spans = Vec::new();
        for (idx, label) in confirm.labels().iter().enumerate() {
            if idx > 0 {
                option_spans.push(Span::raw("   "));
            }
            let style = if confirm.selected_index() == idx {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            option_spans.push(Span::styled(*label, style));
        }

        let lines = vec![
            Line::from("The library has unsaved changes. Save before quitting?"),
            Line::from(""),
            Line::from(option_spans),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Shared scrolling keys for listings.
fn navigate(listing: &mut ListingScreen, code: KeyCode) {
    match code {
        KeyCode::Up => listing.move_selection(-1),
        KeyCode::Down => listing.move_selection(1),
        KeyCode::PageUp => listing.move_selection(-PAGE_STEP),
        KeyCode::PageDown => listing.move_selection(PAGE_STEP),
        KeyCode::Home => listing.select_first(),
        KeyCode::End => listing.select_last(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn app_with(books: Vec<Book>) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("library.json"));
        (dir, App::new(Catalog::new(books), store))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn status_text(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn add_form_appends_a_book() {
        let (_dir, mut app) = app_with(Vec::new());

        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1965");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Sci-Fi");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.catalog().books(),
            &[Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false)]
        );
        assert_eq!(status_text(&app), "Book added successfully!");
        assert!(matches!(&app.screen, Screen::AddBook(form) if form.title.is_empty()));
    }

    #[test]
    fn typing_q_in_a_form_does_not_quit() {
        let (_dir, mut app) = app_with(Vec::new());

        press(&mut app, KeyCode::Enter);
        let exit = press(&mut app, KeyCode::Char('q'));

        assert!(!exit);
        assert!(matches!(&app.screen, Screen::AddBook(form) if form.title == "q"));
    }

    #[test]
    fn remove_reports_not_found() {
        let (_dir, mut app) = app_with(vec![Book::new("Emma", "Jane Austen", 1815, "", false)]);

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Ulysses");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.catalog().len(), 1);
        assert_eq!(status_text(&app), "Book not found!");

        for _ in 0.."Ulysses".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "EMMA");
        press(&mut app, KeyCode::Enter);
        assert!(app.catalog().is_empty());
        assert_eq!(status_text(&app), "Book removed successfully!");
    }

    #[test]
    fn search_by_author_lists_matches() {
        let (_dir, mut app) = app_with(vec![
            Book::new("The Art of War", "Sun Tzu", 500, "Strategy", true),
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false),
        ]);

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "herb");
        press(&mut app, KeyCode::Enter);

        match &app.screen {
            Screen::Search(state) => {
                let results = state.results.as_ref().unwrap();
                assert_eq!(results.books.len(), 1);
                assert_eq!(results.books[0].title, "Dune");
            }
            _ => panic!("expected search screen"),
        }
    }

    #[test]
    fn statistics_entry_computes_on_open() {
        let (_dir, mut app) = app_with(vec![
            Book::new("A", "", 0, "", true),
            Book::new("B", "", 0, "", false),
            Book::new("C", "", 0, "", false),
            Book::new("D", "", 0, "", false),
        ]);

        press(&mut app, KeyCode::Char('5'));

        match &app.screen {
            Screen::Statistics(stats) => assert_eq!(stats.percentage_read(), 25.0),
            _ => panic!("expected statistics screen"),
        }
    }

    #[test]
    fn quit_without_changes_exits_immediately() {
        let (_dir, mut app) = app_with(Vec::new());
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn quit_with_changes_asks_first() {
        let (dir, mut app) = app_with(Vec::new());
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(matches!(app.mode, Mode::ConfirmQuit(_)));

        // Save & Quit is the default choice.
        assert!(press(&mut app, KeyCode::Enter));
        let saved = Store::new(dir.path().join("library.json")).load().unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[test]
    fn discard_and_quit_leaves_file_untouched() {
        let (dir, mut app) = app_with(Vec::new());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Right);

        assert!(press(&mut app, KeyCode::Enter));
        assert!(!dir.path().join("library.json").exists());
    }

    #[test]
    fn ctrl_s_saves_the_catalog() {
        let (dir, mut app) = app_with(vec![Book::new("Emma", "Jane Austen", 1815, "", false)]);

        app.handle_ctrl_s();

        assert_eq!(status_text(&app), "Library saved to file.");
        assert!(dir.path().join("library.json").exists());
    }

    #[test]
    fn failed_save_keeps_session_and_changes() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("library.json");
        std::fs::create_dir(&path).unwrap();
        let mut app = App::new(Catalog::default(), Store::new(&path));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        app.handle_ctrl_s();
        assert!(app.catalog().has_unsaved_changes());
        assert!(status_text(&app).starts_with("failed to write library file"));
        assert!(matches!(app.status.as_ref().unwrap().kind, StatusKind::Error));

        assert!(!press(&mut app, KeyCode::Char('q')));
        let exit = press(&mut app, KeyCode::Enter);

        assert!(!exit);
        assert!(matches!(app.mode, Mode::ConfirmQuit(_)));
        assert!(app.catalog().has_unsaved_changes());
        assert!(matches!(app.status.as_ref().unwrap().kind, StatusKind::Error));
    }

    #[test]
    fn statistics_screen_shows_both_lines() {
        let (_dir, mut app) = app_with(vec![
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
            Book::new("Emma", "Jane Austen", 1815, "Classic", false),
        ]);
        press(&mut app, KeyCode::Char('5'));

        let screen = render(&app, 100, 20);

        assert!(screen.contains("Total books: 2"));
        assert!(screen.contains("Percentage read: 50.0%"));
    }

    #[test]
    fn short_terminal_drops_the_footer() {
        let (_dir, mut app) = app_with(Vec::new());
        app.notify_load_failure();

        assert!(render(&app, 120, 12).contains("Error loading library data"));
        assert!(!render(&app, 120, FOOTER_HEIGHT).contains("Error loading library data"));
    }

    #[test]
    fn load_failure_is_shown_as_error() {
        let (_dir, mut app) = app_with(Vec::new());
        app.notify_load_failure();
        assert_eq!(status_text(&app), LOAD_FAILURE_MESSAGE);
        assert!(matches!(app.status.as_ref().unwrap().kind, StatusKind::Error));
    }
}
