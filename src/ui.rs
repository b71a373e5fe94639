use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use general_ledger::{display, FormKind, Period, Session};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    GeneralLedger,
    TAccounts,
    Statements,
    TaxForms,
}

impl Page {
    const ALL: [Page; 4] = [Page::GeneralLedger, Page::TAccounts, Page::Statements, Page::TaxForms];

    fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }

    pub fn title(&self) -> &str {
        match self {
            Page::GeneralLedger => "General Ledger",
            Page::TAccounts => "T-Accounts",
            Page::Statements => "Statements",
            Page::TaxForms => "Tax Forms",
        }
    }
}

pub struct App {
    pub session: Session,
    pub current_page: Page,
    pub ledger_state: TableState,
    /// Index into the T-account list
    pub selected_account: usize,
    pub form: FormKind,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut ledger_state = TableState::default();
        if !session.all().is_empty() {
            ledger_state.select(Some(0));
        }

        Self {
            session,
            current_page: Page::GeneralLedger,
            ledger_state,
            selected_account: 0,
            form: FormKind::Form1120,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn row_count(&self) -> usize {
        match self.current_page {
            Page::GeneralLedger => self.session.all().len(),
            Page::TAccounts => self.session.t_accounts().len(),
            _ => 0,
        }
    }

    fn selected(&self) -> Option<usize> {
        match self.current_page {
            Page::GeneralLedger => self.ledger_state.selected(),
            Page::TAccounts => Some(self.selected_account),
            _ => None,
        }
    }

    fn select(&mut self, i: usize) {
        match self.current_page {
            Page::GeneralLedger => self.ledger_state.select(Some(i)),
            Page::TAccounts => self.selected_account = i,
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    pub fn toggle_form(&mut self) {
        self.form = match self.form {
            FormKind::Form1120 => FormKind::Form1065,
            FormKind::Form1065 => FormKind::Form1120,
        };
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('f') if app.current_page == Page::TaxForms => app.toggle_form(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Page tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    let titles: Vec<&str> = Page::ALL.iter().map(|p| p.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" General Ledger "))
        .select(app.current_page.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.current_page {
        Page::GeneralLedger => render_ledger(f, chunks[1], app),
        Page::TAccounts => render_t_accounts(f, chunks[1], app),
        Page::Statements => render_statements(f, chunks[1], app),
        Page::TaxForms => render_text(f, chunks[1], " Tax Forms (f: switch) ", &display::tax_form(&app.session.tax_form(app.form))),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_ledger(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(["Date", "Account", "Debit", "Credit", "Description"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .session
        .all()
        .iter()
        .map(|tx| {
            Row::new(vec![
                Cell::from(tx.date().to_string()),
                Cell::from(tx.account().to_string()),
                Cell::from(format!("{:.2}", tx.debit())),
                Cell::from(format!("{:.2}", tx.credit())),
                Cell::from(tx.description().to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Transactions "))
        .highlight_style(Style::default().bg(Color::DarkGray));

    f.render_stateful_widget(table, area, &mut app.ledger_state);
}

fn render_t_accounts(f: &mut Frame, area: Rect, app: &App) {
    let accounts = app.session.t_accounts();
    let body = match accounts.get_index(app.selected_account) {
        Some((name, account)) => display::t_account_block(name, account),
        None => "No transactions yet".to_string(),
    };
    let title = format!(" T-Account {}/{} (j/k: switch) ", app.selected_account + 1, accounts.len().max(1));
    render_text(f, area, &title, &body);
}

fn render_statements(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let period = Period::default();
    let left = format!(
        "{}\n{}",
        display::income_statement(&app.session.income_statement(period)),
        display::statement_of_equity(&app.session.statement_of_equity(period))
    );
    render_text(f, columns[0], " Income & Equity ", &left);
    render_text(f, columns[1], " Balance Sheet ", &display::balance_sheet(&app.session.balance_sheet()));
}

fn render_text(f: &mut Frame, area: Rect, title: &str, body: &str) {
    let lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let source = app
        .session
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unsaved)".to_string());

    let status = Line::from(vec![
        Span::styled(format!(" {} ", source), Style::default().fg(Color::Cyan)),
        Span::raw(format!("│ {} transactions ", app.session.all().len())),
        Span::styled("│ Tab: page  j/k: move  q: quit", Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(status).block(Block::default().borders(Borders::ALL)), area);
}
