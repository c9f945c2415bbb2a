use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, List, ListState, Paragraph, Table};
use ratatui::Terminal;

use tui_trace_tree::{view, Preferences, ProfilingSession};

const FALLBACK_TRACE: &str = r#"<cocoon-profiling>
  <node name="Sitemap" executionTime="12.5">
    <invocations>
      <invocation name="FileGenerator" executionTime="5">
        <arguments><java.lang.String name="src">index.xml</java.lang.String></arguments>
        <properties><java.lang.Boolean name="cached">false</java.lang.Boolean></properties>
        <result><java.lang.Integer name="size">2048</java.lang.Integer></result>
        <profiler>org.apache.cocoon.profiling.profiler.GeneratorProfiler</profiler>
      </invocation>
      <invocation name="XSLTTransformer" executionTime="4">
        <arguments><java.lang.String name="stylesheet">page.xsl</java.lang.String></arguments>
        <profiler>org.apache.cocoon.profiling.profiler.TransformerProfiler</profiler>
      </invocation>
    </invocations>
    <match pattern="**" matched="true"/>
  </node>
</cocoon-profiling>"#;

struct App {
    session: ProfilingSession,
    list: ListState,
    message: Option<String>,
}

impl App {
    fn new(markup: &str) -> Self {
        let mut session = ProfilingSession::new(Preferences {
            open_invocations: true,
            ..Preferences::default()
        });
        let message = session.load_document(markup).err().map(|err| err.to_string());
        let mut app = Self {
            session,
            list: ListState::default(),
            message,
        };
        app.select(0);
        app
    }

    fn rows(&self) -> usize {
        self.session.tree().map_or(0, |tree| tree.visible_len())
    }

    fn select(&mut self, index: usize) {
        let index = index.min(self.rows().saturating_sub(1));
        self.session.select_visible_index(index);
        self.list.select(self.session.selected().map(|_| index));
    }

    fn move_by(&mut self, up: bool) {
        let current = self.list.selected().unwrap_or_default();
        let next = if up {
            current.saturating_sub(1)
        } else {
            current.saturating_add(1)
        };
        self.select(next);
    }
}

fn main() -> std::io::Result<()> {
    let markup = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => FALLBACK_TRACE.to_owned(),
    };

    // Terminal initialization
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // App
    let app = App::new(&markup);
    let res = run_app(&mut terminal, app);

    // restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let symbols = view::Symbols::default();
    loop {
        terminal.draw(|frame| {
            let areas = Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(frame.size());
            let (tree_area, details_area) = (areas[0], areas[1]);

            if let Some(message) = &app.message {
                let paragraph = Paragraph::new(message.as_str())
                    .style(Style::new().fg(Color::Red))
                    .block(Block::bordered().title("Profiling"));
                frame.render_widget(paragraph, tree_area);
                return;
            }

            let lines = app
                .session
                .tree()
                .map(|tree| view::tree_lines(tree, &symbols))
                .unwrap_or_default();
            let list = List::new(lines)
                .block(
                    Block::bordered()
                        .title("Name / Execution Time")
                        .title_bottom(format!(
                            "{}: {}",
                            tui_trace_tree::Preference::OpenInvocations.menu_label(),
                            app.session.preferences().open_invocations
                        )),
                )
                .highlight_style(
                    Style::new()
                        .fg(Color::Black)
                        .bg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(">> ");
            frame.render_stateful_widget(list, tree_area, &mut app.list);

            let details = app.session.details();
            let table = Table::new(
                details.iter().map(view::detail_row),
                [
                    Constraint::Length(view::key_column_width(details)),
                    Constraint::Fill(1),
                ],
            )
            .block(Block::bordered().title("Class / Value"));
            frame.render_widget(table, details_area);
        })?;

        match crossterm::event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('\n' | ' ') | KeyCode::Enter => {
                    app.session.toggle_selected();
                }
                KeyCode::Char('i') => {
                    let open = !app.session.preferences().open_invocations;
                    app.session.set_open_invocations(open);
                    let current = app.list.selected().unwrap_or_default();
                    app.select(current);
                }
                KeyCode::Down => app.move_by(false),
                KeyCode::Up => app.move_by(true),
                KeyCode::Home => app.select(0),
                KeyCode::End => app.select(usize::MAX),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.move_by(false),
                MouseEventKind::ScrollUp => app.move_by(true),
                _ => {}
            },
            _ => {}
        }
    }
}
