//! Interactive browse session.
//!
//! # Design
//! The session is the navigation coordinator: it keeps a stack of screens,
//! each owning one controller and the event receiver returned with it.
//! `ShowDetail` from an overview pushes a detail screen; `SearchFor` from a
//! detail pushes a new overview for that value; `back` pops.
//!
//! After every command the session settles: it applies events until the
//! top screen reports that it is no longer loading. The controller's
//! `snapshot()` acts as the barrier, so events emitted in response to the
//! command are never missed.

use std::io::{self, Write};
use std::sync::Arc;

use gallery_core::{
    DetailController, DetailEvent, DetailRow, ErrorAlert, Gallery, OverviewController,
    OverviewEvent,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::commands::Services;
use crate::render;

pub const HELP: &str = "\
commands:
  more           load the next page
  open <n>       show item n
  find [text]    search for text (no text: whole collection)
  follow <n>     search for the value of row n (rows marked *)
  back           return to the previous screen
  retry          retry the last failed load
  show           print the current screen again
  help           print this help
  quit           leave
";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    More,
    Open(usize),
    Find(Option<String>),
    Follow(usize),
    Back,
    Retry,
    Show,
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let position = |command: &str| {
        rest.parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("usage: {command} <n>, n counting from 1"))
    };

    let input = match word {
        "" => return Ok(None),
        "more" | "m" => Input::More,
        "open" | "o" => Input::Open(position("open")?),
        "find" | "f" => Input::Find((!rest.is_empty()).then(|| rest.to_string())),
        "follow" => Input::Follow(position("follow")?),
        "back" | "b" => Input::Back,
        "retry" | "r" => Input::Retry,
        "show" | "ls" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(format!("unknown command `{other}`, try `help`")),
    };
    Ok(Some(input))
}

struct OverviewScreen {
    controller: OverviewController,
    events: UnboundedReceiver<OverviewEvent>,
    gallery: Gallery,
}

struct DetailScreen {
    id: String,
    controller: DetailController,
    events: UnboundedReceiver<DetailEvent>,
    rows: Vec<DetailRow>,
}

enum Screen {
    Overview(OverviewScreen),
    Detail(DetailScreen),
}

/// What applying one controller event asks of the session.
enum Effect {
    Nothing,
    Alert(Option<ErrorAlert>),
    ShowDetail(String),
    SearchFor(String),
}

impl OverviewScreen {
    fn apply(&mut self, event: OverviewEvent) -> Effect {
        match event {
            OverviewEvent::ItemBatch { mode, items } => {
                self.gallery.apply(mode, items);
                Effect::Nothing
            }
            OverviewEvent::ErrorAlert(alert) => Effect::Alert(alert),
            OverviewEvent::LoadingChanged(_) => Effect::Nothing,
            OverviewEvent::ShowDetail { id } => Effect::ShowDetail(id),
        }
    }
}

impl DetailScreen {
    fn apply(&mut self, event: DetailEvent) -> Effect {
        match event {
            DetailEvent::Rows(rows) => {
                self.rows = rows;
                Effect::Nothing
            }
            DetailEvent::ErrorAlert(alert) => Effect::Alert(alert),
            DetailEvent::LoadingChanged(_) => Effect::Nothing,
            DetailEvent::SearchFor { query } => Effect::SearchFor(query),
        }
    }
}

impl Screen {
    fn try_next(&mut self) -> Option<Effect> {
        match self {
            Screen::Overview(s) => s.events.try_recv().ok().map(|e| s.apply(e)),
            Screen::Detail(s) => s.events.try_recv().ok().map(|e| s.apply(e)),
        }
    }

    async fn next(&mut self) -> Option<Effect> {
        match self {
            Screen::Overview(s) => s.events.recv().await.map(|e| s.apply(e)),
            Screen::Detail(s) => s.events.recv().await.map(|e| s.apply(e)),
        }
    }

    async fn is_loading(&self) -> bool {
        match self {
            Screen::Overview(s) => s.controller.snapshot().await.is_some_and(|snap| snap.is_loading),
            Screen::Detail(s) => s.controller.snapshot().await.is_some_and(|snap| snap.is_loading),
        }
    }

    fn render(&self) -> String {
        match self {
            Screen::Overview(s) => render::overview(s.controller.title(), &s.gallery),
            Screen::Detail(s) => render::detail(&s.id, &s.rows),
        }
    }
}

pub struct Session<W> {
    services: Services,
    screens: Vec<Screen>,
    alert: Option<ErrorAlert>,
    out: W,
}

impl<W: Write> Session<W> {
    /// Open a session on the overview for `query`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(services: Services, query: Option<String>, out: W) -> Self {
        let mut session = Self {
            services,
            screens: Vec::new(),
            alert: None,
            out,
        };
        session.push_overview(query);
        session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands from `input` until `quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> anyhow::Result<()> {
        self.settle().await?;
        self.render()?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            match parse(&line) {
                Ok(None) => {}
                Ok(Some(Input::Quit)) => break,
                Ok(Some(input)) => {
                    if self.execute(input).await? {
                        self.settle().await?;
                        self.render()?;
                    }
                }
                Err(message) => writeln!(self.out, "{message}")?,
            }
        }
        Ok(())
    }

    /// Carry out one command; returns whether the screen should be redrawn.
    async fn execute(&mut self, input: Input) -> io::Result<bool> {
        debug!(?input, depth = self.screens.len(), "executing");
        match input {
            Input::Back => {
                if self.screens.len() <= 1 {
                    writeln!(self.out, "Already at the first screen.")?;
                    return Ok(false);
                }
                self.screens.pop();
                self.alert = None;
                return Ok(true);
            }
            Input::Retry => {
                let Some(alert) = self.alert.take() else {
                    writeln!(self.out, "Nothing to retry.")?;
                    return Ok(false);
                };
                alert.retry();
                return Ok(true);
            }
            Input::Show => return Ok(true),
            Input::Help => {
                self.out.write_all(HELP.as_bytes())?;
                return Ok(false);
            }
            Input::Quit => return Ok(false),
            Input::More | Input::Open(_) | Input::Find(_) | Input::Follow(_) => {}
        }

        let Some(screen) = self.screens.last_mut() else {
            return Ok(false);
        };
        match (input, screen) {
            (Input::More, Screen::Overview(s)) => {
                if s.controller.snapshot().await.is_some_and(|snap| snap.next_page.is_none()) {
                    writeln!(self.out, "No more results.")?;
                    return Ok(false);
                }
                s.controller.on_reached_last_visible_item();
            }
            (Input::Open(n), Screen::Overview(s)) => match s.gallery.get(n - 1) {
                Some(item) => s.controller.on_item_selected(item),
                None => {
                    writeln!(self.out, "No item {n}.")?;
                    return Ok(false);
                }
            },
            (Input::Find(query), Screen::Overview(s)) => s.controller.on_query_changed(query),
            (Input::Follow(n), Screen::Detail(s)) => match s.rows.get(n - 1) {
                Some(row) if row.allows_search => s.controller.on_row_activated(row),
                Some(row) => {
                    writeln!(self.out, "{} is not searchable.", row.label)?;
                    return Ok(false);
                }
                None => {
                    writeln!(self.out, "No row {n}.")?;
                    return Ok(false);
                }
            },
            (Input::Follow(_), Screen::Overview(_)) => {
                writeln!(self.out, "Only available on an object; `open <n>` shows one.")?;
                return Ok(false);
            }
            (_, Screen::Detail(_)) => {
                writeln!(self.out, "Only available in a listing; `back` returns to it.")?;
                return Ok(false);
            }
            (_, Screen::Overview(_)) => return Ok(false),
        }
        Ok(true)
    }

    /// Apply events until the top screen has finished loading.
    async fn settle(&mut self) -> io::Result<()> {
        loop {
            self.drain()?;
            let depth = self.screens.len();
            let Some(screen) = self.screens.last() else {
                return Ok(());
            };
            let loading = screen.is_loading().await;
            self.drain()?;
            if self.screens.len() != depth {
                continue;
            }
            if !loading {
                return Ok(());
            }

            let Some(screen) = self.screens.last_mut() else {
                return Ok(());
            };
            match screen.next().await {
                Some(effect) => self.apply(effect)?,
                None => return Ok(()),
            }
        }
    }

    /// Apply every event already queued for the top screen.
    fn drain(&mut self) -> io::Result<()> {
        while let Some(effect) = self.screens.last_mut().and_then(Screen::try_next) {
            self.apply(effect)?;
        }
        Ok(())
    }

    fn apply(&mut self, effect: Effect) -> io::Result<()> {
        match effect {
            Effect::Nothing => {}
            Effect::Alert(Some(alert)) => {
                self.out.write_all(render::alert(&alert).as_bytes())?;
                writeln!(self.out, "(`retry` to try again)")?;
                self.alert = Some(alert);
            }
            Effect::Alert(None) => self.alert = None,
            Effect::ShowDetail(id) => self.push_detail(id),
            Effect::SearchFor(query) => self.push_overview(Some(query)),
        }
        Ok(())
    }

    fn push_overview(&mut self, query: Option<String>) {
        debug!(?query, "opening overview");
        let (controller, events) =
            OverviewController::spawn(Arc::clone(&self.services.collection), query);
        self.screens.push(Screen::Overview(OverviewScreen {
            controller,
            events,
            gallery: Gallery::new(),
        }));
    }

    fn push_detail(&mut self, id: String) {
        debug!(%id, "opening detail");
        let (controller, events) = DetailController::spawn(Arc::clone(&self.services.detail), id.clone());
        self.screens.push(Screen::Detail(DetailScreen {
            id,
            controller,
            events,
            rows: Vec::new(),
        }));
    }

    fn render(&mut self) -> io::Result<()> {
        if let Some(screen) = self.screens.last() {
            self.out.write_all(screen.render().as_bytes())?;
        }
        Ok(())
    }
}
