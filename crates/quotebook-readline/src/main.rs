use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use quotebook_application::{spawn_session_reaper, QuoteBot, QuoteStore};
use quotebook_core::ids::{ChannelId, CommunityId, UserId, ViewId};
use quotebook_core::interaction::{InboundEvent, MenuOption, Outbound};
use quotebook_core::pager::{NavButton, RenderedPage};
use quotebook_core::search::{SearchField, SearchQuery};
use quotebook_infrastructure::{ConfigStorage, JsonDirQuoteRepository, QuotebookPaths};

const COMMANDS: &[&str] = &[
    "/community", "/user", "/channel", "/random", "/browse", "/search", "/add", "/remove",
    "/next", "/prev", "/close", "/cancel", "/help",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Who the REPL is pretending to be, and where.
struct Identity {
    community: CommunityId,
    channel: ChannelId,
    user: UserId,
    next_message: u64,
    last_view: Option<ViewId>,
}

impl Identity {
    fn menu(&self, option: MenuOption) -> InboundEvent {
        InboundEvent::MenuSelected {
            community: self.community.clone(),
            channel: self.channel.clone(),
            user: self.user.clone(),
            option,
        }
    }

    fn text(&mut self, text: &str) -> InboundEvent {
        self.next_message += 1;
        InboundEvent::TextMessage {
            message: self.next_message.into(),
            community: self.community.clone(),
            channel: self.channel.clone(),
            user: self.user.clone(),
            text: text.to_string(),
        }
    }

    fn button(&self, button: NavButton) -> Option<InboundEvent> {
        self.last_view.map(|view| InboundEvent::ButtonClicked {
            view,
            user: self.user.clone(),
            button,
        })
    }
}

enum Command {
    Event(InboundEvent),
    Note(String),
}

fn field_names(separator: &str) -> String {
    SearchField::iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

fn parse_query(args: &str) -> std::result::Result<SearchQuery, String> {
    let (field, term) = args.split_once(' ').unwrap_or((args, ""));
    let field = SearchField::from_str(field.trim()).map_err(|_| {
        format!("Unknown field '{}'. Use one of: {}.", field.trim(), field_names(", "))
    })?;
    Ok(SearchQuery::new(field, term.trim()))
}

fn parse_command(identity: &mut Identity, line: &str) -> Command {
    let (command, args) = line.split_once(' ').unwrap_or((line, ""));
    let args = args.trim();
    let menu = |identity: &Identity, option| Command::Event(identity.menu(option));

    match command {
        "/community" if !args.is_empty() => {
            identity.community = args.into();
            Command::Note(format!("Community set to {}", args))
        }
        "/user" if !args.is_empty() => {
            identity.user = args.into();
            Command::Note(format!("Acting as {}", args))
        }
        "/channel" if !args.is_empty() => {
            identity.channel = args.into();
            Command::Note(format!("Channel set to {}", args))
        }
        "/random" => menu(identity, MenuOption::Random),
        "/browse" => menu(identity, MenuOption::BrowseAll),
        "/search" => match parse_query(args) {
            Ok(query) => menu(identity, MenuOption::Search(query)),
            Err(message) => Command::Note(message),
        },
        "/add" => menu(identity, MenuOption::AddQuote),
        "/remove" if args.is_empty() => menu(identity, MenuOption::RemoveFromAll),
        "/remove" => match parse_query(args) {
            Ok(query) => menu(identity, MenuOption::RemoveFromSearch(query)),
            Err(message) => Command::Note(message),
        },
        "/cancel" => menu(identity, MenuOption::Cancel),
        "/next" | "/prev" | "/close" => {
            let button = match command {
                "/next" => NavButton::Next,
                "/prev" => NavButton::Prev,
                _ => NavButton::Close,
            };
            match identity.button(button) {
                Some(event) => Command::Event(event),
                None => Command::Note("No page is open.".to_string()),
            }
        }
        "/help" => Command::Note(help_text()),
        _ if line.starts_with('/') => Command::Note(format!("Unknown command: {}", command)),
        _ => Command::Event(identity.text(line)),
    }
}

fn help_text() -> String {
    let search = format!(
        "/search <field> <term>      page through matches ({})",
        field_names("|")
    );
    [
        "/random                     show a random context",
        "/browse                     page through every context",
        search.as_str(),
        "/add                        add a context",
        "/remove [<field> <term>]    delete a context",
        "/next /prev /close          navigate the last page",
        "/cancel                     end your active session",
        "/community /user /channel   change who and where you are",
        "anything else               answer the current prompt",
    ]
    .join("\n")
}

/// Footer under a page, listing only the buttons that would move.
fn page_footer(page: &RenderedPage) -> String {
    let control = &page.control;
    let mut footer = format!("Page {}/{}", control.page, control.max_page);
    if control.has_prev() {
        footer.push_str("  /prev");
    }
    if control.has_next() {
        footer.push_str("  /next");
    }
    footer.push_str("  /close");
    footer
}

fn print_page(page: &RenderedPage) {
    println!("{}", page.title.bright_magenta().bold());
    for field in &page.fields {
        println!("{}", field.label.bright_yellow());
        for line in field.body.lines() {
            println!("  {}", line.bright_blue());
        }
    }
    println!("{}", page_footer(page).bright_black());
}

fn print_outbound(outbound: &Outbound) {
    match outbound {
        Outbound::SendText { channel, text } => {
            println!("{}", format!("[#{}]", channel).bright_black());
            for line in text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        Outbound::SendPage { channel, page } => {
            println!("{}", format!("[#{}]", channel).bright_black());
            print_page(page);
        }
        Outbound::EditPage { page, .. } => print_page(page),
        Outbound::DeletePage { .. } => println!("{}", "(page closed)".bright_black()),
    }
}

/// Interactive host for the quote bot: menu options become slash commands,
/// plain lines are chat messages, page buttons act on the last page shown.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => QuotebookPaths::default_config_file()?,
    };
    let config = ConfigStorage::new(config_path.clone())
        .load()
        .with_context(|| format!("loading {}", config_path.display()))?;
    let paths = QuotebookPaths::from_config(&config.storage)?;
    tracing::info!(dir = %paths.quotes_dir().display(), "Using quote storage");

    let repository = JsonDirQuoteRepository::new(paths).await?;
    let store = Arc::new(QuoteStore::new(Arc::new(repository)));
    let bot = Arc::new(QuoteBot::new(store, &config));

    // Outbound messages from both the REPL and the reaper are printed here.
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
    let printer = tokio::spawn(async move {
        while let Some(outbound) = outbound_rx.recv().await {
            print_outbound(&outbound);
        }
    });

    let shutdown = CancellationToken::new();
    let reaper = spawn_session_reaper(
        bot.clone(),
        config.session.reaper_interval(),
        outbound_tx.clone(),
        shutdown.clone(),
    );

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Quotebook REPL ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands, or 'quit' to exit.".bright_black());
    println!();

    let mut identity = Identity {
        community: "local".into(),
        channel: "general".into(),
        user: "me".into(),
        next_message: 0,
        last_view: None,
    };

    // ===== Main REPL Loop =====
    loop {
        let prompt = format!("{}@{}#{}> ", identity.user, identity.community, identity.channel);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let event = match parse_command(&mut identity, trimmed) {
                    Command::Event(event) => event,
                    Command::Note(note) => {
                        println!("{}", note.yellow());
                        continue;
                    }
                };

                for outbound in bot.handle(event).await {
                    match &outbound {
                        Outbound::SendPage { page, .. } => identity.last_view = Some(page.control.view),
                        Outbound::DeletePage { view } if identity.last_view == Some(*view) => {
                            identity.last_view = None
                        }
                        _ => {}
                    }
                    if outbound_tx.send(outbound).is_err() {
                        eprintln!("{}", "Output channel closed".red());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    shutdown.cancel();
    if let Err(e) = reaper.await {
        tracing::warn!("Session reaper task failed: {}", e);
    }
    drop(outbound_tx);
    if let Err(e) = printer.await {
        tracing::warn!("Output printer task failed: {}", e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_core::pager::PageControl;

    fn page(page: usize, max_page: usize) -> RenderedPage {
        RenderedPage {
            title: "t".to_string(),
            fields: Vec::new(),
            control: PageControl {
                view: ViewId::new(),
                page,
                max_page,
                indexed: false,
            },
        }
    }

    #[test]
    fn test_page_footer_lists_only_moving_buttons() {
        assert_eq!(page_footer(&page(1, 1)), "Page 1/1  /close");
        assert_eq!(page_footer(&page(1, 3)), "Page 1/3  /next  /close");
        assert_eq!(page_footer(&page(2, 3)), "Page 2/3  /prev  /next  /close");
        assert_eq!(page_footer(&page(3, 3)), "Page 3/3  /prev  /close");
    }

    #[test]
    fn test_parse_query_lists_every_field_on_error() {
        let err = parse_query("colour red").unwrap_err();
        assert_eq!(err, "Unknown field 'colour'. Use one of: content, speaker, author, year.");

        let query = parse_query("Author  dave ").unwrap();
        assert_eq!(query, SearchQuery::new(SearchField::Author, "dave"));
    }

    #[test]
    fn test_help_names_search_fields() {
        assert!(help_text().contains("(content|speaker|author|year)"));
    }
}
