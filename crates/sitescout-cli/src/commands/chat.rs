use crate::bootstrap::AppContext;
use crate::commands::analyze;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use sitescout_application::ChatSession;
use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

const REPL_COMMANDS: [&str; 2] = ["/exit", "/report"];

async fn open_session(ctx: &AppContext, domain: &str) -> Result<ChatSession> {
    let service = ctx.analysis_service().await?;
    let entry = analyze::obtain(&service, domain, false, true).await?;
    Ok(ChatSession::new(
        entry.domain,
        Arc::new(entry.data),
        service.generator(),
        service.config().chat_model.clone(),
    ))
}

pub async fn ask(ctx: &AppContext, domain: &str, question: &str) -> Result<()> {
    let mut session = open_session(ctx, domain).await?;
    let exchange = session.ask(question).await?;
    render::answer(&exchange.response);
    Ok(())
}

/// Slash-command completion and highlighting for the chat prompt.
struct ReplHelper;

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = REPL_COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ReplHelper {
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

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        REPL_COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ReplHelper {}

pub async fn repl(ctx: &AppContext, domain: &str) -> Result<()> {
    let mut session = open_session(ctx, domain).await?;

    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    println!(
        "{} {}",
        "=== SiteScout chat ===".bright_magenta().bold(),
        session.domain().bright_cyan()
    );
    println!(
        "{}",
        "Ask about the site, '/report' to reprint the report, '/exit' to quit.".bright_black()
    );
    println!();

    loop {
        match rl.readline("?> ") {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "" => continue,
                    "/exit" => break,
                    "/report" => {
                        render::report(session.analysis());
                        continue;
                    }
                    _ => {}
                }

                let _ = rl.add_history_entry(trimmed);
                match session.ask(trimmed).await {
                    Ok(exchange) => render::answer(&exchange.response),
                    Err(err) => eprintln!("{}", err.to_string().red()),
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/exit' to quit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    println!(
        "{}",
        format!("{} follow-up turns. Goodbye!", session.log().len()).bright_green()
    );
    Ok(())
}
