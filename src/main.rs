// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Marginalia CLI entrypoint.
//!
//! Stores analysed drafts in a history file and lets you review them one decision at a time:
//! anchor a completion reply onto a text, then accept, dismiss, or insert suggestions.

use std::error::Error;
use std::fmt::Write as _;
use std::io::{self, IsTerminal, Read};

use marginalia::analysis::{analysis_response_schema, parse_analysis, AnalysisRequest};
use marginalia::model::{KeywordId, Session, SessionId, SpanId};
use marginalia::ops::{apply_op, Op, Outcome};
use marginalia::query::{category_counts, display_order, overlapping_pairs, word_count};
use marginalia::render::{paint_ansi, preview_line, segments, AnsiOptions};
use marginalia::store::history::new_session_id;
use marginalia::store::{
    now_ms, session_title, EnvSecret, FileSecretStore, HistoryFile, SecretStore, WriteDurability,
};
use marginalia::ui::{score_text, GOOD_SCORE};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_HISTORY_FILE: &str = "marginalia-history.json";
const DEFAULT_KEY_FILE: &str = ".marginalia-key";
const HISTORY_ENV: &str = "MARGINALIA_HISTORY";
const LOG_ENV: &str = "MARGINALIA_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [options] analyze <text-file> <response-json> [--session <id>]\n  {program} [options] show <session-id>\n  {program} [options] list\n  {program} [options] accept <session-id> <span-id>\n  {program} [options] dismiss <session-id> <span-id>\n  {program} [options] insert <session-id> <keyword-id> <index>\n  {program} [options] drop-keyword <session-id> <keyword-id>\n  {program} [options] prompt <text-file>\n  {program} [options] schema\n  {program} [options] set-key <value>\n\nOptions:\n  --history <file>   history file (default ${HISTORY_ENV} or {DEFAULT_HISTORY_FILE})\n  --key-file <file>  api key file (default {DEFAULT_KEY_FILE}; ${} takes precedence)\n  --durable-writes   fsync history and key writes where supported\n  --color, --no-color\n\nUse `-` as a file name to read stdin. Logs go to stderr, filtered by ${LOG_ENV} (default `warn`).",
        marginalia::store::API_KEY_ENV
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Analyze {
        text_file: String,
        response_file: String,
    },
    Show {
        session_id: String,
    },
    List,
    Apply {
        session_id: String,
        op: RawOp,
    },
    Prompt {
        text_file: String,
    },
    Schema,
    SetKey {
        value: String,
    },
}

/// An op whose ids are still unvalidated CLI strings.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawOp {
    Accept { span_id: String },
    Dismiss { span_id: String },
    Insert { keyword_id: String, index: usize },
    DropKeyword { keyword_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    history: Option<String>,
    key_file: Option<String>,
    session_id: Option<String>,
    durable_writes: bool,
    color: Option<bool>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut history = None;
    let mut key_file = None;
    let mut session_id = None;
    let mut durable_writes = false;
    let mut color = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--history" => {
                if history.is_some() {
                    return Err(());
                }
                history = Some(args.next().ok_or(())?);
            }
            "--key-file" => {
                if key_file.is_some() {
                    return Err(());
                }
                key_file = Some(args.next().ok_or(())?);
            }
            "--session" => {
                if session_id.is_some() {
                    return Err(());
                }
                session_id = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if durable_writes {
                    return Err(());
                }
                durable_writes = true;
            }
            "--color" | "--no-color" => {
                if color.is_some() {
                    return Err(());
                }
                color = Some(arg == "--color");
            }
            "-" => positional.push(arg),
            _ if arg.starts_with('-') => return Err(()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().ok_or(())?;
    let mut next = || positional.next().ok_or(());

    let command = match name.as_str() {
        "analyze" => Command::Analyze {
            text_file: next()?,
            response_file: next()?,
        },
        "show" => Command::Show {
            session_id: next()?,
        },
        "list" => Command::List,
        "accept" => Command::Apply {
            session_id: next()?,
            op: RawOp::Accept { span_id: next()? },
        },
        "dismiss" => Command::Apply {
            session_id: next()?,
            op: RawOp::Dismiss { span_id: next()? },
        },
        "insert" => Command::Apply {
            session_id: next()?,
            op: RawOp::Insert {
                keyword_id: next()?,
                index: next()?.parse().map_err(|_| ())?,
            },
        },
        "drop-keyword" => Command::Apply {
            session_id: next()?,
            op: RawOp::DropKeyword {
                keyword_id: next()?,
            },
        },
        "prompt" => Command::Prompt {
            text_file: next()?,
        },
        "schema" => Command::Schema,
        "set-key" => Command::SetKey { value: next()? },
        _ => return Err(()),
    };

    if positional.next().is_some() {
        return Err(());
    }
    if session_id.is_some() && !matches!(command, Command::Analyze { .. }) {
        return Err(());
    }

    Ok(CliOptions {
        command,
        history,
        key_file,
        session_id,
        durable_writes,
        color,
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init();
}

fn read_input(path: &str) -> Result<String, Box<dyn Error>> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|err| format!("cannot read {path}: {err}").into())
}

struct App {
    history: HistoryFile,
    key_file: FileSecretStore,
    color: bool,
}

impl App {
    fn from_options(options: &CliOptions) -> Self {
        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        let history_path = options
            .history
            .clone()
            .or_else(|| std::env::var(HISTORY_ENV).ok().filter(|path| !path.is_empty()))
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_owned());
        let key_path = options
            .key_file
            .clone()
            .unwrap_or_else(|| DEFAULT_KEY_FILE.to_owned());

        Self {
            history: HistoryFile::new(history_path).with_durability(durability),
            key_file: FileSecretStore::new(key_path).with_durability(durability),
            color: options
                .color
                .unwrap_or_else(|| io::stdout().is_terminal()),
        }
    }

    fn analyze(
        &self,
        text_file: &str,
        response_file: &str,
        session_id: Option<&str>,
    ) -> Result<String, Box<dyn Error>> {
        let text = read_input(text_file)?;
        if text.trim().is_empty() {
            return Err(format!("{text_file} is empty; nothing to analyze").into());
        }
        let response = read_input(response_file)?;
        let analysis = parse_analysis(&response, &text)?;

        let now = now_ms();
        let session_id = match session_id {
            Some(raw) => SessionId::new(raw)?,
            None => new_session_id(now),
        };
        let dropped = analysis.dropped_suggestions();
        let session = Session::new(session_id.clone(), session_title(&text), analysis.document)
            .with_score(analysis.score)
            .with_updated_at_ms(now);

        let mut history = self.history.load()?;
        history.upsert(session);
        self.history.save(&history)?;
        info!(%session_id, "stored analysis");

        let mut out = String::new();
        if let Some(session) = history.get(&session_id) {
            out.push_str(&self.describe(session));
        }
        if dropped > 0 {
            let _ = writeln!(out, "{dropped} suggestion(s) could not be anchored and were dropped");
        }
        Ok(out)
    }

    fn show(&self, session_id: &str) -> Result<String, Box<dyn Error>> {
        let history = self.history.load()?;
        let session_id = SessionId::new(session_id)?;
        let session = history
            .get(&session_id)
            .ok_or_else(|| format!("no session {session_id} in {:?}", self.history.path()))?;
        Ok(self.describe(session))
    }

    fn describe(&self, session: &Session) -> String {
        let document = session.document();
        let mut out = String::new();

        let _ = writeln!(out, "{} ({})", session.title(), session.session_id());
        let score = score_text(session.score());
        let counts = category_counts(document);
        let _ = writeln!(
            out,
            "{score} · {} words · {} issues",
            word_count(&document.text),
            counts.total()
        );
        out.push('\n');

        if document.text.trim().is_empty() {
            out.push_str("(empty document)\n");
        } else {
            let painted = segments(&document.text, &document.spans, None);
            let options = AnsiOptions {
                color: self.color,
                active: None,
            };
            out.push_str(&paint_ansi(&painted, &options));
            out.push('\n');
        }
        out.push('\n');

        for span in display_order(&document.spans) {
            let _ = write!(
                out,
                "  {:<8} {:<12} {:?} -> {:?}",
                span.id.as_str(),
                span.category.label(),
                span.original,
                span.replacement
            );
            if let Some(title) = &span.title {
                let _ = write!(out, "  {}", preview_line(title, 48));
            }
            out.push('\n');
        }
        for keyword in &document.keywords {
            let _ = writeln!(
                out,
                "  {:<8} {:<12} + {:?}  {}",
                keyword.id.as_str(),
                "Keyword",
                keyword.keyword.as_str(),
                preview_line(&keyword.description, 48)
            );
        }

        for (left, right) in overlapping_pairs(&document.spans) {
            let _ = writeln!(out, "  note: {left} overlaps {right}");
        }
        for stale in document.invariant_violations() {
            let _ = writeln!(out, "  note: {stale} no longer matches the text at its offsets");
        }
        out
    }

    fn list(&self) -> Result<String, Box<dyn Error>> {
        let history = self.history.load()?;
        if history.is_empty() {
            return Ok("no sessions yet\n".to_owned());
        }

        let mut out = String::new();
        for session in history.sessions() {
            let score = match session.score() {
                Some(score) if score >= GOOD_SCORE => format!("{score:>3}+"),
                Some(score) => format!("{score:>3} "),
                None => "  - ".to_owned(),
            };
            let _ = writeln!(
                out,
                "{:<24} {score} {:>3} pending  {}",
                session.session_id().as_str(),
                session.document().pending_count(),
                session.title()
            );
        }
        Ok(out)
    }

    fn apply(&self, session_id: &str, raw: &RawOp) -> Result<String, Box<dyn Error>> {
        let session_id = SessionId::new(session_id)?;
        let op = match raw {
            RawOp::Accept { span_id } => Op::AcceptEdit {
                span_id: SpanId::new(span_id.as_str())?,
            },
            RawOp::Dismiss { span_id } => Op::DismissEdit {
                span_id: SpanId::new(span_id.as_str())?,
            },
            RawOp::Insert { keyword_id, index } => Op::InsertKeyword {
                keyword_id: KeywordId::new(keyword_id.as_str())?,
                insertion_index: *index,
            },
            RawOp::DropKeyword { keyword_id } => Op::DismissKeyword {
                keyword_id: KeywordId::new(keyword_id.as_str())?,
            },
        };

        let mut history = self.history.load()?;
        let session = history
            .get(&session_id)
            .ok_or_else(|| format!("no session {session_id} in {:?}", self.history.path()))?;

        let mutation = apply_op(session.document(), &op);
        let edit = match mutation.outcome {
            Outcome::Noop(reason) => return Ok(format!("nothing to do: {reason}\n")),
            Outcome::Applied(edit) => edit,
        };

        history.replace_document(&session_id, mutation.document, now_ms());
        self.history.save(&history)?;

        let mut out = String::new();
        if let Some(span_id) = &edit.removed_span {
            let _ = write!(out, "removed {span_id}");
        }
        if let Some(keyword_id) = &edit.consumed_keyword {
            let _ = write!(out, "consumed {keyword_id}");
        }
        let _ = writeln!(
            out,
            " (text {:+} chars, {} span(s) shifted)",
            edit.text_delta,
            edit.shifted.len()
        );
        if let Some(session) = history.get(&session_id) {
            out.push('\n');
            out.push_str(&self.describe(session));
        }
        Ok(out)
    }

    fn prompt(&self, text_file: &str) -> Result<String, Box<dyn Error>> {
        let text = read_input(text_file)?;
        if self.api_key()?.is_none() {
            eprintln!(
                "marginalia: no api key configured (set ${} or run `set-key`)",
                marginalia::store::API_KEY_ENV
            );
        }
        let mut json = serde_json::to_string_pretty(&AnalysisRequest::new(&text))?;
        json.push('\n');
        Ok(json)
    }

    /// Environment first, then the key file.
    fn api_key(&self) -> Result<Option<String>, Box<dyn Error>> {
        if let Some(key) = EnvSecret::default().load()? {
            return Ok(Some(key));
        }
        Ok(self.key_file.load()?)
    }

    fn set_key(&self, value: &str) -> Result<String, Box<dyn Error>> {
        let value = if value == "-" {
            read_input(value)?
        } else {
            value.to_owned()
        };
        self.key_file.save(&value)?;
        Ok(format!("saved api key to {:?}\n", self.key_file.path()))
    }
}

fn run(options: &CliOptions) -> Result<String, Box<dyn Error>> {
    let app = App::from_options(options);
    match &options.command {
        Command::Analyze {
            text_file,
            response_file,
        } => app.analyze(text_file, response_file, options.session_id.as_deref()),
        Command::Show { session_id } => app.show(session_id),
        Command::List => app.list(),
        Command::Apply { session_id, op } => app.apply(session_id, op),
        Command::Prompt { text_file } => app.prompt(text_file),
        Command::Schema => {
            let mut json = serde_json::to_string_pretty(&analysis_response_schema())?;
            json.push('\n');
            Ok(json)
        }
        Command::SetKey { value } => app.set_key(value),
    }
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "marginalia".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    init_logging();

    match run(&options) {
        Ok(out) => print!("{out}"),
        Err(err) => {
            eprintln!("marginalia: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions, Command, RawOp};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn rejects_empty_args() {
        parse(&[]).unwrap_err();
    }

    #[test]
    fn parses_analyze_with_session() {
        let options = parse(&["analyze", "draft.txt", "-", "--session", "s-1"]).expect("parse");
        assert_eq!(
            options.command,
            Command::Analyze {
                text_file: "draft.txt".to_owned(),
                response_file: "-".to_owned(),
            }
        );
        assert_eq!(options.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn parses_global_flags_anywhere() {
        let options = parse(&[
            "--history",
            "h.json",
            "list",
            "--durable-writes",
            "--no-color",
            "--key-file",
            "k",
        ])
        .expect("parse");
        assert_eq!(options.command, Command::List);
        assert_eq!(options.history.as_deref(), Some("h.json"));
        assert_eq!(options.key_file.as_deref(), Some("k"));
        assert!(options.durable_writes);
        assert_eq!(options.color, Some(false));
    }

    #[test]
    fn parses_mutation_commands() {
        let options = parse(&["insert", "s", "kw-0", "12"]).expect("parse");
        assert_eq!(
            options.command,
            Command::Apply {
                session_id: "s".to_owned(),
                op: RawOp::Insert {
                    keyword_id: "kw-0".to_owned(),
                    index: 12,
                },
            }
        );

        let options = parse(&["accept", "s", "s-0"]).expect("parse");
        assert!(matches!(
            options.command,
            Command::Apply {
                op: RawOp::Accept { .. },
                ..
            }
        ));
        let options = parse(&["drop-keyword", "s", "kw-0"]).expect("parse");
        assert!(matches!(
            options.command,
            Command::Apply {
                op: RawOp::DropKeyword { .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_insert_index() {
        parse(&["insert", "s", "kw-0", "-1"]).unwrap_err();
        parse(&["insert", "s", "kw-0", "ten"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_commands_and_flags() {
        parse(&["frobnicate"]).unwrap_err();
        parse(&["list", "--nope"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_and_extra_positionals() {
        parse(&["show"]).unwrap_err();
        parse(&["show", "a", "b"]).unwrap_err();
        parse(&["accept", "s"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--history", "a", "--history", "b", "list"]).unwrap_err();
        parse(&["--color", "--no-color", "list"]).unwrap_err();
        parse(&["--durable-writes", "--durable-writes", "list"]).unwrap_err();
    }

    #[test]
    fn rejects_session_flag_outside_analyze() {
        parse(&["list", "--session", "s"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_value() {
        parse(&["list", "--history"]).unwrap_err();
    }
}
