//! CLI binary for flashyy.
//!
//! A thin shim over the library crate that maps subcommands to library
//! calls and prints results.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flashyy::{
    inspect, preview, BackendConfig, CardPatch, GroupPatch, IngestConfig, IngestProgressCallback,
    IngestStage, Library, PracticeDeck, PracticeSelection, ProgressCallback, Session,
    SupabaseAuth, SupabaseStore, SwipeDirection, SwipeOutcome,
};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner naming the current stage, with one
/// log line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let template = "{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}";
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl IngestProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: IngestStage) {
        self.bar.set_prefix(stage.to_string());
        self.bar.set_message("");
    }

    fn on_stage_complete(&self, stage: IngestStage, detail: &str) {
        self.bar
            .println(format!("  {} {:<22} {}", green("✓"), stage.to_string(), dim(detail)));
    }

    fn on_page_extracted(&self, page_num: usize, total_pages: usize, chars: usize) {
        self.bar
            .set_message(format!("page {page_num}/{total_pages}  {chars} chars"));
    }

    fn on_short_page(&self, page_num: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3} has only {} chars (image or scanned page?)",
            yellow("⚠"),
            page_num,
            chars
        ));
    }

    fn on_failure(&self, stage: IngestStage, error: &str) {
        let first_line = error.lines().next().unwrap_or(error);
        self.bar
            .println(format!("  {} {:<22} {}", red("✗"), stage.to_string(), red(first_line)));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check how many cards a document will ask for (no API key needed)
  flashyy inspect lecture.pdf

  # See what the model would produce, without saving anything
  flashyy preview lecture.pdf
  flashyy preview --prompt-only lecture.pdf

  # Sign in once, then export the printed variables
  flashyy login --email me@example.com
  eval "$(flashyy login --email me@example.com)"
  eval "$(flashyy logout)"

  # Generate cards into a group
  flashyy groups create "Cell Biology" --color sage
  flashyy ingest lecture.pdf --group 6f1c…

  # Paste Q:/A: blocks
  flashyy bulk-add notes.txt --group 6f1c…
  pbpaste | flashyy bulk-add - --group 6f1c…

  # Practise two groups with a fixed shuffle
  flashyy practice --group 6f1c… --group 9a02… --seed 7

INPUT FORMAT (bulk-add):
  Q: What is React?
  A: A JavaScript library for building user interfaces.

  Q: What is JSX?
  A: A syntax extension for JavaScript.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  FLASHYY_LLM_PROVIDER    Override provider (openai, anthropic, gemini, ollama)
  FLASHYY_MODEL           Override model ID
  SUPABASE_URL            Backend project URL
  SUPABASE_ANON_KEY       Backend public API key
  FLASHYY_ACCESS_TOKEN    Session token printed by `flashyy login`
  FLASHYY_USER_ID         User id printed by `flashyy login`
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
"#;

/// Study flashcards, and generate them from PDFs with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "flashyy",
    version,
    about = "Flashcards: groups, bulk import, PDF-to-cards with an LLM, shuffled practice",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    backend: BackendArgs,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "FLASHYY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true, env = "FLASHYY_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "FLASHYY_NO_PROGRESS")]
    no_progress: bool,

    /// Print results as JSON.
    #[arg(long, global = true, env = "FLASHYY_JSON")]
    json: bool,
}

#[derive(Args, Debug)]
struct BackendArgs {
    /// Backend project URL.
    #[arg(long, global = true, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Backend public (anon) key.
    #[arg(long, global = true, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    supabase_anon_key: Option<String>,

    /// Session access token, as printed by `flashyy login`.
    #[arg(long, global = true, env = "FLASHYY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Signed-in user id, as printed by `flashyy login`.
    #[arg(long, global = true, env = "FLASHYY_USER_ID")]
    user_id: Option<Uuid>,
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "FLASHYY_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "FLASHYY_LLM_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "FLASHYY_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "FLASHYY_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    #[command(flatten)]
    document: DocumentArgs,

    /// Text file with a custom prompt; must contain {min_cards} and {text}.
    #[arg(long, env = "FLASHYY_PROMPT")]
    prompt: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct DocumentArgs {
    /// PDF user password for encrypted documents.
    #[arg(long, env = "FLASHYY_PDF_PASSWORD", hide_env_values = true)]
    pdf_password: Option<String>,

    /// Pages with fewer characters than this are reported as short.
    #[arg(long, env = "FLASHYY_SHORT_PAGE_CHARS", default_value_t = 100)]
    short_page_chars: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a PDF and show its text stats and card quota. No model call.
    Inspect {
        pdf: PathBuf,
        #[command(flatten)]
        document: DocumentArgs,
    },

    /// Generate and parse cards from a PDF without saving them.
    Preview {
        pdf: PathBuf,
        /// Print the prompt that would be sent and stop.
        #[arg(long)]
        prompt_only: bool,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Generate cards from a PDF and save them into a group.
    Ingest {
        pdf: PathBuf,
        #[arg(long)]
        group: Uuid,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Save cards from blank-line-separated Q:/A: blocks (`-` reads stdin).
    BulkAdd {
        file: String,
        #[arg(long)]
        group: Uuid,
    },

    /// Save one card.
    Add {
        #[arg(long)]
        group: Uuid,
        #[arg(short, long)]
        question: String,
        #[arg(short, long)]
        answer: String,
    },

    /// Manage groups.
    Groups {
        #[command(subcommand)]
        command: GroupsCommand,
    },

    /// Manage cards.
    Cards {
        #[command(subcommand)]
        command: CardsCommand,
    },

    /// Practise a shuffled deck: n = next, p = previous, f = flip, q = quit.
    Practice {
        /// Groups to include (repeatable). Default: every card.
        #[arg(long)]
        group: Vec<Uuid>,
        /// Seed the shuffle for a repeatable order.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sign in and print the session as shell exports.
    Login {
        #[arg(long, env = "FLASHYY_EMAIL")]
        email: String,
        #[arg(long, env = "FLASHYY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Register a new account instead of signing in.
        #[arg(long)]
        sign_up: bool,
    },

    /// Sign out the exported session and print the matching `unset` line.
    Logout,
}

#[derive(Subcommand, Debug)]
enum GroupsCommand {
    List,
    Create {
        name: String,
        /// Palette name or hex (softGray, sage, #FEC6A1, …).
        #[arg(long)]
        color: Option<String>,
    },
    Rename {
        id: Uuid,
        name: String,
    },
    Recolor {
        id: Uuid,
        color: String,
    },
    /// Delete a group and every card in it.
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
enum CardsCommand {
    List {
        #[arg(long)]
        group: Option<Uuid>,
    },
    Edit {
        id: Uuid,
        #[arg(short, long)]
        question: Option<String>,
        #[arg(short, long)]
        answer: Option<String>,
        /// Move the card to another group.
        #[arg(long)]
        group: Option<Uuid>,
    },
    Delete {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner's stage lines carry the same information.
    let uses_pipeline = matches!(
        cli.command,
        Command::Inspect { .. } | Command::Preview { .. } | Command::Ingest { .. }
    );
    let show_progress = uses_pipeline && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress = show_progress.then(CliProgressCallback::new);
    let result = run(&cli, progress.clone()).await;
    if let Some(ref p) = progress {
        p.finish();
    }
    result
}

async fn run(cli: &Cli, progress: Option<Arc<CliProgressCallback>>) -> Result<()> {
    let progress = progress.map(|p| p as ProgressCallback);

    match &cli.command {
        // ── Pipeline without the row-store ───────────────────────────────
        Command::Inspect { pdf, document } => {
            let config = document_config(document, progress)?;
            let inspection = inspect(pdf, &config).await.context("Failed to inspect PDF")?;
            if cli.json {
                print_json(&inspection.stats)?;
                return Ok(());
            }
            let stats = &inspection.stats;
            println!("File:           {}", pdf.display());
            println!("Pages:          {}", stats.page_count);
            println!("Words:          {}", stats.word_count);
            println!("Characters:     {}", stats.text_chars);
            println!("Chars/page:     {}", stats.average_chars_per_page());
            if !stats.short_pages.is_empty() {
                println!("Short pages:    {:?}", stats.short_pages);
            }
            println!("Card quota:     {}", bold(&stats.min_cards.to_string()));
        }

        Command::Preview {
            pdf,
            prompt_only,
            model,
        } => {
            if *prompt_only {
                let config = document_config(&model.document, progress)?;
                let inspection = inspect(pdf, &config).await.context("Failed to inspect PDF")?;
                println!("{}", inspection.prompt.text);
                return Ok(());
            }

            let config = model_config(model, progress).await?;
            let preview = preview(pdf, &config).await.context("Preview failed")?;
            if cli.json {
                print_json(&preview.drafts)?;
                return Ok(());
            }
            for draft in &preview.drafts {
                print!("{}", draft.to_qa_block());
            }
            if preview.drafts.is_empty() {
                eprintln!("{} The model returned no Q:/A: pairs.", red("✘"));
                if !cli.quiet {
                    eprintln!("{}", dim(&preview.response.text));
                }
            } else if !cli.quiet {
                eprintln!(
                    "{} {} cards (asked for at least {})  {} tokens in / {} out",
                    green("✔"),
                    bold(&preview.drafts.len().to_string()),
                    preview.stats.min_cards,
                    dim(&preview.stats.prompt_tokens.to_string()),
                    dim(&preview.stats.completion_tokens.to_string()),
                );
            }
        }

        // ── Library commands ─────────────────────────────────────────────
        Command::Ingest { pdf, group, model } => {
            let config = model_config(model, progress).await?;
            let mut library = open_library(&cli.backend).await?;
            library.select_group(*group)?;

            let output = library
                .ingest_pdf(pdf, &config)
                .await
                .context("Ingestion failed")?;

            if cli.json {
                print_json(&output)?;
            } else if !cli.quiet {
                eprintln!(
                    "{} {} cards saved to '{}' (asked for at least {})  {}ms",
                    green("✔"),
                    bold(&output.cards.len().to_string()),
                    group_name(&library, *group),
                    output.stats.min_cards,
                    output.stats.total_duration_ms,
                );
            }
        }

        Command::BulkAdd { file, group } => {
            let text = read_input(file).await?;
            let mut library = open_library(&cli.backend).await?;
            library.select_group(*group)?;

            let added = library.import_text(&text).await.context("Bulk add failed")?;
            if !cli.quiet {
                eprintln!(
                    "{} Added {} flashcards successfully!",
                    green("✔"),
                    bold(&added.to_string())
                );
            }
        }

        Command::Add {
            group,
            question,
            answer,
        } => {
            let mut library = open_library(&cli.backend).await?;
            library.select_group(*group)?;
            let card = library.add_card(question, answer).await?;
            if cli.json {
                print_json(card)?;
            } else if !cli.quiet {
                eprintln!("{} Card added ({})", green("✔"), dim(&card.id.to_string()));
            }
        }

        Command::Groups { command } => run_groups(cli, command).await?,
        Command::Cards { command } => run_cards(cli, command).await?,

        Command::Practice { group, seed } => {
            let library = open_library(&cli.backend).await?;
            let selection = PracticeSelection::groups(group.iter().copied());
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(*s),
                None => StdRng::from_entropy(),
            };
            let deck = PracticeDeck::from_selection(library.cards(), &selection, &mut rng)?;
            eprintln!(
                "{} Practising {} ({} cards)",
                cyan("◆"),
                bold(&selection.label(library.groups())),
                deck.len()
            );
            practice_loop(deck)?;
        }

        Command::Login {
            email,
            password,
            sign_up,
        } => {
            let backend = backend_config(&cli.backend)?;
            let password = match password {
                Some(p) => p.clone(),
                None => prompt_line("Password: ")?,
            };
            let auth = SupabaseAuth::new(backend);
            let session = if *sign_up {
                match auth.sign_up(email, &password).await? {
                    Some(s) => s,
                    None => {
                        eprintln!(
                            "{} Check your email to confirm the account, then log in.",
                            cyan("◆")
                        );
                        return Ok(());
                    }
                }
            } else {
                auth.sign_in_with_password(email, &password)
                    .await
                    .context("Sign-in failed")?
            };
            println!("export FLASHYY_USER_ID={}", session.user_id);
            println!("export FLASHYY_ACCESS_TOKEN={}", session.access_token);
        }

        Command::Logout => {
            let backend = backend_config(&cli.backend)?;
            let session = session_from_args(&cli.backend)?;
            SupabaseAuth::new(backend)
                .sign_out(&session)
                .await
                .context("Sign-out failed")?;
            println!("unset FLASHYY_USER_ID FLASHYY_ACCESS_TOKEN");
        }
    }

    Ok(())
}

async fn run_groups(cli: &Cli, command: &GroupsCommand) -> Result<()> {
    let mut library = open_library(&cli.backend).await?;

    match command {
        GroupsCommand::List => {
            if cli.json {
                return print_json(library.groups());
            }
            for g in library.groups() {
                println!(
                    "{}  {:<24} {:>4} cards  {}",
                    dim(&g.id.to_string()),
                    g.name,
                    library.group_card_count(g.id),
                    dim(&g.color)
                );
            }
        }
        GroupsCommand::Create { name, color } => {
            let group = library.add_group(name, color.as_deref()).await?;
            if cli.json {
                return print_json(group);
            }
            println!("{}", group.id);
            eprintln!("{} Group created successfully!", green("✔"));
        }
        GroupsCommand::Rename { id, name } => {
            let patch = GroupPatch {
                name: Some(name.clone()),
                ..Default::default()
            };
            library.update_group(*id, patch).await?;
            eprintln!("{} Group updated successfully!", green("✔"));
        }
        GroupsCommand::Recolor { id, color } => {
            let patch = GroupPatch {
                color: Some(color.clone()),
                ..Default::default()
            };
            library.update_group(*id, patch).await?;
            eprintln!("{} Group updated successfully!", green("✔"));
        }
        GroupsCommand::Delete { id } => {
            let removed = library.delete_group(*id).await?;
            eprintln!("{} Group deleted along with {} cards", green("✔"), removed);
        }
    }
    Ok(())
}

async fn run_cards(cli: &Cli, command: &CardsCommand) -> Result<()> {
    let mut library = open_library(&cli.backend).await?;

    match command {
        CardsCommand::List { group } => {
            let cards: Vec<_> = match group {
                Some(g) => library.cards_in_group(*g).collect(),
                None => library.cards().iter().collect(),
            };
            if cli.json {
                return print_json(&cards);
            }
            for c in cards {
                println!("{}  [{}]", dim(&c.id.to_string()), group_name(&library, c.group_id));
                println!("  Q: {}", c.question);
                println!("  A: {}", c.answer);
            }
        }
        CardsCommand::Edit {
            id,
            question,
            answer,
            group,
        } => {
            if question.is_none() && answer.is_none() && group.is_none() {
                bail!("Nothing to change: pass --question, --answer or --group");
            }
            let patch = CardPatch {
                question: question.clone(),
                answer: answer.clone(),
                group_id: *group,
            };
            library.update_card(*id, patch).await?;
            eprintln!("{} Card updated successfully!", green("✔"));
        }
        CardsCommand::Delete { id } => {
            library.delete_card(*id).await?;
            eprintln!("{} Card deleted successfully!", green("✔"));
        }
    }
    Ok(())
}

// ── Practice loop ────────────────────────────────────────────────────────────

fn practice_loop(mut deck: PracticeDeck) -> Result<()> {
    let stdin = io::stdin();
    let mut flipped = false;
    show_card(&deck, flipped);

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        match line.trim() {
            "" | "n" => {
                flipped = false;
                if deck.swipe(SwipeDirection::Left) == SwipeOutcome::Completed {
                    eprintln!("{} You've gone through all the cards!", green("✔"));
                }
            }
            "p" => {
                flipped = false;
                if deck.swipe(SwipeDirection::Right) == SwipeOutcome::WrappedToLast {
                    eprintln!("{}", dim("Went back to the last card"));
                }
            }
            "f" => flipped = !flipped,
            "q" => break,
            other => {
                eprintln!("{}", dim(&format!("unknown key '{other}': n, p, f or q")));
                continue;
            }
        }
        show_card(&deck, flipped);
    }
    Ok(())
}

fn show_card(deck: &PracticeDeck, flipped: bool) {
    let card = deck.current();
    println!();
    println!("{}", dim(&deck.position().to_string()));
    if flipped {
        println!("{} {}", bold("A:"), card.answer);
    } else {
        println!("{} {}", bold("Q:"), card.question);
    }
    print!("{} ", dim("[n]ext [p]rev [f]lip [q]uit >"));
    io::stdout().flush().ok();
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn document_config(
    args: &DocumentArgs,
    progress: Option<ProgressCallback>,
) -> Result<IngestConfig> {
    let mut builder = IngestConfig::builder().short_page_chars(args.short_page_chars);
    if let Some(ref pwd) = args.pdf_password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

/// Map model flags to `IngestConfig`.
async fn model_config(
    args: &ModelArgs,
    progress: Option<ProgressCallback>,
) -> Result<IngestConfig> {
    let mut builder = IngestConfig::builder()
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .short_page_chars(args.document.short_page_chars);

    if let Some(ref m) = args.model {
        builder = builder.model(m.clone());
    }
    if let Some(ref p) = args.provider {
        builder = builder.provider_name(p.clone());
    }
    if let Some(ref pwd) = args.document.pdf_password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref path) = args.prompt {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt template from {:?}", path))?;
        builder = builder.prompt_template(template);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn backend_config(args: &BackendArgs) -> Result<BackendConfig> {
    let (Some(url), Some(key)) = (&args.supabase_url, &args.supabase_anon_key) else {
        bail!(
            "Set SUPABASE_URL and SUPABASE_ANON_KEY (or pass --supabase-url / --supabase-anon-key)"
        );
    };
    BackendConfig::new(url.clone(), key.clone()).context("Invalid backend configuration")
}

fn session_from_args(args: &BackendArgs) -> Result<Session> {
    let (Some(token), Some(user_id)) = (&args.access_token, args.user_id) else {
        bail!(
            "Not signed in. Run `flashyy login` and export FLASHYY_ACCESS_TOKEN / FLASHYY_USER_ID"
        );
    };
    Ok(Session {
        user_id,
        email: None,
        access_token: token.clone(),
    })
}

async fn open_library(args: &BackendArgs) -> Result<Library> {
    let backend = backend_config(args)?;
    let session = session_from_args(args)?;

    let store = Arc::new(SupabaseStore::new(backend, &session));
    let mut library = Library::new(store, &session);
    library.load().await.context("Failed to load groups and cards")?;
    Ok(library)
}

fn group_name(library: &Library, id: Uuid) -> String {
    library
        .group(id)
        .map(|g| g.name.clone())
        .unwrap_or_else(|| id.to_string())
}

async fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {file}"))
}

fn prompt_line(label: &str) -> Result<String> {
    eprint!("{label}");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}
