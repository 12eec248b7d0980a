use super::logging::init_logging;
use super::render::{render_messages, render_table, render_tabs};
use super::setup::{split_line, Cli, Direction, Line, ShellCommand};
use bookshelf::api::ShelfApi;
use bookshelf::config::ShelfConfig;
use bookshelf::error::{Result, ShelfError};
use bookshelf::model::Book;
use bookshelf::screens::Tab;
use bookshelf::table::{SortDirection, TableEngine};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

struct AppContext {
    api: ShelfApi,
    config_dir: PathBuf,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_dir = resolve_config_dir(cli.config_dir)?;
    let config = ShelfConfig::load(&config_dir)?;
    debug!(dir = %config_dir.display(), latency_ms = config.latency_ms, "config loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(session(AppContext {
        api: ShelfApi::new(config),
        config_dir,
    }))
}

fn resolve_config_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("com", "bookshelf", "bookshelf")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ShelfError::Config("Could not determine config dir".into()))
}

async fn session(mut ctx: AppContext) -> Result<()> {
    print_screen(&ctx.api);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            // The offending line is already consumed, so the next read starts fresh
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                println!("{}", format!("Skipped unreadable input: {}", e).red());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let words = split_line(&line);
        if words.is_empty() {
            continue;
        }

        let command = match Line::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                println!("{}", e.to_string().trim_end());
                continue;
            }
        };

        let outcome = dispatch(&mut ctx, command).await;

        // Failed actions already announce themselves
        let notes = ctx.api.drain_notifications();
        print_lines(render_messages(&notes));
        match outcome {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) if notes.is_empty() => println!("{}", e.to_string().red()),
            Err(e) => debug!(error = %e, "command failed"),
        }
    }

    Ok(())
}

async fn dispatch(ctx: &mut AppContext, command: ShellCommand) -> Result<Flow> {
    match command {
        ShellCommand::List => show_tab(ctx, Tab::Books),
        ShellCommand::Archived => show_tab(ctx, Tab::Archived),
        ShellCommand::Search { term } => handle_search(ctx, term.join(" ")),
        ShellCommand::Sort { column, direction } => handle_sort(ctx, &column, direction),
        ShellCommand::Page { target } => handle_page(ctx, &target),
        ShellCommand::PageSize { size } => handle_page_size(ctx, size),
        ShellCommand::Select { row } => handle_select(ctx, row),
        ShellCommand::Clear => handle_clear(ctx),
        ShellCommand::New { name } => handle_new(ctx, name.join(" ")).await,
        ShellCommand::Save { name } => handle_save(ctx, name.join(" ")).await,
        ShellCommand::Archive { row } => handle_archive(ctx, row).await,
        ShellCommand::Restore { row } => handle_restore(ctx, row).await,
        ShellCommand::Purge { row, yes } => handle_purge(ctx, row, yes).await,
        ShellCommand::Config { key, value } => handle_config(ctx, key, value),
        ShellCommand::Quit => Ok(Flow::Quit),
    }
}

fn show_tab(ctx: &mut AppContext, tab: Tab) -> Result<Flow> {
    ctx.api.set_tab(tab);
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

fn handle_search(ctx: &mut AppContext, term: String) -> Result<Flow> {
    match ctx.api.tab() {
        Tab::Books => ctx.api.books_mut().search(&term),
        Tab::Archived => ctx.api.archived_mut().search(&term),
    }
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

fn handle_sort(ctx: &mut AppContext, column: &str, direction: Option<Direction>) -> Result<Flow> {
    let table = current_table(&mut ctx.api);
    let sort = match direction {
        Some(Direction::Asc) => table.set_sort(column, SortDirection::Asc)?,
        Some(Direction::Desc) => table.set_sort(column, SortDirection::Desc)?,
        None => table.sort_by(column)?,
    };
    debug!(column = %sort.column, direction = %sort.direction, "sorted");
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

fn handle_page(ctx: &mut AppContext, target: &str) -> Result<Flow> {
    let table = current_table(&mut ctx.api);
    let moved = match target {
        "next" | "n" => table.next_page(),
        "prev" | "previous" | "p" => table.previous_page(),
        "first" => table.first_page(),
        "last" => table.last_page(),
        number => {
            let page = number
                .parse::<usize>()
                .map_err(|_| ShelfError::ValidationFailed(format!("Unknown page: {}", number)))?;
            table.go_to_page(row_index(page)?)
        }
    };
    if !moved {
        println!("{}", "No such page.".yellow());
    }
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

fn handle_page_size(ctx: &mut AppContext, size: usize) -> Result<Flow> {
    current_table(&mut ctx.api).set_page_size(size)?;
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

fn handle_select(ctx: &mut AppContext, row: usize) -> Result<Flow> {
    require_tab(&ctx.api, Tab::Books)?;
    let book = ctx.api.books_mut().press_edit(row_index(row)?)?;
    debug!(id = %book.id, "selected");
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

fn handle_clear(ctx: &mut AppContext) -> Result<Flow> {
    ctx.api.books_mut().clear_selection();
    print_screen(&ctx.api);
    Ok(Flow::Continue)
}

async fn handle_new(ctx: &mut AppContext, name: String) -> Result<Flow> {
    let screen = ctx.api.books_mut();
    screen.clear_selection();
    screen.set_name(name);
    print_working();
    screen.submit().await?;
    show_tab(ctx, Tab::Books)
}

async fn handle_save(ctx: &mut AppContext, name: String) -> Result<Flow> {
    let screen = ctx.api.books_mut();
    screen.set_name(name);
    print_working();
    screen.submit().await?;
    show_tab(ctx, Tab::Books)
}

async fn handle_archive(ctx: &mut AppContext, row: usize) -> Result<Flow> {
    require_tab(&ctx.api, Tab::Books)?;
    let position = row_index(row)?;
    print_working();
    ctx.api.books_mut().press_delete(position).await?;
    show_tab(ctx, Tab::Books)
}

async fn handle_restore(ctx: &mut AppContext, row: usize) -> Result<Flow> {
    require_tab(&ctx.api, Tab::Archived)?;
    let position = row_index(row)?;
    print_working();
    ctx.api.archived_mut().press_restore(position).await?;
    show_tab(ctx, Tab::Archived)
}

async fn handle_purge(ctx: &mut AppContext, row: usize, yes: bool) -> Result<Flow> {
    require_tab(&ctx.api, Tab::Archived)?;
    let position = row_index(row)?;
    if yes {
        print_working();
    }
    let deleted = ctx.api.archived_mut().press_delete(position, yes).await?;
    if deleted.is_none() {
        println!(
            "{}",
            format!(
                "This cannot be undone. Run `purge {} --yes` to delete permanently.",
                row
            )
            .yellow()
        );
    }
    show_tab(ctx, Tab::Archived)
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<Flow> {
    match (key, value) {
        (None, _) => {
            for key in ShelfConfig::KEYS {
                println!("{} = {}", key, ctx.api.config().get(key)?);
            }
        }
        (Some(key), None) => println!("{} = {}", key, ctx.api.config().get(&key)?),
        (Some(key), Some(value)) => {
            let mut config = ShelfConfig::load(&ctx.config_dir)?;
            config.set(&key, &value)?;
            config.save(&ctx.config_dir)?;
            println!(
                "{}",
                format!("{} = {} (applies from the next session)", key, value).green()
            );
        }
    }
    Ok(Flow::Continue)
}

fn current_table(api: &mut ShelfApi) -> &mut TableEngine<Book> {
    match api.tab() {
        Tab::Books => api.books_mut().table_mut(),
        Tab::Archived => api.archived_mut().table_mut(),
    }
}

fn require_tab(api: &ShelfApi, tab: Tab) -> Result<()> {
    if api.tab() == tab {
        return Ok(());
    }
    Err(ShelfError::ValidationFailed(format!(
        "Switch to the {} tab first",
        tab.label().to_lowercase()
    )))
}

/// Page rows and page numbers are shown from 1.
fn row_index(row: usize) -> Result<usize> {
    row.checked_sub(1)
        .ok_or_else(|| ShelfError::ValidationFailed("Numbers start at 1".into()))
}

fn print_working() {
    println!("{}", "Working…".dimmed());
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_screen(api: &ShelfApi) {
    println!();
    println!("{}", render_tabs(api.tab()));
    match api.tab() {
        Tab::Books => {
            let screen = api.books();
            print_lines(render_table(&screen.render(), &screen.search_term()));
            let form = screen.form();
            let status = if form.is_editing() {
                format!("Editing book {}: {}", form.id(), form.name())
            } else {
                format!("Next book gets id {}", form.id())
            };
            println!("{}", status.dimmed());
        }
        Tab::Archived => {
            let screen = api.archived();
            print_lines(render_table(&screen.render(), &screen.search_term()));
        }
    }
}
