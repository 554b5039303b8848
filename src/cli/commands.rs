//! Command dispatch and the fetch/render pipeline

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::client::ForumClient;
use crate::config::{self, Settings};
use crate::domain::{render_conversation, Post};
use crate::dump::write_note_structure;

const TRANSCRIPT_HEADER: &str = "OpenReview conversation tree";

pub fn execute_command(cli: &Cli) -> Result<()> {
    let mut settings = Settings::load().context("failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }
    debug!(base_url = %settings.base_url, "settings loaded");

    match &cli.command {
        Some(Commands::Export {
            forum,
            output,
            no_dump,
            username,
        }) => export(&settings, forum, output.as_deref(), *no_dump, username.as_deref()),
        Some(Commands::Dump {
            forum,
            output,
            username,
        }) => dump(&settings, forum, output.as_deref(), username.as_deref()),
        Some(Commands::Info { forum, username }) => info(&settings, forum, username.as_deref()),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => config_show(&settings),
            ConfigCommands::Init => config_init(),
            ConfigCommands::Path => config_path(),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

#[instrument(skip(settings))]
fn export(
    settings: &Settings,
    forum: &str,
    output: Option<&Path>,
    no_dump: bool,
    username: Option<&str>,
) -> Result<()> {
    output::header(&format!("Querying forum {forum}"));

    let (client, main_note) = connect(settings, forum, username)?;
    print_main_note(&main_note);

    let posts = client
        .get_notes(forum)
        .with_context(|| format!("failed to fetch notes for forum {forum}"))?;
    output::action("Fetched", &format!("{} notes", posts.len()));

    if !no_dump {
        write_structure_file(&posts, &settings.structure_file)?;
    }

    let transcript_path = output.unwrap_or(settings.transcript_file.as_path());
    write_transcript_file(posts, transcript_path)?;
    Ok(())
}

#[instrument(skip(settings))]
fn dump(
    settings: &Settings,
    forum: &str,
    output: Option<&Path>,
    username: Option<&str>,
) -> Result<()> {
    output::header(&format!("Querying forum {forum}"));

    let (client, _) = connect(settings, forum, username)?;
    let posts = client
        .get_notes(forum)
        .with_context(|| format!("failed to fetch notes for forum {forum}"))?;
    output::action("Fetched", &format!("{} notes", posts.len()));

    let path = output.unwrap_or(settings.structure_file.as_path());
    write_structure_file(&posts, path)
}

#[instrument(skip(settings))]
fn info(settings: &Settings, forum: &str, username: Option<&str>) -> Result<()> {
    let (_, main_note) = connect(settings, forum, username)?;
    print_main_note(&main_note);
    Ok(())
}

/// Try anonymous access first; on any API failure, prompt for credentials
/// and retry with a token login. Returns the client together with the
/// forum's main note, which doubles as the reachability probe.
fn connect(
    settings: &Settings,
    forum: &str,
    username: Option<&str>,
) -> Result<(ForumClient, Post)> {
    let client = ForumClient::anonymous(&settings.base_url);
    match client.get_note(forum) {
        Ok(note) => {
            output::success("anonymous access succeeded");
            Ok((client, note))
        }
        Err(err) => {
            if err.is_auth_required() {
                output::warning("this forum requires authentication");
            } else {
                output::warning(&format!("anonymous access failed: {err}"));
            }
            output::info("falling back to authenticated access");

            let preset = username.or(settings.username.as_deref());
            let (user, password) = prompt_credentials(preset)?;
            let client = ForumClient::login(&settings.base_url, &user, &password)
                .with_context(|| format!("login failed for {user}"))?;
            let note = client
                .get_note(forum)
                .with_context(|| format!("authenticated fetch failed for forum {forum}"))?;
            output::success("authenticated access succeeded");
            Ok((client, note))
        }
    }
}

fn prompt_credentials(preset_user: Option<&str>) -> Result<(String, String)> {
    let user = match preset_user {
        Some(user) => user.to_string(),
        None => {
            output::prompt("OpenReview username:");
            read_line().context("failed to read username")?
        }
    };
    output::prompt(&format!("Password for {user}:"));
    let password = read_line().context("failed to read password")?;
    Ok((user, password))
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

fn print_main_note(note: &Post) {
    output::header("Main note");
    output::detail(&format!("ID: {}", note.id));
    if let Some(title) = note.text_field("title") {
        output::detail(&format!("Title: {title}"));
    }
    let authors = note
        .content
        .get("authors")
        .map(|value| value.as_text_list().join(", "))
        .unwrap_or_default();
    if !authors.is_empty() {
        output::detail(&format!("Authors: {authors}"));
    }
    if let Some(abstract_text) = note.text_field("abstract") {
        let short: String = abstract_text.chars().take(300).collect();
        output::detail(&format!("Abstract: {short}..."));
    }
}

fn write_structure_file(posts: &[Post], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create structure file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_note_structure(posts, &mut writer)?;
    writer.flush()?;
    output::success(&format!("note structure written to {}", path.display()));
    Ok(())
}

fn write_transcript_file(posts: Vec<Post>, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create transcript file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{TRANSCRIPT_HEADER}")?;
    writeln!(writer, "{}\n", "=".repeat(50))?;
    render_conversation(posts, &mut writer)?;
    writer.flush()?;
    output::success(&format!("conversation tree written to {}", path.display()));
    Ok(())
}

fn config_show(settings: &Settings) -> Result<()> {
    output::header("Merged configuration");
    output::detail(&format!("base_url = {}", settings.base_url));
    output::detail(&format!(
        "username = {}",
        settings.username.as_deref().unwrap_or("-")
    ));
    output::detail(&format!(
        "transcript_file = {}",
        settings.transcript_file.display()
    ));
    output::detail(&format!(
        "structure_file = {}",
        settings.structure_file.display()
    ));
    Ok(())
}

fn config_init() -> Result<()> {
    let path = config::global_config_path()
        .context("cannot determine config directory for this platform")?;
    config::write_template(&path)
        .with_context(|| format!("cannot write config template to {}", path.display()))?;
    output::success(&format!("config template written to {}", path.display()));
    Ok(())
}

fn config_path() -> Result<()> {
    let path = config::global_config_path()
        .context("cannot determine config directory for this platform")?;
    output::info(&path.display());
    Ok(())
}
