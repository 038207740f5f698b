use anyhow::{Context, Result, anyhow};
use atelier::admin::{self, ArtistRow, EventForm};
use atelier::cli::{self, Command};
use atelier::config::Config;
use atelier::context::{SharedContext, StandardContext};
use atelier::directory::{self, Profile};
use atelier::model::{RawEvent, UserProfile};
use atelier::profile;
use atelier::session::Session;
use atelier::source::LocalBackend;
use atelier::store::EventStore;
use atelier::timeline::TimelineView;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match cli::parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'atelier --help' for usage.");
            std::process::exit(2);
        }
    };

    if cli.command == Command::Help {
        cli::print_help("atelier");
        return Ok(());
    }

    let ctx: SharedContext = Arc::new(StandardContext::new(cli.root.clone()));
    let cfg = match Config::load_or_default(ctx.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            // A broken config file is reported rather than silently replaced.
            eprintln!("Error loading configuration:\n{}", e);
            std::process::exit(1);
        }
    };
    atelier::logging::init(ctx.as_ref(), cfg.log_level_filter());
    log::info!("Starting atelier v{}", env!("CARGO_PKG_VERSION"));

    let backend = LocalBackend::new(ctx.clone());

    match cli.command {
        Command::Help => Ok(()),
        Command::Tui => run_tui(ctx, cfg).await,
        Command::Events { mode, search, at } => {
            let store = EventStore::load_from(&backend).await;
            let view = store.view(&search, mode.unwrap_or(cfg.default_mode), atelier::model::now());
            print_events(&view, &cfg, at);
            Ok(())
        }
        Command::Artists { search } => {
            let dir = directory::load_directory(&backend).await;
            let artists = dir.listed_artists(&search);
            if artists.is_empty() {
                println!("No artists found.");
            }
            for a in artists {
                println!(
                    "{} {} {}",
                    cli::pad(&a.name, 24),
                    cli::pad(a.designation.as_str(), 8),
                    a.domain
                );
            }
            Ok(())
        }
        Command::Exhibition { search } => {
            let dir = directory::load_directory(&backend).await;
            let works = dir.artworks_for_sale(&search);
            if works.is_empty() {
                println!("No artworks for sale.");
            }
            for w in works {
                println!(
                    "{} {} ${:.2}",
                    cli::pad(&w.title, 32),
                    cli::pad(&w.artist_name, 24),
                    w.price
                );
            }
            Ok(())
        }
        Command::AddEvent {
            as_user,
            title,
            date,
            category,
            location,
        } => {
            let session = sign_in(&backend, &as_user).await?;
            let event = admin::create_event(
                &session,
                EventForm {
                    title,
                    date,
                    category,
                    location,
                    ..Default::default()
                },
            )?;
            backend.add_event(RawEvent::from(&event))?;
            println!("Created event {} ({})", event.title, event.id);
            Ok(())
        }
        Command::ImportArtists { as_user, file } => {
            let session = sign_in(&backend, &as_user).await?;
            let csv = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let rows: Vec<ArtistRow> = csv.lines().filter_map(ArtistRow::from_csv_line).collect();
            let existing = backend.load_artists()?;
            let report = admin::bulk_add_artists(&session, &rows, &existing)?;
            backend.add_artists(report.created.clone())?;
            println!("{}", report.message);
            for err in &report.errors {
                eprintln!("  {}", err);
            }
            Ok(())
        }
        Command::EditProfile {
            as_user,
            user,
            changes,
        } => {
            let session = sign_in(&backend, &as_user).await?;
            let target = user.unwrap_or(as_user);
            let saved = profile::update_profile(&backend, &session, &target, &changes)?;
            println!("Profile updated successfully! ({})", saved.name());
            Ok(())
        }
    }
}

/// Resolves `uid` to a profile and opens a session for it.
async fn sign_in(backend: &LocalBackend, uid: &str) -> Result<Session> {
    if uid.is_empty() {
        return Ok(Session::anonymous());
    }
    let dir = directory::load_directory(backend).await;
    let user = match dir.find_profile(uid) {
        Some(Profile::User(u)) => u,
        Some(Profile::Artist(a)) => UserProfile::from(&a),
        None => return Err(anyhow!("No user or artist with id '{}'", uid)),
    };
    Ok(Session::signed_in(user))
}

fn print_events(view: &TimelineView, cfg: &Config, at: Option<f64>) {
    if view.is_empty() {
        println!("{}", view.empty_message());
        return;
    }
    let now = atelier::model::now();
    for e in view.events() {
        println!(
            "{}  {} {}  [{}]",
            e.start.format(&cfg.date_format),
            cli::pad(e.category.as_str(), 10),
            e.title,
            e.call_to_action(now)
        );
    }
    if let Some(position) = at {
        if let Some(label) = view.label_at(position) {
            println!();
            println!("{}", label);
        }
        if let Some(e) = view.nearest(position) {
            println!("Nearest: {} ({})", e.title, e.start.format(&cfg.date_format));
        }
    }
}

#[cfg(feature = "tui")]
async fn run_tui(ctx: SharedContext, cfg: Config) -> Result<()> {
    atelier::tui::run(ctx, cfg).await
}

#[cfg(not(feature = "tui"))]
async fn run_tui(_ctx: SharedContext, _cfg: Config) -> Result<()> {
    cli::print_help("atelier");
    Ok(())
}
