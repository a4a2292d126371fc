//! Command handlers. Each handler builds the editors it needs against the
//! shared draft storage, so staged edits survive between invocations the
//! way browser drafts survive reloads.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::warn;

use vestry_core::admin::{
    AnnouncementDraft, AnnouncementEditor, MassScheduleEditor, MediaEditor, MessageDraft,
    SpiritualMessageEditor,
};
use vestry_core::auth::SessionGate;
use vestry_core::config::Config;
use vestry_core::drafts::{DraftStorage, FileStorage, MemoryStorage};
use vestry_core::models::{DAYS, SERVICE_TYPES};
use vestry_core::service::ContentService;
use vestry_core::store::StoreClient;

use crate::cli::{
    AnnouncementCommands, Cli, Commands, MediaCommands, MessageCommands, PrayerCommands,
    ScheduleCommands,
};

pub struct AppContext {
    pub service: ContentService,
    pub storage: Arc<dyn DraftStorage>,
    pub gate: SessionGate,
}

impl AppContext {
    pub fn build(cli: &Cli) -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;

        let storage: Arc<dyn DraftStorage> = match config
            .data_dir()
            .and_then(|dir| FileStorage::new(dir.join("drafts")))
        {
            Ok(files) => Arc::new(files),
            Err(e) => {
                warn!(error = %e, "Draft storage unavailable; drafts will not survive this run");
                Arc::new(MemoryStorage::new())
            }
        };

        let service = ContentService::disconnected();
        match cli.store_url.clone().or_else(|| config.store_url.clone()) {
            Some(url) => match StoreClient::new(url) {
                Ok(client) => service.connect(Arc::new(client)),
                Err(e) => warn!(error = %e, "Failed to initialize store client"),
            },
            None => warn!("No store URL configured; reads answer empty and writes will fail"),
        }

        let gate = SessionGate::new(storage.clone(), config.admin_secret());

        Ok(Self {
            service,
            storage,
            gate,
        })
    }
}

pub async fn run(ctx: AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Status => status(&ctx).await,
        Commands::Login => login(&ctx),
        Commands::Logout => {
            ctx.gate.logout();
            println!("Logged out; all drafts discarded.");
            Ok(())
        }
        Commands::Schedule { command } => schedule(&ctx, command).await,
        Commands::Prayers { command } => prayers(&ctx, command).await,
        Commands::Media { command } => media(&ctx, command).await,
        Commands::Announcement { command } => announcement(&ctx, command).await,
        Commands::Message { command } => message(&ctx, command).await,
    }
}

fn require_admin(ctx: &AppContext) -> Result<()> {
    if ctx.gate.is_authenticated() {
        Ok(())
    } else {
        bail!("not logged in - run `vestry login` first")
    }
}

async fn status(ctx: &AppContext) -> Result<()> {
    let connection = if ctx.service.is_ready() {
        "ready"
    } else {
        "not configured"
    };
    let session = if ctx.gate.is_authenticated() {
        "logged in"
    } else {
        "logged out"
    };
    println!("Store connection: {connection}");
    println!("Admin session:    {session}");

    if ctx.service.is_ready() {
        let counts = ctx.service.counts().await?;
        println!("Mass timings:     {}", counts.mass_schedule);
        println!("Prayers:          {}", counts.prayers);
        println!("Media items:      {}", counts.media_gallery);
    }
    Ok(())
}

fn login(ctx: &AppContext) -> Result<()> {
    if ctx.gate.is_authenticated() {
        println!("Already logged in.");
        return Ok(());
    }
    let password =
        rpassword::prompt_password("Admin password: ").context("Failed to read password")?;
    if ctx.gate.login(&password) {
        println!("Logged in.");
        Ok(())
    } else {
        bail!("incorrect password")
    }
}

async fn schedule(ctx: &AppContext, command: ScheduleCommands) -> Result<()> {
    match command {
        ScheduleCommands::List => {
            let schedule = ctx.service.mass_schedule().await?;
            if schedule.is_empty() {
                println!("No mass timings published.");
                return Ok(());
            }
            for timing in schedule {
                println!(
                    "{:<10} {:<6} {}",
                    timing.day, timing.time, timing.service_type
                );
            }
            Ok(())
        }
        ScheduleCommands::Draft { day, time, service } => {
            require_admin(ctx)?;
            if day.is_none() && time.is_none() && service.is_none() {
                println!("Days:          {}", DAYS.join(", "));
                println!("Service types: {}", SERVICE_TYPES.join(", "));
                println!();
            }
            if let Some(ref day) = day {
                if !DAYS.contains(&day.as_str()) {
                    bail!("unknown day: {day} (expected one of {})", DAYS.join(", "));
                }
            }
            let mut editor = MassScheduleEditor::new(ctx.storage.clone());
            editor.edit(|d| {
                if let Some(day) = day {
                    d.day = day;
                }
                if let Some(time) = time {
                    d.time = time;
                }
                if let Some(service) = service {
                    d.service_type = service;
                }
            });
            let staged = editor.draft();
            println!(
                "Staged: {} at {} - {}",
                staged.day, staged.time, staged.service_type
            );
            Ok(())
        }
        ScheduleCommands::Add => {
            require_admin(ctx)?;
            let mut editor = MassScheduleEditor::new(ctx.storage.clone());
            let staged = editor.draft().clone();
            editor
                .submit(&ctx.service)
                .await
                .context("Failed to add mass timing; the draft is kept, try again")?;
            println!(
                "Added: {} at {} - {}",
                staged.day, staged.time, staged.service_type
            );
            Ok(())
        }
        ScheduleCommands::Discard => {
            require_admin(ctx)?;
            MassScheduleEditor::new(ctx.storage.clone()).discard();
            println!("Draft discarded.");
            Ok(())
        }
    }
}

async fn prayers(ctx: &AppContext, command: PrayerCommands) -> Result<()> {
    match command {
        PrayerCommands::List { language } => {
            let prayers = ctx.service.prayers_by_language(&language).await?;
            if prayers.is_empty() {
                println!("No prayers published for {language}.");
                return Ok(());
            }
            for prayer in prayers {
                println!("{}\n{}\n", prayer.title, prayer.content);
            }
            Ok(())
        }
        PrayerCommands::Add {
            title,
            language,
            content,
        } => {
            require_admin(ctx)?;
            ctx.service
                .add_prayer(&title, &language, &content)
                .await
                .context("Failed to add prayer; try again")?;
            println!("Added prayer: {title} ({language})");
            Ok(())
        }
    }
}

async fn media(ctx: &AppContext, command: MediaCommands) -> Result<()> {
    match command {
        MediaCommands::List => {
            let gallery = ctx.service.media_gallery().await?;
            if gallery.is_empty() {
                println!("No media published.");
                return Ok(());
            }
            for item in gallery {
                let location = if item.is_inline() {
                    "[inline image]".to_string()
                } else {
                    item.url.clone()
                };
                println!("{:<5} {:<30} {}", item.media_type, item.caption, location);
            }
            Ok(())
        }
        MediaCommands::Draft {
            media_type,
            url,
            caption,
            image_file,
        } => {
            require_admin(ctx)?;
            let mut editor = MediaEditor::new(ctx.storage.clone());
            if let Some(path) = image_file {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                editor.attach_image(&mime_for_path(&path), &bytes);
            }
            editor.edit(|d| {
                if let Some(media_type) = media_type {
                    d.media_type = media_type;
                }
                if let Some(url) = url {
                    d.url = url;
                }
                if let Some(caption) = caption {
                    d.caption = caption;
                }
            });
            let staged = editor.draft();
            let location = if staged.url.starts_with("data:") {
                "[inline image]"
            } else {
                staged.url.as_str()
            };
            println!(
                "Staged: {} \"{}\" {}",
                staged.media_type, staged.caption, location
            );
            Ok(())
        }
        MediaCommands::Add => {
            require_admin(ctx)?;
            let mut editor = MediaEditor::new(ctx.storage.clone());
            if editor.draft().url.is_empty() {
                bail!("nothing staged - set a url or attach an image first");
            }
            let caption = editor.draft().caption.clone();
            editor
                .submit(&ctx.service)
                .await
                .context("Failed to add media item; the draft is kept, try again")?;
            println!("Added to gallery: {caption}");
            Ok(())
        }
        MediaCommands::Discard => {
            require_admin(ctx)?;
            MediaEditor::new(ctx.storage.clone()).discard();
            println!("Draft discarded.");
            Ok(())
        }
    }
}

async fn announcement(ctx: &AppContext, command: AnnouncementCommands) -> Result<()> {
    match command {
        AnnouncementCommands::Show => {
            match ctx.service.announcement().await? {
                None => println!("No announcement published."),
                Some(a) => {
                    let status = if a.is_visible() { "LIVE" } else { "hidden" };
                    println!("Status: {status}");
                    println!("Text:   {}", a.text);
                    if let Some(date) = a.event_date {
                        println!("Date:   {}", date.format("%-d %B %Y"));
                    }
                }
            }
            Ok(())
        }
        AnnouncementCommands::Draft {
            text,
            date,
            active,
            inactive,
        } => {
            require_admin(ctx)?;
            let mut editor = AnnouncementEditor::new(ctx.storage.clone());
            if let Ok(Some(existing)) = ctx.service.announcement().await {
                editor.observe_server(&existing);
            }
            editor.edit(|d| {
                if let Some(text) = text {
                    d.text = text;
                }
                if let Some(date) = date {
                    d.event_date = Some(date);
                }
                if active {
                    d.active = true;
                }
                if inactive {
                    d.active = false;
                }
            });
            print_announcement_draft(editor.draft());
            Ok(())
        }
        AnnouncementCommands::Load => {
            require_admin(ctx)?;
            let Some(existing) = ctx.service.announcement().await? else {
                bail!("no announcement saved on the store");
            };
            let mut editor = AnnouncementEditor::new(ctx.storage.clone());
            editor.load_existing(&existing);
            print_announcement_draft(editor.draft());
            Ok(())
        }
        AnnouncementCommands::Publish => {
            require_admin(ctx)?;
            let mut editor = AnnouncementEditor::new(ctx.storage.clone());
            if editor.draft().text.is_empty() {
                bail!("nothing staged - set announcement text first");
            }
            let active = editor.draft().active;
            editor
                .submit(&ctx.service)
                .await
                .context("Failed to save announcement; the draft is kept, try again")?;
            if active {
                println!("Announcement saved and is now LIVE on the website.");
            } else {
                println!("Announcement saved (currently hidden - mark it active to show it).");
            }
            Ok(())
        }
        AnnouncementCommands::Discard => {
            require_admin(ctx)?;
            AnnouncementEditor::new(ctx.storage.clone()).discard();
            println!("Draft discarded.");
            Ok(())
        }
    }
}

fn print_announcement_draft(draft: &AnnouncementDraft) {
    let visibility = if draft.active { "active" } else { "hidden" };
    println!("Staged ({visibility}): {}", draft.text);
    if let Some(date) = draft.event_date {
        println!("Event date: {}", date.format("%-d %B %Y"));
    }
}

async fn message(ctx: &AppContext, command: MessageCommands) -> Result<()> {
    match command {
        MessageCommands::Show => {
            match ctx.service.spiritual_message().await? {
                None => println!("No spiritual message published."),
                Some(m) => {
                    println!("{}", m.title);
                    println!("by {} on {}", m.author, m.date.format("%-d %B %Y"));
                    println!("\n{}", m.full_text);
                }
            }
            Ok(())
        }
        MessageCommands::Draft {
            title,
            author,
            text,
        } => {
            require_admin(ctx)?;
            let mut editor = SpiritualMessageEditor::new(ctx.storage.clone());
            if let Ok(Some(existing)) = ctx.service.spiritual_message().await {
                editor.observe_server(&existing);
            }
            editor.edit(|d| {
                if let Some(title) = title {
                    d.title = title;
                }
                if let Some(author) = author {
                    d.author = author;
                }
                if let Some(text) = text {
                    d.full_text = text;
                }
            });
            print_message_draft(editor.draft());
            Ok(())
        }
        MessageCommands::Load => {
            require_admin(ctx)?;
            let Some(existing) = ctx.service.spiritual_message().await? else {
                bail!("no spiritual message saved on the store");
            };
            let mut editor = SpiritualMessageEditor::new(ctx.storage.clone());
            editor.load_existing(&existing);
            print_message_draft(editor.draft());
            Ok(())
        }
        MessageCommands::Publish => {
            require_admin(ctx)?;
            let mut editor = SpiritualMessageEditor::new(ctx.storage.clone());
            let staged = editor.draft();
            if staged.title.is_empty() || staged.author.is_empty() || staged.full_text.is_empty() {
                bail!("nothing staged - title, author, and text are all required");
            }
            let title = staged.title.clone();
            editor
                .submit(&ctx.service)
                .await
                .context("Failed to save spiritual message; the draft is kept, try again")?;
            println!("Published: {title}");
            Ok(())
        }
        MessageCommands::Discard => {
            require_admin(ctx)?;
            SpiritualMessageEditor::new(ctx.storage.clone()).discard();
            println!("Draft discarded.");
            Ok(())
        }
    }
}

fn print_message_draft(draft: &MessageDraft) {
    println!("Staged: {}", draft.title);
    if !draft.author.is_empty() {
        println!("by {}", draft.author);
    }
    if !draft.full_text.is_empty() {
        println!("\n{}", draft.full_text);
    }
}

fn mime_for_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}
