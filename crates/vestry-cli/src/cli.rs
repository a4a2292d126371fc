use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use vestry_core::models::MediaType;

/// Admin command line for the parish website content store
#[derive(Parser)]
#[command(name = "vestry")]
#[command(about = "Manage parish website content", long_about = None)]
pub struct Cli {
    /// Content store base URL (overrides the configured value)
    #[arg(long, global = true)]
    pub store_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show connection, session, and content counts
    Status,
    /// Open an admin session
    Login,
    /// Close the admin session and discard all drafts
    Logout,
    /// Weekly mass schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Prayers by language
    Prayers {
        #[command(subcommand)]
        command: PrayerCommands,
    },
    /// Media gallery
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },
    /// Announcement banner
    Announcement {
        #[command(subcommand)]
        command: AnnouncementCommands,
    },
    /// Spiritual message
    Message {
        #[command(subcommand)]
        command: MessageCommands,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// List the published schedule
    List,
    /// Edit the staged add-form draft
    Draft {
        /// Day of the week (Sunday..Saturday)
        #[arg(long)]
        day: Option<String>,
        /// Clock time, e.g. 06:30
        #[arg(long)]
        time: Option<String>,
        /// Service type, e.g. "Telugu Mass"
        #[arg(long)]
        service: Option<String>,
    },
    /// Submit the staged draft as a new timing
    Add,
    /// Discard the staged draft
    Discard,
}

#[derive(Subcommand)]
pub enum PrayerCommands {
    /// List prayers in one language
    List {
        /// Language to filter by (exact match)
        #[arg(long, default_value = "Telugu")]
        language: String,
    },
    /// Add a prayer
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        language: String,
        #[arg(long)]
        content: String,
    },
}

#[derive(Subcommand)]
pub enum MediaCommands {
    /// List the gallery
    List,
    /// Edit the staged add-form draft
    Draft {
        /// image or video
        #[arg(long = "type")]
        media_type: Option<MediaType>,
        /// Remote link or video URL
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        caption: Option<String>,
        /// Embed a local image as an inline payload
        #[arg(long)]
        image_file: Option<PathBuf>,
    },
    /// Submit the staged draft as a new gallery item
    Add,
    /// Discard the staged draft
    Discard,
}

#[derive(Subcommand)]
pub enum AnnouncementCommands {
    /// Show the published announcement
    Show,
    /// Edit the staged draft
    Draft {
        #[arg(long)]
        text: Option<String>,
        /// Event date, e.g. 2026-10-07
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Show the banner on the website
        #[arg(long)]
        active: bool,
        /// Hide the banner from the website
        #[arg(long, conflicts_with = "active")]
        inactive: bool,
    },
    /// Replace the draft with the saved server record
    Load,
    /// Publish the staged draft
    Publish,
    /// Discard the staged draft
    Discard,
}

#[derive(Subcommand)]
pub enum MessageCommands {
    /// Show the published message
    Show,
    /// Edit the staged draft
    Draft {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Full message text
        #[arg(long)]
        text: Option<String>,
    },
    /// Replace the draft with the saved server record
    Load,
    /// Publish the staged draft
    Publish,
    /// Discard the staged draft
    Discard,
}
