use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use clap::{Args, Parser, Subcommand};
use gazette_core::{ArticleId, DayOffset, EngagementList, MemberId};
use gazette_engagement::{RandomPageBound, SamplingMode, ViewLabels};

/// Engagement tracking and daily view reports
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub cmd: OptsCmd,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory holding the database
    #[arg(env = "GAZETTE_DATA_DIR", long)]
    pub data_dir: Option<PathBuf>,

    /// Which view events are counted: `alternate`, `all` or `ratio:<p>`
    #[arg(env = "GAZETTE_SAMPLING", long, default_value = "alternate")]
    pub sampling: SamplingMode,

    /// UTC offset (whole hours) at which reporting days start
    #[arg(env = "GAZETTE_UTC_OFFSET", long, default_value = "7", allow_hyphen_values = true)]
    pub utc_offset: DayOffset,

    /// Range random pages are drawn from: `exclude-last` or `full`
    #[arg(env = "GAZETTE_RANDOM_PAGE_BOUND", long, default_value = "exclude-last")]
    pub random_page_bound: RandomPageBound,

    /// What a view is counted under in reports: `article-id` or `labels`
    #[arg(env = "GAZETTE_VIEW_LABELS", long, default_value = "article-id")]
    pub view_labels: ViewLabels,
}

static PROJECTS_DIR: LazyLock<Option<directories::ProjectDirs>> =
    LazyLock::new(|| directories::ProjectDirs::from("org", "Gazette", "gazette"));

impl GlobalOpts {
    /// `None` if not given and no default location could be determined
    pub fn data_dir(&self) -> Option<&Path> {
        if let Some(data_dir) = self.data_dir.as_deref() {
            return Some(data_dir);
        }
        let dirs = PROJECTS_DIR.as_ref()?;
        Some(dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir()))
    }
}

#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// Manage members
    #[command(subcommand)]
    Member(MemberCmd),

    /// Manage articles
    #[command(subcommand)]
    Article(ArticleCmd),

    /// Add an article to a member's saved list
    Save {
        #[arg(long)]
        member: MemberId,
        article: ArticleId,
    },

    /// Remove an article from a member's saved list
    Unsave {
        #[arg(long)]
        member: MemberId,
        article: ArticleId,
    },

    /// Record a view of an article, optionally by a member
    View {
        #[arg(long)]
        member: Option<MemberId>,
        article: ArticleId,
    },

    /// Show all engagement lists of a member
    Engagement { member: MemberId },

    /// Page through one of a member's engagement lists
    List {
        member: MemberId,
        /// `saved`, `viewed` or `published`
        #[arg(long, default_value = "saved")]
        list: EngagementList,
        #[command(flatten)]
        page: PageOpts,
    },

    /// Page through articles given by id
    Resolve {
        ids: Vec<ArticleId>,
        #[command(flatten)]
        page: PageOpts,
        /// Keep the order of the ids instead of newest first
        #[arg(long)]
        requested_order: bool,
    },

    /// A random page of articles
    Random {
        #[arg(long, default_value = "10")]
        size: u32,
    },

    /// Daily view reports
    #[command(subcommand)]
    Report(ReportCmd),

    /// Development and debugging commands
    #[command(subcommand)]
    Dev(DevCmd),
}

#[derive(Debug, Args)]
pub struct PageOpts {
    /// Page number, starting from 1
    #[arg(long, default_value = "1")]
    pub page: u32,
    #[arg(long, default_value = "10")]
    pub size: u32,
}

#[derive(Debug, Subcommand)]
pub enum MemberCmd {
    /// Register a member, with a random id unless one is given
    Add { member: Option<MemberId> },
}

#[derive(Debug, Subcommand)]
pub enum ArticleCmd {
    /// Store a new article and add it to the author's published list
    Publish {
        #[arg(long)]
        author: MemberId,
        #[arg(long)]
        title: String,
        #[arg(long = "topic")]
        topics: Vec<String>,
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Publication time in unix seconds, now if not given
        #[arg(long)]
        published: Option<u64>,
        /// Random if not given
        #[arg(long)]
        id: Option<ArticleId>,
    },
    /// Show a stored article
    Show { article: ArticleId },
}

#[derive(Debug, Subcommand)]
pub enum ReportCmd {
    /// The view report of one day
    Show {
        /// Any unix timestamp within the day, now if not given
        #[arg(long)]
        at: Option<u64>,
    },
    /// View reports of all days between two timestamps, inclusive
    Range {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum DevCmd {
    /// Print all records of a database table as JSON
    DbDump { table: String },
}
