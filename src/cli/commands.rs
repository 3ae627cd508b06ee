use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lec", about = concat!("[>] lectern v", env!("CARGO_PKG_VERSION"), " - keep track of what you read"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different library directory
    #[arg(short = 'C', long = "library-dir", global = true)]
    pub library_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new library in the current directory
    Init(InitArgs),
    /// List materials (filtered, searched, sorted, paginated)
    List(ListArgs),
    /// Show one material
    Show(IdArg),
    /// Add a material
    Add(AddArgs),
    /// Edit fields of a material
    Edit(EditArgs),
    /// Set a material's status
    Status(StatusArgs),
    /// Set or step a material's progress (40, +10, -5)
    Progress(ProgressArgs),
    /// Run the status-dependent quick action (Start, Continue, Review, Resume)
    Quick(IdArg),
    /// Permanently delete a material
    Delete(DeleteArgs),
    /// Show counts by status
    Stats,
    /// Stats, currently reading and pending tasks
    Dashboard,
    /// List subjects with material counts
    Subjects,
    /// Add or remove a subject
    Subject(SubjectCmd),
    /// Show or set the page size
    PageSize(PageSizeArgs),
    /// Study notes
    Note(NoteCmd),
    /// Study tasks
    Task(TaskCmd),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Library name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Rewrite lectern.toml even if the library exists (data is kept)
    #[arg(long)]
    pub force: bool,
    /// Seed a few sample books, notes and tasks
    #[arg(long)]
    pub sample: bool,
}

// ---------------------------------------------------------------------------
// Material args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Material id (or a unique prefix of it)
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (all, to-read, reading, completed, paused)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by subject
    #[arg(long)]
    pub subject: Option<String>,
    /// Case-insensitive search over title, author, type, subject and notes
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Sort key (title, author, progress, dateAdded)
    #[arg(long)]
    pub sort: Option<String>,
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Page size (default: from lectern.toml)
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Show every matching material on one page
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Title
    pub title: String,
    /// Author
    #[arg(long)]
    pub author: String,
    /// Subject
    #[arg(long)]
    pub subject: String,
    /// Material type (default: Book)
    #[arg(long = "type")]
    pub material_type: Option<String>,
    /// Link or location
    #[arg(long)]
    pub link: Option<String>,
    /// Initial status (default: To Read)
    #[arg(long)]
    pub status: Option<String>,
    /// Initial progress 0-100
    #[arg(long)]
    pub progress: Option<i64>,
    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Material id (or a unique prefix of it)
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long = "type")]
    pub material_type: Option<String>,
    /// Link (empty string clears it)
    #[arg(long)]
    pub link: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub progress: Option<i64>,
    /// Notes (empty string clears them)
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Material id (or a unique prefix of it)
    pub id: String,
    /// New status (to-read, reading, completed, paused)
    pub status: String,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Material id (or a unique prefix of it)
    pub id: String,
    /// Absolute value (40) or step (+10, -5)
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Material id (or a unique prefix of it)
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Config args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubjectCmd {
    #[command(subcommand)]
    pub action: SubjectAction,
}

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject
    Add(SubjectNameArg),
    /// Remove a subject (materials keep their label)
    Rm(SubjectNameArg),
}

#[derive(Args)]
pub struct SubjectNameArg {
    pub name: String,
}

#[derive(Args)]
pub struct PageSizeArgs {
    /// New page size (omit to print the current one)
    pub size: Option<usize>,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NoteCmd {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create a note
    Add(NoteAddArgs),
    /// List notes
    List(NoteListArgs),
    /// Show a note
    Show(NoteIdArg),
    /// Change a note's title, content or tags
    Edit(NoteEditArgs),
    /// Delete a note
    Rm(NoteIdArg),
    /// Search titles, content and tags
    Search(NoteSearchArgs),
}

#[derive(Args)]
pub struct NoteAddArgs {
    pub title: String,
    #[arg(long)]
    pub subject: String,
    /// Note body (markdown)
    #[arg(long, default_value = "")]
    pub content: String,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args)]
pub struct NoteListArgs {
    /// Only notes in this subject
    #[arg(long)]
    pub subject: Option<String>,
}

#[derive(Args)]
pub struct NoteIdArg {
    /// Note id (or a unique prefix of it)
    pub id: String,
}

#[derive(Args)]
pub struct NoteEditArgs {
    /// Note id (or a unique prefix of it)
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Comma-separated tags (replaces the current set)
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args)]
pub struct NoteSearchArgs {
    pub query: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add(TaskAddArgs),
    /// List tasks (pending only unless --all)
    List(TaskListArgs),
    /// Mark a task done
    Done(TaskIdArg),
    /// Mark a task not done
    Undo(TaskIdArg),
    /// Delete a task
    Rm(TaskIdArg),
}

#[derive(Args)]
pub struct TaskAddArgs {
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Include completed tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct TaskIdArg {
    /// Task id (or a unique prefix of it)
    pub id: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
