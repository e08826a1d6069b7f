use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use farmchainx::model::{Grade, Role};
use farmchainx::roles::farmer::CropStatus;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Returns the version string, with the git hash appended for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

/// Routes `tracing` output to stderr. `RUST_LOG` wins; otherwise warnings only,
/// or debug with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "farmchainx=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(name = "farmchainx", bin_name = "farmchainx", version = get_version())]
#[command(
    about = "Supply-chain records for farmers, distributors, retailers, consumers and admins",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: $FARMCHAINX_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crop batches
    #[command(display_order = 1)]
    Farmer {
        #[command(subcommand)]
        command: FarmerCommands,
    },

    /// Shipments
    #[command(display_order = 2)]
    Distributor {
        #[command(subcommand)]
        command: DistributorCommands,
    },

    /// Shop inventory
    #[command(display_order = 3)]
    Retailer {
        #[command(subcommand)]
        command: RetailerCommands,
    },

    /// Verified products and feedback
    #[command(display_order = 4)]
    Consumer {
        #[command(subcommand)]
        command: ConsumerCommands,
    },

    /// Users and approvals
    #[command(display_order = 5)]
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Get or set configuration
    #[command(display_order = 6)]
    Config {
        /// Configuration key (low-stock-threshold, expiry-window-days)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Subcommands every dashboard has.
#[derive(Subcommand, Debug)]
pub enum CommonCommands {
    /// List records, newest first
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only records matching this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show summary counts
    #[command(display_order = 2)]
    Stats,

    /// Delete a record
    #[command(alias = "rm", display_order = 20)]
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export records to CSV
    #[command(display_order = 21)]
    Export {
        /// Export only this record
        #[arg(long)]
        id: Option<String>,

        /// Directory to write the file into
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },

    /// Show recent activity
    #[command(display_order = 22)]
    Log,
}

#[derive(Args, Debug)]
pub struct CropFields {
    /// Crop type, e.g. Vegetable
    #[arg(long = "type")]
    pub crop_type: Option<String>,

    /// Quantity; bare numbers are taken as kg
    #[arg(short, long)]
    pub quantity: Option<String>,

    #[arg(long)]
    pub quality: Option<Grade>,

    /// Harvest date (YYYY-MM-DD)
    #[arg(long)]
    pub harvest_date: Option<NaiveDate>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FarmerCommands {
    #[command(flatten)]
    Common(CommonCommands),

    /// Register a crop batch
    #[command(display_order = 10)]
    Add {
        name: String,

        #[command(flatten)]
        fields: CropFields,
    },

    /// Change a crop batch
    #[command(display_order = 11)]
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: CropFields,
    },

    /// Set a batch's status (pending, in-transit, approved)
    #[command(display_order = 12)]
    Status { id: String, status: CropStatus },

    /// Print the QR payload for a batch
    #[command(display_order = 13)]
    Qr { id: String },
}

#[derive(Args, Debug)]
pub struct ShipmentFields {
    /// Farmer's batch id, e.g. C101
    #[arg(long = "batch")]
    pub batch_id: Option<String>,

    #[arg(long = "crop")]
    pub crop_name: Option<String>,

    #[arg(long)]
    pub origin: Option<String>,

    #[arg(long)]
    pub destination: Option<String>,

    #[arg(long)]
    pub vehicle: Option<String>,

    #[arg(long)]
    pub driver: Option<String>,

    /// Expected delivery date (YYYY-MM-DD)
    #[arg(long)]
    pub expected: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum DistributorCommands {
    #[command(flatten)]
    Common(CommonCommands),

    /// Create a shipment
    #[command(display_order = 10)]
    Add {
        #[command(flatten)]
        fields: ShipmentFields,
    },

    /// Change a shipment
    #[command(display_order = 11)]
    Edit {
        id: String,

        #[command(flatten)]
        fields: ShipmentFields,
    },

    /// Mark a shipment delivered
    #[command(display_order = 12)]
    Deliver { id: String },

    /// Report delayed shipments
    #[command(display_order = 13)]
    Alerts,
}

#[derive(Args, Debug)]
pub struct InventoryFields {
    /// Product type, e.g. Fruit
    #[arg(long = "type")]
    pub item_type: Option<String>,

    /// Quantity in kg
    #[arg(short, long)]
    pub quantity: Option<u32>,

    /// Price per kg
    #[arg(short, long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub quality: Option<Grade>,

    /// Received date (YYYY-MM-DD)
    #[arg(long)]
    pub received: Option<NaiveDate>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expiry: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum RetailerCommands {
    #[command(flatten)]
    Common(CommonCommands),

    /// Add a product to inventory
    #[command(display_order = 10)]
    Add {
        name: String,

        #[command(flatten)]
        fields: InventoryFields,
    },

    /// Change a product
    #[command(display_order = 11)]
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: InventoryFields,
    },

    /// Mark a product sold out
    #[command(display_order = 12)]
    SoldOut { id: String },

    /// Report products expiring soon or low on stock
    #[command(display_order = 13)]
    Alerts,
}

#[derive(Subcommand, Debug)]
pub enum ConsumerCommands {
    #[command(flatten)]
    Common(CommonCommands),

    /// Verify a product from its QR payload
    #[command(display_order = 10)]
    Verify {
        /// JSON payload, or `-` to read it from stdin
        payload: String,
    },

    /// Rate a verified product
    #[command(display_order = 11)]
    Feedback {
        /// Verified product id, e.g. V1001
        product: String,

        /// 1 to 5
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long, default_value = "")]
        comment: String,
    },

    /// List submitted feedback
    #[command(display_order = 12)]
    FeedbackList,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    #[command(flatten)]
    Common(CommonCommands),

    /// Add a user (starts pending approval)
    #[command(display_order = 10)]
    Add {
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "farmer")]
        role: Role,
    },

    /// Change a user
    #[command(display_order = 11)]
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<Role>,

        #[arg(long)]
        approved: Option<bool>,
    },

    /// Approve a user
    #[command(display_order = 12)]
    Approve { id: String },

    /// Empty the activity log
    #[command(display_order = 13)]
    ClearLog,
}
