//! # CLI Dispatch
//!
//! This module is **one possible UI client** for farmchainx. It is the only place
//! that reads stdin, writes to stdout, prompts, and decides the data directory.
//!
//! Every role subcommand opens that role's store through [`FarmchainxApi`], runs
//! one operation, and prints the outcome. Selection is not kept between
//! invocations, so commands that act on a record take its id explicitly.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory and builds the API
//! - `handle_*()`: Per-role handlers; `handle_common()` serves the subcommands
//!   every role shares

use super::render::{
    print_messages, render_config, render_list, render_log, render_stats, ListRow, StatLines,
};
use super::setup::{
    init_logging, AdminCommands, Cli, Commands, CommonCommands, ConsumerCommands, CropFields,
    DistributorCommands, FarmerCommands, InventoryFields, RetailerCommands, ShipmentFields,
};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use farmchainx::api::FarmchainxApi;
use farmchainx::commands::{alerts, config::ConfigAction, export, qr, verify, CmdMessage};
use farmchainx::config::FarmchainxConfig;
use farmchainx::error::{FarmError, Result};
use farmchainx::model::Record;
use farmchainx::record_store::RecordStore;
use farmchainx::roles::admin::{UserDraft, UserPatch, UserStatus};
use farmchainx::roles::distributor::{ShipmentDraft, ShipmentPatch, ShipmentStatus};
use farmchainx::roles::farmer::{CropDraft, CropPatch};
use farmchainx::roles::retailer::{InventoryDraft, InventoryPatch, StockStatus};
use farmchainx::store::fs::FileStore;
use farmchainx::store::KeyValueStore;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

struct AppContext {
    api: FarmchainxApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Farmer { command } => handle_farmer(&ctx, command),
        Commands::Distributor { command } => handle_distributor(&ctx, command),
        Commands::Retailer { command } => handle_retailer(&ctx, command),
        Commands::Consumer { command } => handle_consumer(&ctx, command),
        Commands::Admin { command } => handle_admin(&ctx, command),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

/// `--data-dir`, then `$FARMCHAINX_HOME`, then the platform data directory.
fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os("FARMCHAINX_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "farmchainx", "farmchainx")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            FarmError::Config("Could not determine a data directory, pass --data-dir".to_string())
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    debug!(dir = %data_dir.display(), "Using data directory");

    let config = FarmchainxConfig::load(&data_dir)?;
    let storage = FileStore::new(data_dir.clone());

    Ok(AppContext {
        api: FarmchainxApi::new(storage, config, data_dir),
    })
}

fn handle_common<R, S>(mut store: RecordStore<R, S>, cmd: CommonCommands) -> Result<()>
where
    R: ListRow,
    R::Stats: StatLines,
    S: KeyValueStore,
{
    match cmd {
        CommonCommands::List { search } => {
            let rows: Vec<&R> = store.query(search.as_deref().unwrap_or("")).collect();
            let empty = if search.is_some() {
                "No matching records."
            } else {
                "No records yet."
            };
            print!(
                "{}",
                render_list(&rows, Utc::now(), store.thresholds(), empty)
            );
        }
        CommonCommands::Stats => print!("{}", render_stats(&store.aggregate())),
        CommonCommands::Delete { id, yes } => {
            let label = store
                .get(&id)
                .map(|r| r.title())
                .ok_or_else(|| FarmError::NotFound(id.clone()))?;
            if !yes && !confirm(&format!("Delete {} {}?", id, label))? {
                println!("Aborted.");
                return Ok(());
            }
            store.delete(&id)?;
            print_messages(&[CmdMessage::success(format!("Deleted {}", id))]);
            warn_unsaved(&store);
        }
        CommonCommands::Export { id, out } => {
            let result = export::run(&mut store, id.as_deref(), &out, Utc::now())?;
            print_messages(&result.messages);
        }
        CommonCommands::Log => print!("{}", render_log(store.log().entries())),
    }
    Ok(())
}

fn handle_farmer(ctx: &AppContext, cmd: FarmerCommands) -> Result<()> {
    let mut store = ctx.api.farmer();
    match cmd {
        FarmerCommands::Common(common) => return handle_common(store, common),
        FarmerCommands::Add { name, fields } => {
            let crop = store.create(crop_draft(name, fields))?;
            print_messages(&[CmdMessage::success(format!(
                "Registered {} {} ({})",
                crop.id, crop.name, crop.quantity
            ))]);
        }
        FarmerCommands::Edit { id, name, fields } => {
            let crop = store.update(&id, crop_patch(name, fields))?;
            print_messages(&[CmdMessage::success(format!("Updated {} {}", crop.id, crop.name))]);
        }
        FarmerCommands::Status { id, status } => {
            let crop = store.set_status(Some(&id), status)?;
            print_messages(&[CmdMessage::success(format!(
                "{} {} is now {}",
                crop.id, crop.name, crop.status
            ))]);
        }
        FarmerCommands::Qr { id } => {
            let payload = qr::payload(&store, Some(&id))?;
            println!("{}", payload.to_json()?);
            return Ok(());
        }
    }
    warn_unsaved(&store);
    Ok(())
}

fn crop_draft(name: String, fields: CropFields) -> CropDraft {
    CropDraft {
        name,
        description: fields.description.unwrap_or_default(),
        crop_type: fields.crop_type.unwrap_or_default(),
        quantity: fields.quantity.unwrap_or_default(),
        quality: fields.quality.unwrap_or_default(),
        harvest_date: fields.harvest_date,
        farm_location: fields.location.unwrap_or_default(),
    }
}

fn crop_patch(name: Option<String>, fields: CropFields) -> CropPatch {
    CropPatch {
        name,
        description: fields.description,
        crop_type: fields.crop_type,
        quantity: fields.quantity,
        quality: fields.quality,
        harvest_date: fields.harvest_date,
        farm_location: fields.location,
    }
}

fn handle_distributor(ctx: &AppContext, cmd: DistributorCommands) -> Result<()> {
    let mut store = ctx.api.distributor();
    match cmd {
        DistributorCommands::Common(common) => return handle_common(store, common),
        DistributorCommands::Add { fields } => {
            let shipment = store.create(shipment_draft(fields))?;
            print_messages(&[CmdMessage::success(format!(
                "Created shipment {} for batch {}",
                shipment.id, shipment.batch_id
            ))]);
        }
        DistributorCommands::Edit { id, fields } => {
            let shipment = store.update(&id, shipment_patch(fields))?;
            print_messages(&[CmdMessage::success(format!("Updated shipment {}", shipment.id))]);
        }
        DistributorCommands::Deliver { id } => {
            let shipment = store.set_status(Some(&id), ShipmentStatus::Delivered)?;
            print_messages(&[CmdMessage::success(format!(
                "Shipment {} delivered to {}",
                shipment.id, shipment.destination
            ))]);
        }
        DistributorCommands::Alerts => {
            let result = alerts::delayed_shipments(&store, Utc::now());
            print_messages(&result.messages);
            return Ok(());
        }
    }
    warn_unsaved(&store);
    Ok(())
}

fn shipment_draft(fields: ShipmentFields) -> ShipmentDraft {
    ShipmentDraft {
        batch_id: fields.batch_id.unwrap_or_default(),
        crop_name: fields.crop_name.unwrap_or_default(),
        origin: fields.origin.unwrap_or_default(),
        destination: fields.destination.unwrap_or_default(),
        vehicle_no: fields.vehicle.unwrap_or_default(),
        driver_name: fields.driver.unwrap_or_default(),
        expected_date: fields.expected,
    }
}

fn shipment_patch(fields: ShipmentFields) -> ShipmentPatch {
    ShipmentPatch {
        batch_id: fields.batch_id,
        crop_name: fields.crop_name,
        origin: fields.origin,
        destination: fields.destination,
        vehicle_no: fields.vehicle,
        driver_name: fields.driver,
        expected_date: fields.expected,
    }
}

fn handle_retailer(ctx: &AppContext, cmd: RetailerCommands) -> Result<()> {
    let mut store = ctx.api.retailer();
    match cmd {
        RetailerCommands::Common(common) => return handle_common(store, common),
        RetailerCommands::Add { name, fields } => {
            let item = store.create(InventoryDraft {
                name,
                item_type: fields.item_type.unwrap_or_default(),
                quantity: fields.quantity,
                price: fields.price,
                quality: fields.quality.unwrap_or_default(),
                received_date: fields.received,
                expiry_date: fields.expiry,
            })?;
            print_messages(&[CmdMessage::success(format!(
                "Added {} {} to inventory",
                item.id, item.name
            ))]);
        }
        RetailerCommands::Edit { id, name, fields } => {
            let item = store.update(
                &id,
                InventoryPatch {
                    name,
                    item_type: fields.item_type,
                    quantity: fields.quantity,
                    price: fields.price,
                    quality: fields.quality,
                    received_date: fields.received,
                    expiry_date: fields.expiry,
                },
            )?;
            print_messages(&[CmdMessage::success(format!("Updated {} {}", item.id, item.name))]);
        }
        RetailerCommands::SoldOut { id } => {
            let item = store.set_status(Some(&id), StockStatus::SoldOut)?;
            print_messages(&[CmdMessage::success(format!(
                "{} {} marked {}",
                item.id, item.name, item.status
            ))]);
        }
        RetailerCommands::Alerts => {
            let result = alerts::inventory(&store, Utc::now());
            print_messages(&result.messages);
            return Ok(());
        }
    }
    warn_unsaved(&store);
    Ok(())
}

fn handle_consumer(ctx: &AppContext, cmd: ConsumerCommands) -> Result<()> {
    let mut products = ctx.api.verified_products();
    match cmd {
        ConsumerCommands::Common(common) => handle_common(products, common),
        ConsumerCommands::Verify { payload } => {
            let raw = if payload == "-" {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                payload
            };
            let result = verify::verify(&mut products, &raw, Utc::now())?;
            print_messages(&result.messages);
            warn_unsaved(&products);
            Ok(())
        }
        ConsumerCommands::Feedback {
            product,
            rating,
            comment,
        } => {
            products.select(&product)?;
            let mut feedback = ctx.api.feedback();
            let result =
                verify::submit_feedback(&products, &mut feedback, rating, &comment, Utc::now())?;
            print_messages(&result.messages);
            warn_unsaved(&feedback);
            Ok(())
        }
        ConsumerCommands::FeedbackList => {
            let feedback = ctx.api.feedback();
            let rows: Vec<_> = feedback.records().iter().collect();
            print!(
                "{}",
                render_list(&rows, Utc::now(), feedback.thresholds(), "No feedback yet.")
            );
            if !rows.is_empty() {
                println!();
                print!("{}", render_stats(&feedback.aggregate()));
            }
            Ok(())
        }
    }
}

fn handle_admin(ctx: &AppContext, cmd: AdminCommands) -> Result<()> {
    let mut store = ctx.api.admin();
    match cmd {
        AdminCommands::Common(common) => return handle_common(store, common),
        AdminCommands::Add { name, email, role } => {
            let user = store.create(UserDraft { name, email, role })?;
            print_messages(&[CmdMessage::success(format!(
                "Added {} {} as {}, pending approval",
                user.id, user.email, user.role
            ))]);
        }
        AdminCommands::Edit {
            id,
            name,
            email,
            role,
            approved,
        } => {
            let user = store.update(
                &id,
                UserPatch {
                    name,
                    email,
                    role,
                    approved,
                },
            )?;
            print_messages(&[CmdMessage::success(format!("Updated {} {}", user.id, user.email))]);
        }
        AdminCommands::Approve { id } => {
            let user = store.set_status(Some(&id), UserStatus::Approved)?;
            print_messages(&[CmdMessage::success(format!("Approved {} {}", user.id, user.email))]);
        }
        AdminCommands::ClearLog => {
            store.clear_log("Activity log cleared");
            print_messages(&[CmdMessage::success("Activity log cleared")]);
        }
    }
    warn_unsaved(&store);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.clone(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.configure(action)?;
    if key.is_none() {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}

/// In-memory changes that could not be written are lost when the process exits.
fn warn_unsaved<R: Record, S: KeyValueStore>(store: &RecordStore<R, S>) {
    if store.persist_failures() > 0 {
        eprintln!(
            "{}",
            "Warning: changes could not be saved and will be lost.".yellow()
        );
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes"))
}
