use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storefront_editor::{
    read_template_file, write_template_file, BlockRegistry, BlockType, Edge, Edit, EditorConfig, EditorSession,
    StoreContext,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Template .json file
    pub file: PathBuf,

    /// Page to add to
    pub page: String,

    /// Block type tag (e.g. hero, products, product-detail)
    pub block_type: String,

    /// Print the result instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub file: PathBuf,

    pub page: String,

    pub block_id: String,

    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    pub file: PathBuf,

    pub page: String,

    /// Block being moved
    pub dragged_id: String,

    /// Block it is dropped on
    pub target_id: String,

    /// Side of the target to land on
    #[arg(short, long, value_enum, default_value = "top")]
    pub edge: EdgeArg,

    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    pub file: PathBuf,

    pub page: String,

    pub block_id: String,

    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeArg {
    Top,
    Bottom,
}

impl From<EdgeArg> for Edge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Top => Edge::Top,
            EdgeArg::Bottom => Edge::Bottom,
        }
    }
}

pub async fn add(args: AddArgs, cwd: &Path) -> Result<()> {
    let block_type = BlockType::parse(&args.block_type);
    if !BlockRegistry::builtin().is_registered(&block_type) {
        bail!(
            "Unknown block type '{}'. Run `storefront blocks` to list types",
            args.block_type
        );
    }

    let edit = Edit::AddBlock {
        page: args.page,
        block_type,
    };
    run_edit(&args.file, cwd, edit, args.dry_run).await
}

pub async fn delete(args: DeleteArgs, cwd: &Path) -> Result<()> {
    let edit = Edit::DeleteBlock {
        page: args.page,
        block_id: args.block_id,
    };
    run_edit(&args.file, cwd, edit, args.dry_run).await
}

pub async fn reorder(args: ReorderArgs, cwd: &Path) -> Result<()> {
    let edit = Edit::ReorderBlocks {
        page: args.page,
        dragged_id: args.dragged_id,
        target_id: args.target_id,
        edge: args.edge.into(),
    };
    run_edit(&args.file, cwd, edit, args.dry_run).await
}

pub async fn duplicate(args: DuplicateArgs, cwd: &Path) -> Result<()> {
    let edit = Edit::DuplicateBlock {
        page: args.page,
        block_id: args.block_id,
    };
    run_edit(&args.file, cwd, edit, args.dry_run).await
}

/// Apply one edit to a template file, writing it back only if it changed
async fn run_edit(file: &Path, cwd: &Path, edit: Edit, dry_run: bool) -> Result<()> {
    let changed = apply_to_file(file, cwd, edit.clone(), dry_run).await?;

    if changed {
        println!("{} {}", "✓".green(), edit.describe());
    } else {
        println!(
            "{} Nothing to do: {} (unknown page or block, or already in place)",
            "⚠️".yellow(),
            edit.describe()
        );
    }
    Ok(())
}

async fn apply_to_file(file: &Path, cwd: &Path, edit: Edit, dry_run: bool) -> Result<bool> {
    let config = EditorConfig::load(cwd)?;
    let template = read_template_file(file).await?;

    let mut session = EditorSession::new(
        StoreContext::new("local"),
        template,
        Arc::new(BlockRegistry::builtin()),
        &config,
    );
    if !session.apply(edit) {
        return Ok(false);
    }

    let template = session.close();
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&template)?);
    } else {
        write_template_file(file, &template).await?;
        info!(path = %file.display(), "Template updated");
    }
    Ok(true)
}
