use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use storefront_editor::{write_template_file, Template, DEFAULT_CONFIG_NAME};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template .json file or directory of templates
    pub input: PathBuf,

    /// Rewrite templates whose block order can be repaired
    #[arg(long)]
    pub fix: bool,

    /// Only print problems
    #[arg(short, long)]
    pub quiet: bool,
}

/// Outcome for one template file
#[derive(Debug, PartialEq, Eq)]
enum FileStatus {
    Valid,
    Fixed,
    Invalid,
}

pub async fn validate(args: ValidateArgs) -> Result<()> {
    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        find_template_files(&args.input)
    } else {
        bail!("Input path does not exist: {}", args.input.display());
    };

    if !args.quiet {
        println!("🔍 {} {} template file(s)", "Validating".green().bold(), files.len());
        println!();
    }

    let mut invalid = 0;
    let mut fixed = 0;
    for file in &files {
        match validate_file(file, args.fix, args.quiet).await? {
            FileStatus::Valid => {}
            FileStatus::Fixed => fixed += 1,
            FileStatus::Invalid => invalid += 1,
        }
    }

    if !args.quiet {
        println!();
        println!("   Files checked: {}", files.len());
        if fixed > 0 {
            println!("   {} {}", "Fixed:".yellow(), fixed);
        }
    }

    if invalid > 0 {
        bail!("{} template(s) failed validation", invalid);
    }
    if !args.quiet {
        println!("   {} No issues found!", "✓".green());
    }
    Ok(())
}

async fn validate_file(path: &Path, fix: bool, quiet: bool) -> Result<FileStatus> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let template: Template = match serde_json::from_str(&source) {
        Ok(template) => template,
        Err(err) => {
            eprintln!("{} {}: {}", "✗".red(), path.display(), err);
            return Ok(FileStatus::Invalid);
        }
    };

    let violations = match template.validate() {
        Ok(()) => {
            if !quiet {
                println!("{} {} ({} blocks)", "✓".green(), path.display(), template.block_count());
            }
            return Ok(FileStatus::Valid);
        }
        Err(violations) => violations,
    };

    if fix {
        let normalized = template.normalized();
        if normalized.validate().is_ok() {
            write_template_file(path, &normalized).await?;
            println!("{} {} (block order repaired)", "✓".yellow(), path.display());
            return Ok(FileStatus::Fixed);
        }
    }

    eprintln!("{} {}", "✗".red(), path.display());
    for violation in violations {
        eprintln!("    {}", violation);
    }
    Ok(FileStatus::Invalid)
}

fn find_template_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| path.file_name().is_some_and(|name| name != DEFAULT_CONFIG_NAME))
        .collect();
    files.sort();
    files
}
