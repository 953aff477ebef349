use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use storefront_editor::{read_template_file, BlockRegistry, Template};

#[derive(Args, Debug)]
pub struct BlocksArgs {
    /// Template file whose blocks to list; lists block types when omitted
    pub template: Option<PathBuf>,

    /// Only list this page
    #[arg(short, long)]
    pub page: Option<String>,
}

pub async fn blocks(args: BlocksArgs) -> Result<()> {
    let registry = BlockRegistry::builtin();

    match &args.template {
        None => {
            print_block_types(&registry);
            Ok(())
        }
        Some(path) => {
            let template = read_template_file(path).await?;
            print_pages(&template, &registry, args.page.as_deref())
        }
    }
}

fn print_block_types(registry: &BlockRegistry) {
    println!("{} ({} types)", "Block types".bright_blue().bold(), registry.len());
    for block_type in registry.block_types() {
        let capability = registry.resolve(block_type);
        let editor = if capability.has_editor {
            "editor".green()
        } else {
            "no editor".yellow()
        };
        println!("  {:<16} {:<20} {}", block_type.as_str(), capability.label, editor);
    }
}

fn print_pages(template: &Template, registry: &BlockRegistry, only: Option<&str>) -> Result<()> {
    let pages: Vec<&str> = match only {
        Some(page) if template.has_page(page) => vec![page],
        Some(page) => bail!("Template '{}' has no page '{}'", template.id, page),
        None => template.page_names().collect(),
    };

    println!("{} {}", template.name.bright_white().bold(), format!("({})", template.id).dimmed());
    for page in pages {
        let blocks = template.sorted_blocks(page).unwrap_or_default();
        println!();
        println!("  {} {}", page.bright_blue().bold(), format!("{} block(s)", blocks.len()).dimmed());
        for block in blocks {
            let tag = if registry.is_registered(&block.block_type) {
                block.block_type.as_str().normal()
            } else {
                block.block_type.as_str().red()
            };
            println!("    {:>3}  {:<16} {}", block.order, tag, block.id.dimmed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_editor::{Block, BlockType, Content};

    #[test]
    fn test_unknown_page_is_an_error() {
        let template = Template::new("tpl", "Shop").with_page(
            "home",
            vec![Block::new("a", BlockType::Custom("marquee".to_string()), Content::new(), 0)],
        );
        let registry = BlockRegistry::builtin();

        assert!(print_pages(&template, &registry, Some("home")).is_ok());
        assert!(print_pages(&template, &registry, None).is_ok());
        assert!(print_pages(&template, &registry, Some("blog")).is_err());
    }
}
