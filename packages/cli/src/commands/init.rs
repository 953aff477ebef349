use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use storefront_editor::{
    write_template_file, BlockRegistry, BlockType, Edit, EditorConfig, EditorSession, StoreContext, Template,
    DEFAULT_CONFIG_NAME,
};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Also create a starter template with this id
    #[arg(short, long)]
    pub template: Option<String>,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub async fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = EditorConfig::path_in(cwd);

    if config_path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), DEFAULT_CONFIG_NAME.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing storefront project...".bright_blue().bold());

    let config_json = serde_json::to_string_pretty(&EditorConfig::default())?;
    tokio::fs::write(&config_path, config_json).await?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if let Some(template_id) = &args.template {
        let path = cwd.join(format!("{}.json", template_id));
        if path.exists() && !args.force {
            println!("  {} {} already exists, skipping", "⚠️".yellow(), path.display());
        } else {
            let template = starter_template(template_id);
            write_template_file(&path, &template).await?;
            println!("  {} Created {}", "✓".green(), path.display());
        }
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: storefront blocks");
    println!("  2. Run: storefront add <template.json> home hero");

    Ok(())
}

/// Empty home/product/cart pages, with header and footer on home
fn starter_template(template_id: &str) -> Template {
    let template = Template::new(template_id, "My Store")
        .with_page("home", vec![])
        .with_page("product", vec![])
        .with_page("cart", vec![]);

    let mut session = EditorSession::new(
        StoreContext::new("local"),
        template,
        Arc::new(BlockRegistry::builtin()),
        &EditorConfig::default(),
    );
    for block_type in [BlockType::Header, BlockType::Footer] {
        session.apply(Edit::AddBlock {
            page: "home".to_string(),
            block_type,
        });
    }
    session.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_editor::read_template_file;

    #[tokio::test]
    async fn test_init_writes_config_and_template() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            template: Some("shop".to_string()),
            force: false,
        };

        init(args, dir.path()).await.unwrap();

        assert_eq!(EditorConfig::load(dir.path()).unwrap(), EditorConfig::default());
        let template = read_template_file(&dir.path().join("shop.json")).await.unwrap();
        let types: Vec<_> = template
            .sorted_blocks("home")
            .unwrap()
            .into_iter()
            .map(|b| b.block_type)
            .collect();
        assert_eq!(types, vec![BlockType::Header, BlockType::Footer]);
        assert!(template.has_page("cart"));
    }

    #[tokio::test]
    async fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = EditorConfig::path_in(dir.path());
        std::fs::write(&path, r#"{ "historyLimit": 5 }"#).unwrap();

        init(InitArgs { template: None, force: false }, dir.path()).await.unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap().history_limit, 5);

        init(InitArgs { template: None, force: true }, dir.path()).await.unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap().history_limit, 100);
    }
}
