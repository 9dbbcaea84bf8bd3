//! Tree command - print a project's file tree

use super::project::resolve;
use crate::config::LivecraftHome;
use anyhow::Result;
use colored::Colorize;
use livecraft_core::build_file_tree;
use livecraft_types::FileNode;

pub async fn run(project: Option<&str>) -> Result<()> {
    let store = LivecraftHome::project_store()?;
    let project = resolve(&store, project).await?;

    println!("{}", project.name.cyan().bold());
    print!("{}", render_tree(&build_file_tree(&project.files)));
    Ok(())
}

/// ASCII rendering, folders suffixed with `/`
pub fn render_tree(nodes: &[FileNode]) -> String {
    let mut out = String::new();
    render_level(nodes, "", &mut out);
    out
}

fn render_level(nodes: &[FileNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let suffix = if node.is_folder() { "/" } else { "" };
        out.push_str(&format!("{}{}{}{}\n", prefix, branch, node.name, suffix));

        if node.is_folder() {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            render_level(node.children(), &child_prefix, out);
        }
    }
}
