//! Flat paths to a navigation hierarchy

use livecraft_types::{FileNode, ParsedFile};
use std::collections::BTreeMap;

#[derive(Default)]
struct DirBuilder<'a> {
    folders: BTreeMap<String, DirBuilder<'a>>,
    files: BTreeMap<String, &'a ParsedFile>,
}

impl<'a> DirBuilder<'a> {
    fn insert(&mut self, segments: &[&str], file: &'a ParsedFile) {
        match segments {
            [] => {}
            [name] => {
                self.files.insert((*name).to_string(), file);
            }
            [folder, rest @ ..] => self
                .folders
                .entry((*folder).to_string())
                .or_default()
                .insert(rest, file),
        }
    }

    fn build(self, parent: &str) -> Vec<FileNode> {
        let mut nodes = Vec::with_capacity(self.folders.len() + self.files.len());

        for (name, dir) in self.folders {
            let path = join(parent, &name);
            let children = dir.build(&path);
            nodes.push(FileNode::folder(name, path, children));
        }

        // A folder takes precedence over a file of the same name
        let folder_names: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        for (name, file) in self.files {
            if folder_names.contains(&name) {
                tracing::debug!(path = %file.path, "File shadowed by folder of the same name");
                continue;
            }
            nodes.push(FileNode::file(name, file));
        }

        nodes
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Build the navigation tree. Folders precede files at every level, each
/// group sorted by name, so the result is independent of input order.
pub fn build_file_tree(files: &[ParsedFile]) -> Vec<FileNode> {
    let mut root = DirBuilder::default();
    for file in files {
        let segments: Vec<&str> = file.path.split('/').filter(|s| !s.is_empty()).collect();
        root.insert(&segments, file);
    }
    root.build("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use livecraft_types::NodeKind;

    fn files(paths: &[&str]) -> Vec<ParsedFile> {
        paths.iter().map(|p| ParsedFile::new(*p, "")).collect()
    }

    #[test]
    fn test_folders_before_files() {
        let tree = build_file_tree(&files(&["b.ts", "a/x.ts"]));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "a");
        assert_eq!(tree[0].kind, NodeKind::Folder);
        assert_eq!(tree[0].children()[0].path, "a/x.ts");
        assert_eq!(tree[1].name, "b.ts");
        assert_eq!(tree[1].kind, NodeKind::File);
    }

    #[test]
    fn test_nested_folders_are_deduplicated() {
        let tree = build_file_tree(&files(&["src/ui/B.tsx", "src/ui/A.tsx", "src/main.ts"]));
        assert_eq!(tree.len(), 1);
        let src = &tree[0];
        assert_eq!(src.path, "src");
        let names: Vec<_> = src.children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["ui", "main.ts"]);
        let ui: Vec<_> = src.children()[0].children().iter().map(|n| n.path.as_str()).collect();
        assert_eq!(ui, vec!["src/ui/A.tsx", "src/ui/B.tsx"]);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let a = build_file_tree(&files(&["z.ts", "m/n.ts", "a.ts", "m/a.ts"]));
        let b = build_file_tree(&files(&["m/a.ts", "a.ts", "m/n.ts", "z.ts"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_that_is_also_a_folder_prefix() {
        let tree = build_file_tree(&files(&["lib", "lib/util.ts"]));
        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_folder());
        assert_eq!(tree[0].children().len(), 1);
    }

    #[test]
    fn test_file_node_carries_content() {
        let input = vec![ParsedFile::new("README.md", "# hi")];
        let tree = build_file_tree(&input);
        assert_eq!(tree[0].content.as_deref(), Some("# hi"));
    }
}
