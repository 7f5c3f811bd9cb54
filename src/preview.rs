use crate::skeleton::Skeleton;
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
        }
    }
}

/// Build the directory tree from the skeleton entries, returning the root node.
fn build_tree(skeleton: &Skeleton) -> Rc<RefCell<TreeNode>> {
    let target = &skeleton.target;
    let root_name = target
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| target.display().to_string());

    let root = Rc::new(RefCell::new(TreeNode::new(root_name, false)));

    // relative path -> node; the empty path is the target root
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for entry in &skeleton.entries {
        let parent_path = entry
            .relative
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();

        // entries arrive in walk order, so a parent is always linked before its children
        let Some(parent_node) = lookup.get(&parent_path).map(Rc::clone) else {
            log::debug!(
                "parent: {}, not found for path: {}",
                parent_path.display(),
                entry.relative.display()
            );
            continue;
        };

        let child_name = entry
            .relative
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| entry.relative.display().to_string());

        let new_child = Rc::new(RefCell::new(TreeNode::new(child_name, entry.is_file())));

        parent_node
            .borrow_mut()
            .children
            .push(Rc::clone(&new_child));

        lookup.insert(entry.relative.clone(), new_child);
    }

    root
}

fn write_tree(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = if node_borrow.is_file {
        node_borrow.name.green()
    } else {
        node_borrow.name.blue()
    };
    out.push_str(&format!(
        "{}{}{}\n",
        prefix.yellow(),
        connector.yellow(),
        name
    ));

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        write_tree(out, child, &child_prefix, i == len - 1);
    }
}

/// Renders the skeleton as an ASCII tree rooted at the target directory name.
pub fn render_tree(skeleton: &Skeleton) -> String {
    let tree_root = build_tree(skeleton);

    let mut out = String::new();
    write_tree(&mut out, &tree_root, "", true);

    out
}

/// Prints what a run would create, without creating anything.
pub fn preview_as_tree(skeleton: &Skeleton) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let header = format!(
        "{} {} {}\n",
        "┌─".bold().bright_blue(),
        "Preview of".bold().bright_blue(),
        skeleton.target.display()
    );

    println!("{}", header);

    print!("{}", render_tree(skeleton));

    let footer = format!(
        "\n{} {} {}",
        "└─".bold().bright_blue(),
        skeleton.dirs().count().to_string().bright_green(),
        format!("directories, {} empty files (dry run)", skeleton.files().count()).bright_green()
    );

    println!("{}", footer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{EntryKind, SkeletonEntry};

    fn entry(relative: &str, kind: EntryKind) -> SkeletonEntry {
        SkeletonEntry {
            relative: PathBuf::from(relative),
            kind,
        }
    }

    #[test]
    fn renders_nested_tree() {
        colored::control::set_override(false);

        let mut skeleton = Skeleton::new(PathBuf::from("/data/src"), PathBuf::from("/data/out"));
        skeleton.entries = vec![
            entry("a", EntryKind::Dir),
            entry("a/one.txt", EntryKind::File),
            entry("b.txt", EntryKind::File),
        ];

        let rendered = render_tree(&skeleton);

        let expected = "\
└── out
    ├── a
    │   └── one.txt
    └── b.txt
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn renders_lone_root_for_empty_skeleton() {
        colored::control::set_override(false);

        let skeleton = Skeleton::new(PathBuf::from("src"), PathBuf::from("empty_src"));

        assert_eq!(render_tree(&skeleton), "└── empty_src\n");
    }
}
