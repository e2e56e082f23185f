use std::collections::BTreeMap;

const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
    directory: bool,
}

impl Node {
    fn insert(&mut self, path: &str) {
        let directory = path.ends_with('/');
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.entry(segment.to_owned()).or_default();
        }
        node.directory |= directory;
    }

    fn render(&self, prefix: &str, lines: &mut Vec<String>) {
        let last = self.children.len().saturating_sub(1);
        for (i, (name, child)) in self.children.iter().enumerate() {
            let (connector, extension) = if i == last {
                (CORNER, BLANK)
            } else {
                (BRANCH, PIPE)
            };
            let label = if child.directory || !child.children.is_empty() {
                format!("{name}/")
            } else {
                name.clone()
            };
            lines.push(format!("{prefix}{connector}{label}"));
            child.render(&format!("{prefix}{extension}"), lines);
        }
    }
}

/// Render `/`-separated paths as an indented tree, siblings in byte order.
///
/// A trailing `/` marks a directory; anything with children is drawn as one
/// too.
pub fn render<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = Node::default();
    for path in paths {
        root.insert(path.as_ref());
    }

    let mut lines = Vec::new();
    root.render("", &mut lines);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_levels_use_pipe_or_blank_indent() {
        let tree = render(["a/", "a/b.txt", "a/c/", "a/c/d.txt", "z.txt"]);
        let expected = [
            "├── a/",
            "│   ├── b.txt",
            "│   └── c/",
            "│       └── d.txt",
            "└── z.txt",
        ]
        .join("\n");
        assert_eq!(tree, expected);
    }

    #[test]
    fn implicit_parents_are_drawn_as_directories() {
        assert_eq!(render(["usr/bin/tool"]), "└── usr/\n    └── bin/\n        └── tool");
    }

    #[test]
    fn siblings_are_sorted_bytewise() {
        assert_eq!(render(["b", "B", "a"]), "├── B\n├── a\n└── b");
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(Vec::<String>::new()), "");
    }
}
