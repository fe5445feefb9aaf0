// Plain directory listing, no code semantics.

/// A file or directory in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub name: String,
    pub is_dir: bool,
    pub children: Vec<DirNode>,
}

impl DirNode {
    pub fn root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
            children: Vec::new(),
        }
    }

    /// Insert a `/`-separated relative path. Intermediate parts are directories.
    pub fn insert(&mut self, rel_path: &str, is_dir: bool) {
        let parts: Vec<&str> = rel_path
            .split(['/', '\\'])
            .filter(|p| !p.is_empty() && *p != ".")
            .collect();
        let mut current = self;
        for (i, part) in parts.iter().enumerate() {
            let last = i == parts.len() - 1;
            let pos = match current.children.iter().position(|c| c.name == *part) {
                Some(pos) => pos,
                None => {
                    current.children.push(DirNode {
                        name: part.to_string(),
                        is_dir: !last || is_dir,
                        children: Vec::new(),
                    });
                    current.children.len() - 1
                }
            };
            current = &mut current.children[pos];
        }
    }

    /// Directories first, then by name, recursively.
    pub fn sort(&mut self) {
        self.children
            .sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
        for child in &mut self.children {
            child.sort();
        }
    }

    /// Render with box-drawing connectors. The root line has no connector.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.display_name());
        out.push('\n');
        render_children(&self.children, "", &mut out);
        out
    }

    fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

fn render_children(children: &[DirNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i == children.len() - 1;
        let (connector, extension) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&child.display_name());
        out.push('\n');
        render_children(&child.children, &format!("{}{}", prefix, extension), out);
    }
}
