//! Template tokenizing. Nothing here resolves or validates tag names.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
}

/// Returns the text between each `{` and the next `}`, in order, duplicates
/// included. An unterminated `{` yields nothing; a `{` inside a tag is kept as
/// part of the tag text.
pub fn extract_tags(template: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut state = ScanState::Outside;
    let mut tag = String::new();

    for ch in template.chars() {
        match state {
            ScanState::Outside => {
                if ch == '{' {
                    tag.clear();
                    state = ScanState::Inside;
                }
            }
            ScanState::Inside => {
                if ch == '}' {
                    tags.push(std::mem::take(&mut tag));
                    state = ScanState::Outside;
                } else {
                    tag.push(ch);
                }
            }
        }
    }

    tags
}

/// Drops repeated tags, keeping first-occurrence order.
pub fn distinct_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

pub fn replace_tag_in_pattern(pattern: &str, tag: &str, value: &str) -> String {
    pattern.replace(&format!("{{{tag}}}"), value)
}

/// One `Category` or `Category.Prop.Sub` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReference {
    pub name: String,
    pub properties: Vec<String>,
}

impl TagReference {
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.split('.');
        let name = segments.next().unwrap_or_default().to_string();
        Self {
            name,
            properties: segments.map(str::to_string).collect(),
        }
    }

    pub fn property(&self, depth: usize) -> Option<&str> {
        self.properties.get(depth).map(String::as_str)
    }
}

/// Splits `A.x|B.y` into its alternatives, left to right.
pub fn parse_tag_group(raw: &str) -> Vec<TagReference> {
    raw.split('|').map(TagReference::parse).collect()
}
