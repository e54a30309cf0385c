use asura_htxt::{write::Layout, Container, HtxtReader, Record};
use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    path::{Path, PathBuf},
};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    #[default]
    Symantic,
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, String, Vec<Change>, Vec<Change>),
}

impl Change {
    fn modified(key: &str, value: &str) -> Change {
        Change::Modified(key.into(), value.into(), Vec::new(), Vec::new())
    }

    pub fn with_children(&mut self, children: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, vec, _) => {
                children.into_iter().for_each(|c| vec.push(c));
                vec.sort();
                Ok(())
            }
            _ => Err(miette!("tried to add children to an addition or removal")),
        }
    }

    pub fn with_related(&mut self, related: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, _, vec) => {
                related.into_iter().for_each(|c| vec.push(c));
                Ok(())
            }
            _ => Err(miette!("tried to add related to an addition or removal")),
        }
    }

    /// Position of the variant when sorting, so each kind forms one block
    fn rank(&self) -> u8 {
        match self {
            Change::Comparison(..) => 0,
            Change::Context(_) => 1,
            Change::Added(..) => 2,
            Change::Removed(..) => 3,
            Change::Modified(..) => 4,
        }
    }

    fn heading(&self) -> Option<String> {
        match self {
            Change::Added(key, _) => Some(format!("* {} added:", key)),
            Change::Removed(key, _) => Some(format!("* {} removed:", key)),
            Change::Modified(key, ..) => Some(format!("* {} modified:", key)),
            _ => None,
        }
    }
}

impl Ord for Change {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_value = match (self, other) {
            (Change::Added(key, value), Change::Added(other_key, other_value))
            | (Change::Removed(key, value), Change::Removed(other_key, other_value))
            | (Change::Modified(key, value, ..), Change::Modified(other_key, other_value, ..)) => {
                key.cmp(other_key).then(value.cmp(other_value))
            }
            (Change::Comparison(key, ..), Change::Comparison(other_key, ..)) => key.cmp(other_key),
            _ => Ordering::Equal,
        };

        self.rank().cmp(&other.rank()).then(by_value)
    }
}

impl PartialOrd for Change {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {}", l)).join("\n")
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(_, v) => write!(f, "✅ {}", v.green()),
            Change::Removed(_, v) => write!(f, "❌ {}", v.red()),
            Change::Comparison(key, old, new) => {
                write!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(values) => write!(f, "{}", values.iter().join("\n")),
            Change::Modified(_, v, children, related) => {
                write!(f, "🔃 {}", v.blue())?;
                for c in related.iter().filter(|c| !c.to_string().trim().is_empty()) {
                    write!(f, "\n{}", indent(&c.to_string()))?;
                }

                for (heading, group) in &children.iter().chunk_by(|c| c.heading()) {
                    if let Some(heading) = heading {
                        write!(f, "\n{}", indent(&heading))?;
                    }
                    for c in group {
                        write!(f, "\n{}", indent(&indent(&c.to_string())))?;
                    }
                }

                Ok(())
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input HTXT file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input HTXT file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t=Mode::Symantic)]
    mode: Mode,
}

fn comparison<T: PartialEq + Display>(key: &str, left: T, right: T) -> Option<Change> {
    (left != right).then(|| Change::Comparison(key.into(), left.to_string(), right.to_string()))
}

fn hex(value: u32) -> String {
    format!("{:08x}", value)
}

/// Index records by name, the first record wins when a name repeats
fn by_name(htxt: &Container) -> BTreeMap<&str, &Record> {
    let mut map = BTreeMap::new();
    for record in htxt.iter() {
        map.entry(record.name.as_str()).or_insert(record);
    }
    map
}

impl DiffArgs {
    fn inline_changes(&self, old: &str, new: &str) -> Vec<String> {
        let mut comparison = Vec::new();
        if self.mode != Mode::Full {
            return comparison;
        }

        let diff = TextDiff::from_chars(old, new);

        for op in diff.ops().iter() {
            for change in diff.iter_inline_changes(op) {
                let mut context = String::new();
                for (emphasized, value) in change.iter_strings_lossy() {
                    if emphasized {
                        if change.tag() == ChangeTag::Insert {
                            context.push_str(&format!("{}", value.green().underline()));
                        } else {
                            context.push_str(&format!("{}", value.red().underline()));
                        }
                    } else {
                        context.push_str(&format!("{}", value.dimmed()));
                    }
                }
                comparison.push(context);
            }
        }

        comparison
    }

    fn handle_record(&self, left: &Record, right: &Record) -> Option<Change> {
        let mut related = Vec::new();
        related.extend(comparison(
            "magic number",
            hex(left.magic_number),
            hex(right.magic_number),
        ));

        if left.text != right.text {
            related.push(Change::Context(self.inline_changes(&left.text, &right.text)));
        }

        if related.is_empty() {
            return None;
        }

        Some(Change::Modified(
            "records".into(),
            left.name.clone(),
            Vec::new(),
            related,
        ))
    }

    fn handle_htxt(&self, name: &str, left: &Container, right: &Container) -> Result<Option<Change>> {
        let mut result: Option<Change> = None;

        let mut related: Vec<Change> = [
            comparison("records", left.len(), right.len()),
            comparison("magic number", hex(left.magic_number), hex(right.magic_number)),
            comparison("language id", hex(left.language_id), hex(right.language_id)),
            comparison("file name", &left.file_name, &right.file_name),
        ]
        .into_iter()
        .flatten()
        .collect();

        if self.mode == Mode::Full {
            let layout_left = Layout::compute(left)?;
            let layout_right = Layout::compute(right)?;
            related.extend(
                [
                    comparison("text size", layout_left.text_size, layout_right.text_size),
                    comparison("names size", layout_left.name_size, layout_right.name_size),
                    comparison(
                        "content size",
                        layout_left.content_size,
                        layout_right.content_size,
                    ),
                ]
                .into_iter()
                .flatten(),
            );
        }

        if !related.is_empty() {
            result
                .get_or_insert(Change::modified("htxt", name))
                .with_related(related)?;
        }

        let left_records = by_name(left);
        let right_records = by_name(right);
        let all_names = left_records
            .keys()
            .chain(right_records.keys())
            .copied()
            .collect::<BTreeSet<_>>();

        let mut children = Vec::new();
        for record in all_names {
            match (left_records.get(record), right_records.get(record)) {
                (None, Some(_)) => children.push(Change::Added("records".into(), record.into())),
                (Some(_), None) => children.push(Change::Removed("records".into(), record.into())),
                (Some(l), Some(r)) => children.extend(self.handle_record(l, r)),
                (None, None) => {}
            }
        }

        if !children.is_empty() {
            result
                .get_or_insert(Change::modified("htxt", name))
                .with_children(children)?;
        }

        Ok(result)
    }

    fn load(path: &Path) -> Result<Container> {
        let data = std::fs::read(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;

        HtxtReader::from_bytes(&data).context(format!("decoding {}", path.display()))
    }

    pub fn handle(&self) -> Result<()> {
        let left = Self::load(&self.left)?;
        let right = Self::load(&self.right)?;

        let difference = self.handle_htxt(&self.left.to_string_lossy(), &left, &right)?;

        if let Some(d) = difference {
            println!("{}", d);
        }

        Ok(())
    }
}
