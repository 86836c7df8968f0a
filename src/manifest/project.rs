//! MSBuild project files (.csproj, .vbproj, .fsproj)
//!
//! The document is walked once with quick-xml's event reader. Every
//! `PackageReference` declaration remembers the byte range of its version
//! value, so an update rewrites exactly that declaration and nothing else.
//! Indentation, comments, attribute order and line endings survive a
//! rewrite.

use crate::domain::{DependencyEntry, PackageId};
use crate::error::ManifestError;
use crate::manifest::{ManifestDocument, SiblingReferences};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// name="value" or name='value' inside a start tag
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

/// One `PackageReference` and where its version text lives
#[derive(Debug, Clone)]
struct Declaration {
    entry: DependencyEntry,
    /// Byte range of the version value in the document, if it has one
    version_span: Option<Range<usize>>,
}

/// A loaded project file with staged, not yet persisted, edits
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
    content: String,
    declarations: Vec<Declaration>,
    project_references: Vec<String>,
    dirty: bool,
}

impl ProjectFile {
    /// Read and parse a project file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Self::parse(path, content)
    }

    /// Parse project text that was read from `path`
    pub fn parse(path: impl Into<PathBuf>, content: String) -> Result<Self, ManifestError> {
        let path = path.into();
        let (declarations, project_references) =
            scan(&content).map_err(|message| ManifestError::xml_parse_error(&path, message))?;

        tracing::debug!(
            path = %path.display(),
            packages = declarations.len(),
            project_references = project_references.len(),
            "parsed project"
        );

        Ok(Self {
            path,
            content,
            declarations,
            project_references,
            dirty: false,
        })
    }

    /// Current text, including staged edits
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether there are staged edits not yet written
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The project reference whose file stem matches `package`, if any
    pub fn find_project_reference(&self, package: &PackageId) -> Option<&str> {
        self.project_references
            .iter()
            .map(String::as_str)
            .find(|include| package.matches(project_stem(include)))
    }
}

/// Package reference being read between its start and end tags
struct OpenReference {
    index: usize,
    /// Where the text of a `<Version>` child starts
    version_text: Option<usize>,
}

/// Walk the document, collecting package declarations and project references
fn scan(content: &str) -> Result<(Vec<Declaration>, Vec<String>), String> {
    let xml = content.strip_prefix('\u{feff}').unwrap_or(content);
    let base = content.len() - xml.len();

    let mut reader = Reader::from_str(xml);
    let mut declarations: Vec<Declaration> = Vec::new();
    let mut project_references = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut reference: Option<OpenReference> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            format!("{} at byte {}", e, reader.error_position() as usize + base)
        })?;
        let end = reader.buffer_position() as usize;
        let in_item_group = open.last().is_some_and(|name| name.as_slice() == b"ItemGroup");

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.local_name().as_ref().to_vec();
                let start = xml[..end].rfind('<').unwrap_or(0);
                let tag = &xml[start..end];

                match name.as_slice() {
                    b"PackageReference" if in_item_group => {
                        if let Some(declaration) = package_declaration(tag, start + base)? {
                            declarations.push(declaration);
                            if !is_empty {
                                reference = Some(OpenReference {
                                    index: declarations.len() - 1,
                                    version_text: None,
                                });
                            }
                        }
                    }
                    b"ProjectReference" if in_item_group => {
                        if let Some((_, value)) = attribute(tag, "Include") {
                            project_references.push(unescape(value)?);
                        }
                    }
                    b"Version" if !is_empty => {
                        let parent_is_reference =
                            open.last().is_some_and(|n| n.as_slice() == b"PackageReference");
                        if let Some(current) = reference.as_mut().filter(|_| parent_is_reference) {
                            current.version_text = Some(end);
                        }
                    }
                    _ => {}
                }

                if !is_empty {
                    open.push(name);
                }
            }
            Event::End(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                let start = xml[..end].rfind('<').unwrap_or(end);

                match name.as_slice() {
                    b"Version" => {
                        if let Some(current) = reference.as_mut() {
                            if let Some(text_start) = current.version_text.take() {
                                let declaration = &mut declarations[current.index];
                                // the attribute form wins over the child element
                                if declaration.version_span.is_none()
                                    && declaration.entry.version.is_empty()
                                {
                                    let region = &xml[text_start..start];
                                    if region.contains('<') {
                                        tracing::debug!(
                                            package = %declaration.entry.id,
                                            "version element has markup; left untouched"
                                        );
                                    } else {
                                        let span = trimmed(xml, text_start..start);
                                        declaration.entry.version = unescape(&xml[span.clone()])?;
                                        declaration.version_span =
                                            Some(span.start + base..span.end + base);
                                    }
                                }
                            }
                        }
                    }
                    b"PackageReference" => reference = None,
                    _ => {}
                }

                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.last() {
        return Err(format!(
            "unexpected end of document inside <{}>",
            String::from_utf8_lossy(name)
        ));
    }

    Ok((declarations, project_references))
}

/// Read a `PackageReference` start tag found at `offset`
fn package_declaration(tag: &str, offset: usize) -> Result<Option<Declaration>, String> {
    // Update="..." items modify existing references; they declare nothing
    let Some((_, include)) = attribute(tag, "Include") else {
        return Ok(None);
    };
    let id = unescape(include)?;

    let (version, version_span) = match attribute(tag, "Version") {
        Some((range, _)) => {
            let span = trimmed(tag, range);
            (
                unescape(&tag[span.clone()])?,
                Some(span.start + offset..span.end + offset),
            )
        }
        None => (String::new(), None),
    };

    Ok(Some(Declaration {
        entry: DependencyEntry::new(id.trim(), version),
        version_span,
    }))
}

/// Range and raw value of the attribute `name` in a start tag
fn attribute<'t>(tag: &'t str, name: &str) -> Option<(Range<usize>, &'t str)> {
    ATTRIBUTE.captures_iter(tag).find_map(|caps| {
        if &caps[1] != name {
            return None;
        }
        let value = caps.get(2).or_else(|| caps.get(3))?;
        Some((value.range(), value.as_str()))
    })
}

/// Narrow `range` of `text` to exclude surrounding whitespace
fn trimmed(text: &str, range: Range<usize>) -> Range<usize> {
    let value = &text[range.clone()];
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return range.start..range.start;
    }
    let lead = value.len() - value.trim_start().len();
    range.start + lead..range.start + lead + trimmed.len()
}

fn unescape(raw: &str) -> Result<String, String> {
    quick_xml::escape::unescape(raw)
        .map(|value| value.into_owned())
        .map_err(|e| e.to_string())
}

/// File stem of a project reference path, accepting either separator
fn project_stem(include: &str) -> &str {
    let file_name = include
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

impl ManifestDocument for ProjectFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn dependency_entries(&self) -> Vec<DependencyEntry> {
        self.declarations.iter().map(|d| d.entry.clone()).collect()
    }

    fn apply_version(&mut self, index: usize, version: &str) -> Result<(), ManifestError> {
        let Some(declaration) = self.declarations.get(index) else {
            return Err(ManifestError::EntryNotFound {
                path: self.path.clone(),
                package: format!("#{}", index),
            });
        };
        let Some(span) = declaration.version_span.clone() else {
            return Err(ManifestError::EntryNotFound {
                path: self.path.clone(),
                package: declaration.entry.id.to_string(),
            });
        };

        let replacement = quick_xml::escape::escape(version);
        if self.content[span.clone()] != *replacement {
            self.content.replace_range(span.clone(), &replacement);
            let new_end = span.start + replacement.len();

            for other in &mut self.declarations {
                if let Some(other_span) = other.version_span.as_mut() {
                    if other_span.start >= span.end {
                        let len = other_span.len();
                        other_span.start = other_span.start - span.end + new_end;
                        other_span.end = other_span.start + len;
                    }
                }
            }
            self.declarations[index].version_span = Some(span.start..new_end);
            self.dirty = true;
        }

        self.declarations[index].entry.version = version.to_string();
        Ok(())
    }

    fn persist(&mut self) -> Result<bool, ManifestError> {
        if !self.dirty {
            return Ok(false);
        }
        fs::write(&self.path, &self.content)
            .map_err(|e| ManifestError::write_error(&self.path, e))?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "saved project");
        Ok(true)
    }
}

impl SiblingReferences for ProjectFile {
    fn has_sibling_reference(&self, package: &PackageId) -> bool {
        self.find_project_reference(package).is_some()
    }
}
