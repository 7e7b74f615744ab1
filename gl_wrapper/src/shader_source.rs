use std::path::{Path, PathBuf};

use thiserror::Error;

/// Line prefix introducing a stage section in an annotated shader file.
pub const STAGE_MARKER: &str = "//#type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    /// Tags are case-sensitive.
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "vertex" => Some(Self::Vertex),
            "fragment" => Some(Self::Fragment),
            _ => None,
        }
    }

    pub(crate) fn gl_kind(self) -> gl::types::GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// One stage section in file order, tag resolved, body verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub kind: StageKind,
    pub text: String,
}

/// Both stage sources of a dual-stage shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSources {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{}: unexpected stage tag '{}'", .path.display(), .token)]
    Malformed { path: PathBuf, token: String },
    #[error("{}: expected exactly 2 stage sections, found {}", .path.display(), .found)]
    SectionCount { path: PathBuf, found: usize },
    #[error("{}: duplicate '{}' stage section", .path.display(), .stage)]
    DuplicateStage { path: PathBuf, stage: StageKind },
}

impl StageSources {
    /// Splits an annotated shader file into its two stage sources.
    ///
    /// A section starts at a `//#type <tag>` line; the tag is the remainder
    /// of that line, trimmed. The body runs verbatim up to the next marker or
    /// end of file. Text before the first marker is ignored. The stages may
    /// appear in either order, but there must be exactly one of each.
    pub fn parse(path: &Path, text: &str) -> Result<Self, SourceError> {
        let sections = split_sections(path, text)?;

        if sections.len() != 2 {
            return Err(SourceError::SectionCount {
                path: path.to_owned(),
                found: sections.len(),
            });
        }

        let mut vertex = None;
        let mut fragment = None;

        for section in sections {
            let slot = match section.kind {
                StageKind::Vertex => &mut vertex,
                StageKind::Fragment => &mut fragment,
            };

            if slot.is_some() {
                return Err(SourceError::DuplicateStage {
                    path: path.to_owned(),
                    stage: section.kind,
                });
            }

            *slot = Some(section.text);
        }

        // Two sections without a duplicate means one of each.
        Ok(Self {
            vertex: vertex.unwrap(),
            fragment: fragment.unwrap(),
        })
    }
}

fn split_sections(path: &Path, text: &str) -> Result<Vec<ShaderSource>, SourceError> {
    let starts: Vec<usize> = text.match_indices(STAGE_MARKER).map(|(i, _)| i).collect();

    let mut sections = Vec::with_capacity(starts.len());

    for (n, &start) in starts.iter().enumerate() {
        let tag_start = start + STAGE_MARKER.len();
        let rest = &text[tag_start..];
        let line_len = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());

        let token = rest[..line_len].trim();
        let kind = StageKind::from_tag(token).ok_or_else(|| SourceError::Malformed {
            path: path.to_owned(),
            token: token.to_owned(),
        })?;

        let body_end = starts.get(n + 1).copied().unwrap_or(text.len());
        let body = &text[tag_start + line_len..body_end];

        sections.push(ShaderSource {
            kind,
            text: body.to_owned(),
        });
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<StageSources, SourceError> {
        StageSources::parse(Path::new("test.glsl"), text)
    }

    #[test]
    fn vertex_first() {
        let sources = parse("//#type vertex\nVERT\n//#type fragment\nFRAG\n").unwrap();

        assert_eq!(sources.vertex, "VERT\n");
        assert_eq!(sources.fragment, "FRAG\n");
    }

    #[test]
    fn fragment_first() {
        let sources = parse("//#type fragment\nFRAG\n//#type vertex\nVERT\n").unwrap();

        assert_eq!(sources.vertex, "VERT\n");
        assert_eq!(sources.fragment, "FRAG\n");
    }

    #[test]
    fn preamble_is_ignored() {
        let sources = parse("banner comment\n//#type vertex\nVERT\n//#type fragment\nFRAG\n").unwrap();

        assert_eq!(sources.vertex, "VERT\n");
    }

    #[test]
    fn bodies_are_verbatim() {
        let text = "//#type vertex\n#version 330 core\n\nvoid main() {}\n//#type fragment\nF\n";
        let sources = parse(text).unwrap();

        assert_eq!(sources.vertex, "#version 330 core\n\nvoid main() {}\n");
        assert_eq!(sources.fragment, "F\n");
    }

    #[test]
    fn extra_spaces_before_tag() {
        let sources = parse("//#type    vertex\nVERT\n//#type fragment\nFRAG\n").unwrap();

        assert_eq!(sources.vertex, "VERT\n");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = parse("//#type geometry\nX\n//#type fragment\nFRAG\n").unwrap_err();

        match err {
            SourceError::Malformed { token, .. } => assert_eq!(token, "geometry"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        let err = parse("//#type Vertex\nX\n//#type fragment\nFRAG\n").unwrap_err();

        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[test]
    fn single_section_is_rejected() {
        let err = parse("//#type vertex\nVERT\n").unwrap_err();

        match err {
            SourceError::SectionCount { found, .. } => assert_eq!(found, 1),
            other => panic!("expected SectionCount, got {other:?}"),
        }
    }

    #[test]
    fn third_section_is_rejected() {
        let text = "//#type vertex\nV\n//#type fragment\nF\n//#type vertex\nV2\n";
        let err = parse(text).unwrap_err();

        match err {
            SourceError::SectionCount { found, .. } => assert_eq!(found, 3),
            other => panic!("expected SectionCount, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_stage_is_rejected() {
        let err = parse("//#type vertex\nV\n//#type vertex\nV2\n").unwrap_err();

        match err {
            SourceError::DuplicateStage { stage, .. } => assert_eq!(stage, StageKind::Vertex),
            other => panic!("expected DuplicateStage, got {other:?}"),
        }
    }

    #[test]
    fn marker_on_last_line_without_newline() {
        let sources = parse("//#type vertex\nV\n//#type fragment").unwrap();

        assert_eq!(sources.vertex, "V\n");
        assert_eq!(sources.fragment, "");
    }
}
