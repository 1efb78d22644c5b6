//! Playlist tree and the read-only index used to scope the quiz.

use std::collections::HashSet;
use std::fmt;

use super::model::TrackId;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistNode {
    Folder {
        name: String,
        children: Vec<PlaylistNode>,
    },
    Playlist {
        name: String,
        track_ids: Vec<TrackId>,
        /// Rule-based playlist. Empty when sourced from a live database.
        is_smart: bool,
    },
}

impl PlaylistNode {
    pub fn folder(name: impl Into<String>, children: Vec<PlaylistNode>) -> Self {
        Self::Folder {
            name: name.into(),
            children,
        }
    }

    pub fn playlist(name: impl Into<String>, track_ids: Vec<TrackId>) -> Self {
        Self::Playlist {
            name: name.into(),
            track_ids,
            is_smart: false,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlaylistNode::Folder { name, .. } | PlaylistNode::Playlist { name, .. } => name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            PlaylistNode::Folder { .. } => NodeKind::Folder,
            PlaylistNode::Playlist { is_smart: true, .. } => NodeKind::SmartPlaylist,
            PlaylistNode::Playlist { .. } => NodeKind::Playlist,
        }
    }

    /// Children of a folder; playlists have none.
    pub fn children(&self) -> &[PlaylistNode] {
        match self {
            PlaylistNode::Folder { children, .. } => children,
            PlaylistNode::Playlist { .. } => &[],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Playlist,
    SmartPlaylist,
}

/// Child indices leading from the root folder to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlaylistPath(pub Vec<usize>);

impl fmt::Display for PlaylistPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// One row of [`PlaylistIndex::entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub path: PlaylistPath,
    /// 0 for direct children of the root.
    pub depth: usize,
    pub name: String,
    pub kind: NodeKind,
    pub track_count: usize,
}

/// Read-only view over a playlist tree.
#[derive(Debug, Copy, Clone)]
pub struct PlaylistIndex<'a> {
    root: &'a PlaylistNode,
}

impl<'a> PlaylistIndex<'a> {
    pub fn new(root: &'a PlaylistNode) -> Self {
        Self { root }
    }

    /// Flatten `node` to its track ids: a playlist yields its references, a
    /// folder the union over all descendants. No duplicates; first-seen order.
    pub fn flatten(node: &PlaylistNode) -> Vec<TrackId> {
        let mut seen: HashSet<TrackId> = HashSet::new();
        let mut out: Vec<TrackId> = Vec::new();
        collect_ids(node, &mut seen, &mut out);
        out
    }

    /// Resolve `path` from the root. The empty path is the root itself.
    pub fn node_at(&self, path: &PlaylistPath) -> Option<&'a PlaylistNode> {
        let mut node = self.root;
        for &i in &path.0 {
            node = node.children().get(i)?;
        }
        Some(node)
    }

    /// Depth-first listing of every node below the root.
    pub fn entries(&self) -> Vec<IndexEntry> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        list_entries(self.root.children(), 0, &mut path, &mut out);
        out
    }
}

fn collect_ids(node: &PlaylistNode, seen: &mut HashSet<TrackId>, out: &mut Vec<TrackId>) {
    match node {
        PlaylistNode::Playlist { track_ids, .. } => {
            for id in track_ids {
                if seen.insert(id.clone()) {
                    out.push(id.clone());
                }
            }
        }
        PlaylistNode::Folder { children, .. } => {
            for child in children {
                collect_ids(child, seen, out);
            }
        }
    }
}

fn list_entries(
    nodes: &[PlaylistNode],
    depth: usize,
    path: &mut Vec<usize>,
    out: &mut Vec<IndexEntry>,
) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        out.push(IndexEntry {
            path: PlaylistPath(path.clone()),
            depth,
            name: node.name().to_string(),
            kind: node.kind(),
            track_count: PlaylistIndex::flatten(node).len(),
        });
        list_entries(node.children(), depth + 1, path, out);
        path.pop();
    }
}
