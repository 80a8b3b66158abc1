//! Material consolidation.
//!
//! Merges the resolver outputs of all categories into one container list
//! and builds the rewritten material document.

use crate::models::{MaterialDocument, Track, TrackTypeLink};

/// Merge resolved containers that target the same medium.
///
/// Containers are grouped by media name in first-appearance order. The
/// first container of a group is the base; definitions of later ones are
/// appended to it.
pub fn merge_tracks(resolved: impl IntoIterator<Item = Track>) -> Vec<Track> {
    let mut merged: Vec<Track> = Vec::new();
    for track in resolved {
        match merged.iter_mut().find(|t| t.media_name == track.media_name) {
            Some(base) => base.definitions.extend(track.definitions),
            None => merged.push(track),
        }
    }
    merged
}

/// Deduplicate links by tag, keeping the first occurrence.
pub fn dedup_links(links: impl IntoIterator<Item = TrackTypeLink>) -> Vec<TrackTypeLink> {
    let mut unique: Vec<TrackTypeLink> = Vec::new();
    for link in links {
        if !unique.iter().any(|u| u.file_tag() == link.file_tag()) {
            unique.push(link);
        }
    }
    unique
}

/// Build the consolidated document.
///
/// The original track and link lists are replaced wholesale; every other
/// field of the document is carried over unchanged.
pub fn consolidate(
    document: &MaterialDocument,
    resolved: impl IntoIterator<Item = Track>,
    accepted: impl IntoIterator<Item = TrackTypeLink>,
) -> MaterialDocument {
    let mut out = document.clone();
    out.material.tracks = merge_tracks(resolved);
    out.material.track_type_links = dedup_links(accepted);
    out
}
