//! Preferred track resolution.
//!
//! For each accepted track type, pick the single best source among the
//! material's competing encodings and group the picks by delivery medium.
//!
//! # Selection rules
//!
//! - A definition competes only if its tag matches an accepted link and its
//!   container's medium is listed in the category's priority table.
//! - The candidate with the lowest priority index wins. On equal index the
//!   candidate seen first (link order, then track order) is kept.
//! - Every winning candidate must land in an `Encoded` container. A
//!   container that is not encoded yet means the upstream transfer is still
//!   running, which is reported as [`PendingTransferError`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;

use crate::models::{
    Material, PriorityEntry, PriorityTable, Stage, Track, TrackCategory, TrackDefinition,
    TrackTypeLink,
};

/// A selected track's container is not encoded yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Waiting for Mediator to finish transferring {track_type_name} to {media_name} for {mat_id}")]
pub struct PendingTransferError {
    pub file_tag: String,
    pub track_type_name: String,
    pub media_name: String,
    pub mat_id: String,
}

/// Current best source for one track type tag.
#[derive(Debug, Clone)]
struct Candidate {
    definition: TrackDefinition,
    priority: usize,
    media_name: String,
}

/// Resolves preferred tracks against a priority table.
#[derive(Debug, Clone, Copy)]
pub struct TrackResolver<'a> {
    priorities: &'a PriorityTable,
    stage: Stage,
}

impl<'a> TrackResolver<'a> {
    pub fn new(priorities: &'a PriorityTable, stage: Stage) -> Self {
        Self { priorities, stage }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Select the preferred definition for every accepted link.
    ///
    /// Returns one container per medium that received a selection, in the
    /// order the selecting tags were first seen. Each container is a copy of
    /// the material's container with only the selected definitions.
    pub fn resolve(
        &self,
        material: &Material,
        accepted: &[TrackTypeLink],
        category: TrackCategory,
    ) -> Result<Vec<Track>, PendingTransferError> {
        let mut tag_order: Vec<String> = Vec::new();
        let mut selected: HashMap<String, Candidate> = HashMap::new();

        for link in accepted {
            for track in &material.tracks {
                let Some((priority, entry)) = self.priorities.lookup(category, &track.media_name)
                else {
                    continue;
                };

                for definition in track
                    .definitions
                    .iter()
                    .filter(|d| d.file_tag() == link.file_tag())
                {
                    let candidate = Candidate {
                        definition: self.annotate(material, definition, entry),
                        priority,
                        media_name: track.media_name.clone(),
                    };

                    match selected.entry(link.file_tag().to_string()) {
                        Entry::Vacant(slot) => {
                            tag_order.push(slot.key().clone());
                            slot.insert(candidate);
                        }
                        Entry::Occupied(mut slot) => {
                            if candidate.priority < slot.get().priority {
                                tracing::debug!(
                                    "{} tag '{}': {} (#{}) replaces {} (#{})",
                                    category,
                                    slot.key(),
                                    candidate.media_name,
                                    candidate.priority,
                                    slot.get().media_name,
                                    slot.get().priority
                                );
                                slot.insert(candidate);
                            }
                        }
                    }
                }
            }
        }

        let mut containers: Vec<Track> = Vec::new();
        for tag in &tag_order {
            let media_name = &selected[tag].media_name;
            if containers.iter().any(|t| &t.media_name == media_name) {
                continue;
            }
            if let Some(original) = material.track_by_media_name(media_name) {
                containers.push(original.shell());
            }
        }

        for tag in tag_order {
            let Some(candidate) = selected.remove(&tag) else {
                continue;
            };
            match containers
                .iter_mut()
                .find(|t| t.media_name == candidate.media_name && t.encoded)
            {
                Some(container) => container.definitions.push(candidate.definition),
                None => {
                    return Err(PendingTransferError {
                        track_type_name: candidate.definition.display_name().to_string(),
                        file_tag: tag,
                        media_name: candidate.media_name,
                        mat_id: material.mat_id.clone(),
                    })
                }
            }
        }

        Ok(containers)
    }

    /// Copy a definition and fill in its source fields.
    fn annotate(
        &self,
        material: &Material,
        definition: &TrackDefinition,
        entry: &PriorityEntry,
    ) -> TrackDefinition {
        let mut annotated = definition.clone();
        annotated.source_type = Some(entry.source_type.clone());
        annotated.source_location = Some(entry.source_location.clone());
        annotated.source_path =
            Some(entry.source_path(self.stage, &material.mat_id, &definition.file_id));
        annotated
    }
}
