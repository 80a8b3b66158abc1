//! Work order requirement expansion.
//!
//! Turns the work order's package definitions into the lists of track
//! type ids a material must provide. Structural problems fail immediately.

use thiserror::Error;

use crate::models::{
    Material, RequirementKind, TrackRequirement, WorkOrder, CLOSED_CAPTION_COMPONENT,
    VIDEO_COMPONENT,
};

/// Structural problems in a work order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkOrderError {
    /// No conform package, or the conform list is empty.
    #[error("WorkOrder: audioAndCaptionHierarchy is invalid")]
    InvalidHierarchy,

    /// No hierarchy matches the material type and preference profile.
    #[error("WorkOrder: Embedded language requirements are not found in the workorder for the MaterialType specified in material")]
    HierarchyNotFound {
        material_type: String,
        profile_name: String,
    },

    /// A requirement entry lacks a usable track type id.
    #[error("WorkOrder: TrackTypeId \"{value}\" in {list} at index {index} is invalid")]
    InvalidTrackTypeId {
        list: &'static str,
        index: usize,
        value: String,
    },

    /// No closedCaptions package, or the package is empty.
    #[error("WorkOrder: closedCaptions are invalid")]
    InvalidClosedCaptions,
}

impl WorkOrderError {
    fn invalid_id(list: &'static str, index: usize, req: &TrackRequirement) -> Self {
        Self::InvalidTrackTypeId {
            list,
            index,
            value: req.id_or_empty().to_string(),
        }
    }
}

/// Track types a work order requires from a material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiredTrackTypes {
    /// Whether the video track is required.
    pub video: bool,
    pub audio_embedded: Vec<TrackRequirement>,
    pub caption_embedded: Vec<TrackRequirement>,
    /// `None` when closed captions are not required at all.
    pub closed_captions: Option<Vec<TrackRequirement>>,
}

impl RequiredTrackTypes {
    /// Requirement kinds that are active for this work order.
    pub fn active_kinds(&self) -> Vec<RequirementKind> {
        let mut kinds = Vec::new();
        if self.video {
            kinds.extend([
                RequirementKind::Video,
                RequirementKind::AudioEmbedded,
                RequirementKind::CaptionEmbedded,
            ]);
        }
        if self.closed_captions.is_some() {
            kinds.push(RequirementKind::ClosedCaption);
        }
        kinds
    }

    /// Required ids of a non-video kind.
    pub fn ids(&self, kind: RequirementKind) -> &[TrackRequirement] {
        match kind {
            RequirementKind::Video => &[],
            RequirementKind::AudioEmbedded => &self.audio_embedded,
            RequirementKind::CaptionEmbedded => &self.caption_embedded,
            RequirementKind::ClosedCaption => self.closed_captions.as_deref().unwrap_or(&[]),
        }
    }
}

/// Expand a work order into the track types the material must provide.
pub fn expand_requirements(
    work_order: &WorkOrder,
    material: &Material,
) -> Result<RequiredTrackTypes, WorkOrderError> {
    let mut required = RequiredTrackTypes::default();

    if let (true, Some(preference)) = (
        work_order.requires(VIDEO_COMPONENT),
        work_order.audio_and_caption_preference.as_deref(),
    ) {
        let conform = work_order
            .conform_package()
            .filter(|c| !c.is_empty())
            .ok_or(WorkOrderError::InvalidHierarchy)?;

        let hierarchies: Vec<_> = conform
            .iter()
            .filter_map(|entry| entry.audio_and_caption_hierarchy.as_ref())
            .flatten()
            .filter(|h| h.material_type == material.material_type)
            .flat_map(|h| h.hierarchies.iter())
            .filter(|h| h.profile_name == preference)
            .collect();

        if hierarchies.is_empty() {
            return Err(WorkOrderError::HierarchyNotFound {
                material_type: material.material_type.clone(),
                profile_name: preference.to_string(),
            });
        }

        for hierarchy in hierarchies {
            for (i, req) in hierarchy.audio_embedded_tracks.iter().enumerate() {
                if req.valid_id().is_none() {
                    return Err(WorkOrderError::invalid_id("audioEmbeddedTracks", i, req));
                }
                required.audio_embedded.push(req.clone());
            }
            for (i, req) in hierarchy.embedded_caption_tracks.iter().enumerate() {
                if req.valid_id().is_none() {
                    return Err(WorkOrderError::invalid_id("embeddedCapTracks", i, req));
                }
                required.caption_embedded.push(req.clone());
            }
        }

        required.video = true;
    }

    if work_order.requires(CLOSED_CAPTION_COMPONENT) {
        let closed_captions = work_order
            .closed_caption_package()
            .filter(|c| !c.is_empty())
            .ok_or(WorkOrderError::InvalidClosedCaptions)?;

        let mut ids = Vec::with_capacity(closed_captions.len());
        for (i, req) in closed_captions.iter().enumerate() {
            if req.valid_id().is_none() {
                return Err(WorkOrderError::invalid_id("closedCaptions", i, req));
            }
            ids.push(req.clone());
        }
        required.closed_captions = Some(ids);
    }

    Ok(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConformEntry, Hierarchy, MaterialTypeHierarchy, Package};

    fn hierarchy(material_type: &str, profile: &str, audio: Vec<TrackRequirement>) -> ConformEntry {
        ConformEntry {
            audio_and_caption_hierarchy: Some(vec![MaterialTypeHierarchy {
                material_type: material_type.into(),
                hierarchies: vec![Hierarchy {
                    profile_name: profile.into(),
                    audio_embedded_tracks: audio,
                    embedded_caption_tracks: vec![TrackRequirement::new("ec1", "English SDH")],
                }],
            }]),
            ..Default::default()
        }
    }

    fn work_order(components: &[&str], packages: Vec<Package>) -> WorkOrder {
        let mut wo = WorkOrder {
            required_components: components.iter().map(|c| c.to_string()).collect(),
            audio_and_caption_preference: Some("Domestic".into()),
            ..Default::default()
        };
        wo.profile.packages = packages;
        wo
    }

    fn conform(entries: Vec<ConformEntry>) -> Package {
        Package {
            conform: Some(entries),
            ..Default::default()
        }
    }

    #[test]
    fn collects_matching_hierarchy_ids() {
        let wo = work_order(
            &["video"],
            vec![conform(vec![
                hierarchy("Feature", "Domestic", vec![TrackRequirement::new("x", "X")]),
                hierarchy("Episode", "Domestic", vec![TrackRequirement::new("a1", "English")]),
            ])],
        );
        let required = expand_requirements(&wo, &Material::new("M1", "Episode")).unwrap();

        assert!(required.video);
        assert_eq!(required.audio_embedded, vec![TrackRequirement::new("a1", "English")]);
        assert_eq!(required.caption_embedded.len(), 1);
        assert!(required.closed_captions.is_none());
        assert_eq!(required.active_kinds().len(), 3);
    }

    #[test]
    fn missing_conform_package_is_invalid() {
        let wo = work_order(&["video"], vec![]);
        assert_eq!(
            expand_requirements(&wo, &Material::new("M1", "Episode")),
            Err(WorkOrderError::InvalidHierarchy)
        );

        let wo = work_order(&["video"], vec![conform(vec![])]);
        assert_eq!(
            expand_requirements(&wo, &Material::new("M1", "Episode")),
            Err(WorkOrderError::InvalidHierarchy)
        );
    }

    #[test]
    fn unmatched_profile_is_not_found() {
        let wo = work_order(
            &["video"],
            vec![conform(vec![hierarchy("Episode", "International", vec![])])],
        );
        let err = expand_requirements(&wo, &Material::new("M1", "Episode")).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("WorkOrder: Embedded language requirements are not found"));
    }

    #[test]
    fn empty_audio_id_reports_index() {
        let wo = work_order(
            &["video"],
            vec![conform(vec![hierarchy(
                "Episode",
                "Domestic",
                vec![TrackRequirement::new("a1", "English"), TrackRequirement::default()],
            )])],
        );
        let err = expand_requirements(&wo, &Material::new("M1", "Episode")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "WorkOrder: TrackTypeId \"\" in audioEmbeddedTracks at index 1 is invalid"
        );
    }

    #[test]
    fn empty_embedded_caption_id_reports_index() {
        let mut entry = hierarchy("Episode", "Domestic", vec![TrackRequirement::new("a1", "English")]);
        if let Some(types) = entry.audio_and_caption_hierarchy.as_mut() {
            types[0].hierarchies[0].embedded_caption_tracks = vec![
                TrackRequirement::new("ec1", "English SDH"),
                TrackRequirement::new("ec2", "Spanish SDH"),
                TrackRequirement {
                    track_type_id: Some(String::new()),
                    track_type_name: Some("French SDH".into()),
                },
            ];
        }
        let wo = work_order(&["video"], vec![conform(vec![entry])]);

        let err = expand_requirements(&wo, &Material::new("M1", "Episode")).unwrap_err();
        assert_eq!(
            err,
            WorkOrderError::InvalidTrackTypeId {
                list: "embeddedCapTracks",
                index: 2,
                value: String::new(),
            }
        );
        assert_eq!(
            err.to_string(),
            "WorkOrder: TrackTypeId \"\" in embeddedCapTracks at index 2 is invalid"
        );
    }

    #[test]
    fn video_without_preference_skips_embedded() {
        let mut wo = work_order(&["video"], vec![]);
        wo.audio_and_caption_preference = None;
        let required = expand_requirements(&wo, &Material::new("M1", "Episode")).unwrap();
        assert!(!required.video);
        assert!(required.active_kinds().is_empty());
    }

    #[test]
    fn closed_captions_require_package() {
        let wo = work_order(&["cc"], vec![]);
        assert_eq!(
            expand_requirements(&wo, &Material::new("M1", "Episode")),
            Err(WorkOrderError::InvalidClosedCaptions)
        );
    }

    #[test]
    fn closed_caption_without_id_reports_index() {
        let wo = work_order(
            &["cc"],
            vec![Package {
                closed_captions: Some(vec![
                    TrackRequirement::new("cc1", "English CC"),
                    TrackRequirement {
                        track_type_id: None,
                        track_type_name: Some("French CC".into()),
                    },
                ]),
                ..Default::default()
            }],
        );
        let err = expand_requirements(&wo, &Material::new("M1", "Episode")).unwrap_err();
        assert_eq!(
            err,
            WorkOrderError::InvalidTrackTypeId {
                list: "closedCaptions",
                index: 1,
                value: String::new(),
            }
        );
    }
}
