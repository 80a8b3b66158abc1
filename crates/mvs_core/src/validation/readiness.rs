//! Track readiness checks.
//!
//! Compares a material's track type links against the track types a work
//! order requires. Each requirement contributes at most one accepted link
//! or one error message.

use crate::models::{Material, TrackRequirement, TrackTypeLink, VIDEO_FILE_TAG};

/// Accepted links and error messages for one requirement kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadinessReport {
    pub accepted: Vec<TrackTypeLink>,
    pub errors: Vec<String>,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check one tag against the material's links.
    ///
    /// Only the first link carrying the tag is considered. A "not found"
    /// error is only recorded while the report is still empty.
    fn check(&mut self, material: &Material, file_tag: &str, not_found: impl FnOnce() -> String) {
        if let Some(link) = material.link_by_tag(file_tag) {
            if link.is_ready() {
                self.accepted.push(link.clone());
            } else {
                self.errors.push(format!(
                    "Track Type: \"{}\" with trackTypeId: \"{}\" is not in Ready state",
                    link.track_type_name,
                    link.file_tag()
                ));
            }
        }

        if self.accepted.is_empty() && self.errors.is_empty() {
            self.errors.push(not_found());
        }
    }
}

/// Check the single video requirement.
pub fn check_video_readiness(material: &Material) -> ReadinessReport {
    let mut report = ReadinessReport::default();
    report.check(material, VIDEO_FILE_TAG, || {
        "Track Type: \"Video\" is not found in the material".to_string()
    });
    report
}

/// Check a list of required track type ids.
pub fn check_readiness(material: &Material, requirements: &[TrackRequirement]) -> ReadinessReport {
    let mut report = ReadinessReport::default();
    for req in requirements {
        report.check(material, req.id_or_empty(), || {
            format!(
                "Track Type: \"{}\" with trackTypeId: \"{}\" is not found in the material",
                req.name_or_empty(),
                req.id_or_empty()
            )
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::READY_STATE;

    fn material() -> Material {
        Material::new("M1", "Episode")
            .with_link(TrackTypeLink::new("vid", READY_STATE, "Video"))
            .with_link(TrackTypeLink::new("a1", READY_STATE, "English Stereo"))
            .with_link(TrackTypeLink::new("a2", "Pending", "Spanish Stereo"))
            .with_link(TrackTypeLink::new("a1", "Failed", "English Stereo (dup)"))
    }

    #[test]
    fn accepts_ready_video() {
        let report = check_video_readiness(&material());
        assert!(report.is_ready());
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].file_tag(), "vid");
    }

    #[test]
    fn reports_missing_video() {
        let report = check_video_readiness(&Material::new("M1", "Episode"));
        assert_eq!(
            report.errors,
            vec!["Track Type: \"Video\" is not found in the material".to_string()]
        );
    }

    #[test]
    fn first_matching_link_wins() {
        let report = check_readiness(&material(), &[TrackRequirement::new("a1", "English")]);
        assert!(report.is_ready());
        assert_eq!(report.accepted[0].state_name, READY_STATE);
    }

    #[test]
    fn reports_unready_state() {
        let report = check_readiness(&material(), &[TrackRequirement::new("a2", "Spanish")]);
        assert!(report.accepted.is_empty());
        assert_eq!(
            report.errors,
            vec![
                "Track Type: \"Spanish Stereo\" with trackTypeId: \"a2\" is not in Ready state"
                    .to_string()
            ]
        );
    }

    #[test]
    fn not_found_only_when_nothing_accumulated() {
        let reqs = [
            TrackRequirement::new("zz", "French"),
            TrackRequirement::new("a1", "English"),
            TrackRequirement::new("yy", "German"),
        ];
        let report = check_readiness(&material(), &reqs);

        // "zz" is reported, "yy" follows an accepted link and is not.
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(
            report.errors,
            vec![
                "Track Type: \"French\" with trackTypeId: \"zz\" is not found in the material"
                    .to_string()
            ]
        );
    }

    #[test]
    fn empty_requirements_are_ready() {
        assert!(check_readiness(&material(), &[]).is_ready());
    }
}
